//! # Workflows Module
//!
//! Command-style entry points over the engine: loading docking result files into
//! named collections and exporting their scores.
//!
//! - **Loading** ([`load`]) - Detection, parsing, SwissDock cluster selection,
//!   pyDock row limits and collection building.
//! - **Export** ([`export`]) - `export_docked_data` with format guessing from the
//!   file suffix.
//! - **Session** ([`session`]) - Object names mapped to collections, with the
//!   structure loader that owns their coordinates.

pub mod export;
pub mod load;
pub mod session;
