//! # Core Module
//!
//! Stateless building blocks shared by every other layer.
//!
//! - **Pose Representation** ([`models`]) - Pose records, score values, identifiers,
//!   source format tags and the structural payload handed to viewers
//! - **File I/O** ([`io`]) - Format detection and one reader per docking format
//!
//! Scores are opaque values read verbatim from the input files. Nothing in this
//! module recomputes, validates or re-ranks them; parse order is preserved exactly.

pub mod io;
pub mod models;
