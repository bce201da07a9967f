//! # ViewDock Core Library
//!
//! Reads the result files written by molecular docking programs and servers
//! (AutoDock Vina, SwissDock, pyDock, plain XYZ trajectories) and normalizes them
//! into one ranked, queryable collection of docking poses.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`PoseRecord`, `ScoreSet`,
//!   `StructuralPayload`) and the file I/O layer: the format detector and one
//!   parser per supported docking format.
//!
//! - **[`engine`]: The Logic Core.** Stateful pieces built on top of parsed data:
//!   the `CollectionStore` with its sort/visibility state, the delimited-text
//!   `Exporter`, configuration builders, progress reporting and the
//!   `StructureLoader` boundary towards a molecular viewer.
//!
//! - **[`workflows`]: The Public API.** Command-style entry points (`load_pdbqt`,
//!   `load_dock4`, `load_pydock`, `export_docked_data`, ...) and the `Session` that
//!   keeps one collection per loaded object.

pub mod core;
pub mod engine;
pub mod workflows;
