//! # Core Models Module
//!
//! Format-agnostic representation of docking results.
//!
//! ## Key Components
//!
//! - [`ids`] - Pose identifiers, model references and payload handles
//! - [`format`] - Tags for the docking formats understood by the readers
//! - [`score`] - Integer/real score values and the ordered score set
//! - [`pose`] - The unified pose record
//! - [`payload`] - Coordinate data that accompanies a set of poses
//! - [`docking`] - The result of parsing one file: records plus payload
//!
//! ```ignore
//! use viewdock::core::models::{ids::{ModelRef, PoseId}, format::SourceFormat};
//! use viewdock::core::models::{pose::PoseRecord, score::{ScoreSet, ScoreValue}};
//!
//! let mut scores = ScoreSet::new();
//! scores.insert("Affinity", ScoreValue::Real(-7.2));
//! let record = PoseRecord::new(PoseId(1), SourceFormat::Vina, scores, ModelRef::first());
//! ```

pub mod docking;
pub mod format;
pub mod ids;
pub mod payload;
pub mod pose;
pub mod score;
