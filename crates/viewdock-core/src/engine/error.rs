use thiserror::Error;

use super::config::ConfigError;
use super::export::ExportError;
use super::store::StoreError;
use super::structure::StructureError;
use crate::core::io::error::FormatError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read docking results: {source}")]
    Format {
        #[from]
        source: FormatError,
    },

    #[error("Collection error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Export failed: {source}")]
    Export {
        #[from]
        source: ExportError,
    },

    #[error("Structure hand-off failed: {source}")]
    Structure {
        #[from]
        source: StructureError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid option for {operation}: {reason}")]
    InvalidOption {
        operation: &'static str,
        reason: String,
    },

    #[error("No object named '{0}' is loaded")]
    UnknownObject(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
