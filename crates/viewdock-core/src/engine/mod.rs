pub mod config;
pub mod error;
pub mod export;
pub mod progress;
pub mod store;
pub mod structure;
