//! Command-line configuration: an optional TOML file, `-S key=value` overrides and
//! per-command flags merged into the library's load and export configurations.
//!
//! Precedence, highest first: command-line flag, `-S` override, config file,
//! built-in default.

mod builder;
mod defaults;
mod file;

pub use builder::{build_export_config, build_load_config, read_file_config};
