use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{ExportArgs, InputArgs};
use crate::error::{CliError, Result};
use std::path::Path;
use std::str::FromStr;
use viewdock::engine::config::{
    Delimiter, ExportConfig, ExportConfigBuilder, LoadConfig, LoadConfigBuilder, SwissDockMode,
};

/// Reads the config file (if any) and applies `-S` overrides on top of it.
pub fn read_file_config(path: Option<&Path>, set_values: &[String]) -> Result<FileConfig> {
    let file_config = match path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    apply_set_values(file_config, set_values)
}

pub fn build_load_config(args: &InputArgs, file_config: &FileConfig) -> Result<LoadConfig> {
    let defaults = DefaultsConfig::default();
    let load_file = file_config.load.clone().unwrap_or_default();

    let swissdock_mode = match (args.swissdock_mode, load_file.swissdock_mode.as_deref()) {
        (Some(mode), _) => mode,
        (None, Some(raw)) => parse_value::<SwissDockMode>("load.swissdock-mode", raw)?,
        (None, None) => defaults.swissdock_mode,
    };

    let mut builder = LoadConfigBuilder::new()
        .max_n(args.max_n.or(load_file.max_n).unwrap_or(defaults.max_n))
        .swissdock_mode(swissdock_mode);
    if let Some(name) = &args.name {
        builder = builder.object_name(name.clone());
    }
    if let Some(format) = args.input_format {
        builder = builder.format(format);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

pub fn build_export_config(args: &ExportArgs, file_config: &FileConfig) -> Result<ExportConfig> {
    let defaults = DefaultsConfig::default();
    let export_file = file_config.export.clone().unwrap_or_default();

    let delimiter = match export_file.delimiter.as_deref() {
        Some(raw) => parse_value::<Delimiter>("export.delimiter", raw)?,
        None => defaults.delimiter,
    };

    let mut builder = ExportConfigBuilder::new()
        .delimiter(delimiter)
        .precision(
            args.precision
                .or(export_file.precision)
                .unwrap_or(defaults.precision),
        )
        .sentinel(
            args.sentinel
                .clone()
                .or(export_file.sentinel)
                .unwrap_or(defaults.sentinel),
        );
    if let Some(fields) = args.fields.clone().or(export_file.fields) {
        builder = builder.fields(fields);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "load.max-n" => {
                config.load.get_or_insert_with(Default::default).max_n =
                    Some(parse_value::<usize>(key, value_str)?);
            }
            "load.swissdock-mode" => {
                parse_value::<SwissDockMode>(key, value_str)?;
                config.load.get_or_insert_with(Default::default).swissdock_mode =
                    Some(value_str.to_string());
            }
            "export.precision" => {
                config.export.get_or_insert_with(Default::default).precision =
                    Some(parse_value::<usize>(key, value_str)?);
            }
            "export.sentinel" => {
                config.export.get_or_insert_with(Default::default).sentinel =
                    Some(value_str.to_string());
            }
            "export.delimiter" => {
                parse_value::<Delimiter>(key, value_str)?;
                config.export.get_or_insert_with(Default::default).delimiter =
                    Some(value_str.to_string());
            }
            "export.fields" => {
                let fields: Vec<String> = value_str
                    .split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect();
                config.export.get_or_insert_with(Default::default).fields = Some(fields);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
