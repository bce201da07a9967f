use crate::core::models::format::SourceFormat;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MAX_N: usize = 100;
pub const DEFAULT_PRECISION: usize = 6;
/// Fewest decimal places that keep exported reals within 1e-6 of the parsed value.
pub const MIN_PRECISION: usize = DEFAULT_PRECISION;
/// Largest precision still meaningful for an `f64`.
pub const MAX_PRECISION: usize = 17;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How clustered SwissDock results are turned into collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwissDockMode {
    /// Every pose in one collection.
    #[default]
    All,
    /// Only the best-ranked pose of each cluster.
    Leaders,
    /// One collection per cluster.
    Split,
}

impl SwissDockMode {
    pub fn name(self) -> &'static str {
        match self {
            SwissDockMode::All => "all",
            SwissDockMode::Leaders => "leaders",
            SwissDockMode::Split => "split",
        }
    }
}

impl fmt::Display for SwissDockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SwissDockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "0" => Ok(SwissDockMode::All),
            "leaders" | "1" => Ok(SwissDockMode::Leaders),
            "split" | "2" => Ok(SwissDockMode::Split),
            other => Err(format!(
                "unknown SwissDock mode '{}' (expected all, leaders or split)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub object_name: Option<String>,
    pub format: Option<SourceFormat>,
    /// Row limit applied to pyDock tables after parsing.
    pub max_n: usize,
    pub swissdock_mode: SwissDockMode,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            object_name: None,
            format: None,
            max_n: DEFAULT_MAX_N,
            swissdock_mode: SwissDockMode::default(),
        }
    }
}

#[derive(Default)]
pub struct LoadConfigBuilder {
    object_name: Option<String>,
    format: Option<SourceFormat>,
    max_n: Option<usize>,
    swissdock_mode: Option<SwissDockMode>,
}

impl LoadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = Some(name.into());
        self
    }
    pub fn format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }
    pub fn max_n(mut self, max_n: usize) -> Self {
        self.max_n = Some(max_n);
        self
    }
    pub fn swissdock_mode(mut self, mode: SwissDockMode) -> Self {
        self.swissdock_mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<LoadConfig, ConfigError> {
        let max_n = self.max_n.unwrap_or(DEFAULT_MAX_N);
        if max_n == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "max_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(name) = &self.object_name {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    parameter: "object_name",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(LoadConfig {
            object_name: self.object_name,
            format: self.format,
            max_n,
            swissdock_mode: self.swissdock_mode.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    /// Maps an export format name (`csv`, `txt`) to its delimiter.
    pub fn from_format_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "txt" | "tsv" => Some(Delimiter::Tab),
            _ => None,
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "tab" | "\\t" | "\t" => Ok(Delimiter::Tab),
            other => Delimiter::from_format_name(other)
                .ok_or_else(|| format!("unknown delimiter '{}' (expected comma or tab)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub delimiter: Delimiter,
    /// Decimal places for real-valued scores.
    pub precision: usize,
    /// Written in place of a score a record does not carry.
    pub sentinel: String,
    /// Explicit column order; `None` uses the store's visible fields.
    pub fields: Option<Vec<String>>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            precision: DEFAULT_PRECISION,
            sentinel: String::new(),
            fields: None,
        }
    }
}

#[derive(Default)]
pub struct ExportConfigBuilder {
    delimiter: Option<Delimiter>,
    precision: Option<usize>,
    sentinel: Option<String>,
    fields: Option<Vec<String>>,
}

impl ExportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }
    pub fn sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = Some(sentinel.into());
        self
    }
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn build(self) -> Result<ExportConfig, ConfigError> {
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(ConfigError::InvalidValue {
                parameter: "precision",
                reason: format!(
                    "must be between {} and {}, got {}",
                    MIN_PRECISION, MAX_PRECISION, precision
                ),
            });
        }
        if let Some(fields) = &self.fields {
            if fields.is_empty() {
                return Err(ConfigError::InvalidValue {
                    parameter: "fields",
                    reason: "must name at least one field".to_string(),
                });
            }
        }
        Ok(ExportConfig {
            delimiter: self.delimiter.unwrap_or_default(),
            precision,
            sentinel: self.sentinel.unwrap_or_default(),
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_builder_defaults() {
        let config = LoadConfigBuilder::new().build().unwrap();
        assert_eq!(config, LoadConfig::default());
        assert_eq!(config.max_n, 100);
        assert_eq!(config.swissdock_mode, SwissDockMode::All);
    }

    #[test]
    fn load_builder_rejects_zero_max_n() {
        let err = LoadConfigBuilder::new().max_n(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "max_n", .. }));
    }

    #[test]
    fn load_builder_rejects_blank_object_name() {
        assert!(LoadConfigBuilder::new().object_name("  ").build().is_err());
    }

    #[test]
    fn export_builder_defaults() {
        let config = ExportConfigBuilder::new().build().unwrap();
        assert_eq!(config.delimiter, Delimiter::Comma);
        assert_eq!(config.precision, 6);
        assert_eq!(config.sentinel, "");
        assert_eq!(config.fields, None);
    }

    #[test]
    fn export_builder_bounds_precision() {
        assert!(ExportConfigBuilder::new().precision(6).build().is_ok());
        assert!(ExportConfigBuilder::new().precision(17).build().is_ok());
        let err = ExportConfigBuilder::new().precision(18).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "precision", .. }));
    }

    #[test]
    fn export_builder_rejects_precision_too_coarse_to_round_trip() {
        for precision in [0, 1, 5] {
            let err = ExportConfigBuilder::new().precision(precision).build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { parameter: "precision", .. }));
        }
    }

    #[test]
    fn export_builder_rejects_empty_field_list() {
        assert!(ExportConfigBuilder::new().fields(Vec::new()).build().is_err());
    }

    #[test]
    fn swissdock_mode_accepts_names_and_plugin_numbers() {
        assert_eq!("Leaders".parse(), Ok(SwissDockMode::Leaders));
        assert_eq!("2".parse(), Ok(SwissDockMode::Split));
        assert!("best".parse::<SwissDockMode>().is_err());
    }

    #[test]
    fn delimiter_from_format_name() {
        assert_eq!(Delimiter::from_format_name("CSV"), Some(Delimiter::Comma));
        assert_eq!(Delimiter::from_format_name("txt"), Some(Delimiter::Tab));
        assert_eq!(Delimiter::from_format_name("xlsx"), None);
        assert_eq!("tab".parse(), Ok(Delimiter::Tab));
    }
}
