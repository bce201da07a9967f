use viewdock::engine::config::{self as core_config, Delimiter, SwissDockMode};

pub struct DefaultsConfig {
    pub max_n: usize,
    pub swissdock_mode: SwissDockMode,
    pub precision: usize,
    pub sentinel: String,
    pub delimiter: Delimiter,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_n: core_config::DEFAULT_MAX_N,
            swissdock_mode: SwissDockMode::All,
            precision: core_config::DEFAULT_PRECISION,
            sentinel: String::new(),
            delimiter: Delimiter::Comma,
        }
    }
}
