use crate::engine::config::{Delimiter, ExportConfig};
use crate::engine::error::EngineError;
use crate::engine::export::{ExportError, Exporter};
use crate::engine::progress::ProgressReporter;
use crate::engine::store::CollectionStore;
use std::path::Path;
use tracing::{info, instrument};

/// Picks the delimiter for an export.
///
/// An explicit `format` must be `csv` or `txt`. Without one, the file suffix
/// decides, and unrecognized suffixes keep the configured delimiter (comma unless
/// changed).
pub fn resolve_delimiter(
    filename: &Path,
    format: Option<&str>,
    config: &ExportConfig,
) -> Result<Delimiter, ExportError> {
    match format {
        Some(format) => {
            Delimiter::from_format_name(format.trim()).ok_or_else(|| ExportError::UnknownFormat {
                format: format.to_string(),
            })
        }
        None => Ok(filename
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Delimiter::from_format_name)
            .unwrap_or(config.delimiter)),
    }
}

/// Writes the scores of `store` to `filename` as delimited text in the store's
/// current sort order.
#[instrument(skip_all, name = "export_workflow", fields(store = store.name()))]
pub fn export_docked_data(
    store: &CollectionStore,
    filename: &Path,
    format: Option<&str>,
    config: &ExportConfig,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    let delimiter = resolve_delimiter(filename, format, config)?;
    let exporter = Exporter::new(ExportConfig {
        delimiter,
        ..config.clone()
    });

    reporter.phase("Export", || exporter.export_to_path(store, filename))?;

    info!(
        "Data of '{}' exported to '{}' ({} rows).",
        store.name(),
        filename.display(),
        store.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins_over_suffix() {
        let config = ExportConfig::default();
        assert_eq!(
            resolve_delimiter(Path::new("out.csv"), Some("txt"), &config).unwrap(),
            Delimiter::Tab
        );
        assert!(matches!(
            resolve_delimiter(Path::new("out.csv"), Some("xlsx"), &config),
            Err(ExportError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn suffix_is_guessed_and_falls_back_to_comma() {
        let config = ExportConfig::default();
        assert_eq!(
            resolve_delimiter(Path::new("scores.TXT"), None, &config).unwrap(),
            Delimiter::Tab
        );
        assert_eq!(
            resolve_delimiter(Path::new("scores.dat"), None, &config).unwrap(),
            Delimiter::Comma
        );
        assert_eq!(
            resolve_delimiter(Path::new("scores"), None, &config).unwrap(),
            Delimiter::Comma
        );
    }
}
