use super::config::ExportConfig;
use super::store::{CollectionStore, StoreError};
use csv::{Terminator, WriterBuilder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown export format '{format}' (expected csv or txt)")]
    UnknownFormat { format: String },

    #[error("Collection '{store}' has no entries to export")]
    NoEntries { store: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Writes a collection as delimited text: one header row of field names, then one
/// row per pose in the collection's current order.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Columns written for `store`: the configured field list, or the store's
    /// visible fields.
    pub fn columns<'s>(&'s self, store: &'s CollectionStore) -> Result<Vec<&'s str>, ExportError> {
        match &self.config.fields {
            Some(fields) => fields
                .iter()
                .map(|field| {
                    if store.has_field(field) {
                        Ok(field.as_str())
                    } else {
                        Err(ExportError::Store(store.unknown_field(field)))
                    }
                })
                .collect(),
            None => Ok(store.visible_fields()),
        }
    }

    pub fn export_to_writer<W: Write>(
        &self,
        store: &CollectionStore,
        writer: W,
    ) -> Result<(), ExportError> {
        if store.is_empty() {
            return Err(ExportError::NoEntries {
                store: store.name().to_string(),
            });
        }
        let columns = self.columns(store)?;

        let mut wtr = WriterBuilder::new()
            .delimiter(self.config.delimiter.as_byte())
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        wtr.write_record(&columns)?;
        for record in store.iter() {
            let row = columns.iter().map(|field| match record.score(field) {
                Some(value) => value.format_fixed(self.config.precision),
                None => self.config.sentinel.clone(),
            });
            wtr.write_record(row)?;
        }
        wtr.flush()?;

        debug!(
            "Exported {} rows x {} columns from '{}'",
            store.len(),
            columns.len(),
            store.name()
        );
        Ok(())
    }

    pub fn export_to_string(&self, store: &CollectionStore) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.export_to_writer(store, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes to `path`, creating or truncating it. Nothing is created when the
    /// collection is empty or a configured column is unknown.
    pub fn export_to_path(&self, store: &CollectionStore, path: &Path) -> Result<(), ExportError> {
        if store.is_empty() {
            return Err(ExportError::NoEntries {
                store: store.name().to_string(),
            });
        }
        self.columns(store)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.export_to_writer(store, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
