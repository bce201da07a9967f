use super::export::export_docked_data;
use super::load::{self, LoadedObject};
use crate::core::io::detect::detect_from_path;
use crate::core::models::format::SourceFormat;
use crate::core::models::ids::{ModelRef, PoseId};
use crate::core::models::payload::ModelView;
use crate::engine::config::{ExportConfig, LoadConfig, LoadConfigBuilder, SwissDockMode};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::store::CollectionStore;
use crate::engine::structure::{InMemoryLoader, StructureLoader};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use tracing::{info, warn};

/// Loaded objects by name, plus the loader that owns their structures.
///
/// Loading under a name that is already taken replaces the old collection and
/// drops its structures; collections are never merged.
pub struct Session<L: StructureLoader = InMemoryLoader> {
    loader: L,
    stores: HashMap<String, CollectionStore>,
}

impl Default for Session<InMemoryLoader> {
    fn default() -> Self {
        Self::new(InMemoryLoader::new())
    }
}

impl<L: StructureLoader> Session<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            stores: HashMap::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Loads `path` with `config` and returns the names of the objects created.
    pub fn load(
        &mut self,
        path: &Path,
        config: &LoadConfig,
        reporter: &ProgressReporter,
    ) -> Result<Vec<String>, EngineError> {
        let objects = load::run(path, config, reporter)?;
        reporter.phase("Structure hand-off", || {
            objects
                .into_iter()
                .map(|object| self.insert(object))
                .collect()
        })
    }

    /// Loads an AutoDock Vina `.pdbqt` file.
    pub fn load_pdbqt(
        &mut self,
        filename: &Path,
        object: Option<&str>,
    ) -> Result<&CollectionStore, EngineError> {
        let config = with_object(LoadConfigBuilder::new(), object)
            .format(SourceFormat::Vina)
            .build()?;
        self.load_single(filename, &config)
    }

    /// Loads a SwissDock `.dock4` file (or Attracting Cavities `.chimerax`).
    ///
    /// Returns one name in `All` and `Leaders` mode and one name per cluster in
    /// `Split` mode.
    pub fn load_dock4(
        &mut self,
        filename: &Path,
        object: Option<&str>,
        mode: SwissDockMode,
    ) -> Result<Vec<String>, EngineError> {
        let config = with_object(LoadConfigBuilder::new(), object)
            .format(SourceFormat::SwissDock)
            .swissdock_mode(mode)
            .build()?;
        self.load(filename, &config, &ProgressReporter::new())
    }

    /// Loads a `.chimerax` file in either the legacy or the Attracting Cavities
    /// layout.
    pub fn load_chimerax(
        &mut self,
        filename: &Path,
        object: Option<&str>,
    ) -> Result<&CollectionStore, EngineError> {
        let format = detect_from_path(filename)?;
        if !matches!(format, SourceFormat::LegacyChimerax | SourceFormat::SwissDock) {
            return Err(EngineError::InvalidOption {
                operation: "load_chimerax",
                reason: format!("'{}' holds {} results", filename.display(), format),
            });
        }
        let config = with_object(LoadConfigBuilder::new(), object)
            .format(format)
            .build()?;
        self.load_single(filename, &config)
    }

    /// Loads a pyDock `.ene`/`.eneRST` table, keeping at most `max_n` rows
    /// (100 when not given).
    pub fn load_pydock(
        &mut self,
        filename: &Path,
        object: Option<&str>,
        max_n: Option<usize>,
    ) -> Result<&CollectionStore, EngineError> {
        let mut builder = with_object(LoadConfigBuilder::new(), object).format(SourceFormat::PyDock);
        if let Some(max_n) = max_n {
            builder = builder.max_n(max_n);
        }
        self.load_single(filename, &builder.build()?)
    }

    /// Loads a multi-frame `.xyz` file.
    pub fn load_xyz(
        &mut self,
        filename: &Path,
        object: Option<&str>,
    ) -> Result<&CollectionStore, EngineError> {
        let config = with_object(LoadConfigBuilder::new(), object)
            .format(SourceFormat::Xyz)
            .build()?;
        self.load_single(filename, &config)
    }

    pub fn store(&self, object: &str) -> Option<&CollectionStore> {
        self.stores.get(object)
    }

    pub fn store_mut(&mut self, object: &str) -> Option<&mut CollectionStore> {
        self.stores.get_mut(object)
    }

    /// Names of the loaded objects, sorted.
    pub fn objects(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Discards an object and its structures.
    pub fn remove(&mut self, object: &str) -> Option<CollectionStore> {
        let removed = self.stores.remove(object);
        if removed.is_some() {
            self.loader.unload(object);
        }
        removed
    }

    /// Resolves a table selection into the model the viewer should show.
    pub fn select(&self, object: &str, id: PoseId) -> Result<ModelRef, EngineError> {
        let store = self.require(object)?;
        Ok(store.get(id)?.model_ref())
    }

    pub fn model(&self, object: &str, id: PoseId) -> Result<ModelView<'_>, EngineError> {
        let model_ref = self.select(object, id)?;
        Ok(self.loader.model(object, model_ref)?)
    }

    pub fn export_docked_data(
        &self,
        object: &str,
        filename: &Path,
        format: Option<&str>,
        config: &ExportConfig,
    ) -> Result<(), EngineError> {
        let store = self.require(object)?;
        export_docked_data(store, filename, format, config, &ProgressReporter::new())
    }

    fn require(&self, object: &str) -> Result<&CollectionStore, EngineError> {
        self.stores
            .get(object)
            .ok_or_else(|| EngineError::UnknownObject(object.to_string()))
    }

    fn load_single(
        &mut self,
        filename: &Path,
        config: &LoadConfig,
    ) -> Result<&CollectionStore, EngineError> {
        let names = self.load(filename, config, &ProgressReporter::new())?;
        let [name] = names.as_slice() else {
            return Err(EngineError::Internal(format!(
                "expected one object from '{}', got {}",
                filename.display(),
                names.len()
            )));
        };
        self.require(name)
    }

    fn insert(&mut self, object: LoadedObject) -> Result<String, EngineError> {
        let name = object.name().to_string();
        if self.stores.contains_key(&name) {
            self.loader.unload(&name);
        }
        if object.store.is_empty() {
            warn!("Object '{}' has no poses; no structures handed to the viewer.", name);
        } else {
            self.loader
                .load_structures(&name, object.payload, object.receptor.as_deref())?;
        }

        match self.stores.entry(name.clone()) {
            Entry::Occupied(mut slot) => {
                info!("Replaced existing object '{}'.", name);
                slot.insert(object.store);
            }
            Entry::Vacant(slot) => {
                slot.insert(object.store);
            }
        }
        Ok(name)
    }
}

fn with_object(builder: LoadConfigBuilder, object: Option<&str>) -> LoadConfigBuilder {
    match object {
        Some(name) => builder.object_name(name),
        None => builder,
    }
}
