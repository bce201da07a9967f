//! Boundary between parsed docking results and whatever displays their structures.
//!
//! A loader takes ownership of the structural payload of a loaded object and later
//! resolves [`ModelRef`]s into concrete models. Records never hold coordinates
//! themselves.

use crate::core::models::ids::{ModelRef, PayloadKey};
use crate::core::models::payload::{ModelView, StructuralPayload};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("No structures are loaded for object '{object}'")]
    UnknownObject { object: String },

    #[error("Object '{object}' has no model {model}")]
    ModelOutOfRange { object: String, model: ModelRef },

    #[error("Structure loader rejected object '{object}': {reason}")]
    Rejected { object: String, reason: String },
}

/// Receives structures from loaded docking results.
///
/// `load_structures` for an object that already holds structures replaces them.
pub trait StructureLoader {
    fn load_structures(
        &mut self,
        object: &str,
        payload: StructuralPayload,
        receptor: Option<&Path>,
    ) -> Result<(), StructureError>;

    /// Drops the structures of `object`. Unknown objects are ignored.
    fn unload(&mut self, object: &str);

    fn model(&self, object: &str, model_ref: ModelRef) -> Result<ModelView<'_>, StructureError>;
}

#[derive(Debug)]
struct LoadedStructures {
    payload: StructuralPayload,
    receptor: Option<PathBuf>,
}

/// Keeps payloads in memory, addressed by generated [`PayloadKey`] handles.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    payloads: SlotMap<PayloadKey, LoadedStructures>,
    objects: HashMap<String, PayloadKey>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn contains(&self, object: &str) -> bool {
        self.objects.contains_key(object)
    }

    pub fn receptor(&self, object: &str) -> Option<&Path> {
        self.entry(object).ok()?.receptor.as_deref()
    }

    fn entry(&self, object: &str) -> Result<&LoadedStructures, StructureError> {
        self.objects
            .get(object)
            .and_then(|&key| self.payloads.get(key))
            .ok_or_else(|| StructureError::UnknownObject {
                object: object.to_string(),
            })
    }
}

impl StructureLoader for InMemoryLoader {
    fn load_structures(
        &mut self,
        object: &str,
        payload: StructuralPayload,
        receptor: Option<&Path>,
    ) -> Result<(), StructureError> {
        if payload.model_count() == Some(0) {
            return Err(StructureError::Rejected {
                object: object.to_string(),
                reason: "payload contains no models".to_string(),
            });
        }
        self.unload(object);
        let key = self.payloads.insert(LoadedStructures {
            payload,
            receptor: receptor.map(Path::to_path_buf),
        });
        debug!("Stored structures of '{}' under {:?}", object, key);
        self.objects.insert(object.to_string(), key);
        Ok(())
    }

    fn unload(&mut self, object: &str) {
        if let Some(key) = self.objects.remove(object) {
            self.payloads.remove(key);
        }
    }

    fn model(&self, object: &str, model_ref: ModelRef) -> Result<ModelView<'_>, StructureError> {
        self.entry(object)?
            .payload
            .model(model_ref)
            .ok_or_else(|| StructureError::ModelOutOfRange {
                object: object.to_string(),
                model: model_ref,
            })
    }
}
