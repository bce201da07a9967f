use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Handle to a structural payload owned by a structure loader.
    pub struct PayloadKey;
}

/// 1-based rank of a pose within the file it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoseId(pub u32);

impl PoseId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of one model inside a [`StructuralPayload`](super::payload::StructuralPayload).
///
/// Models are numbered sequentially from 1. For formats that carry one structure per
/// pose the model reference of a freshly parsed record equals its [`PoseId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelRef(u32);

impl ModelRef {
    /// Returns `None` for index 0, which is not a valid model address.
    pub fn new(index: u32) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    pub fn first() -> Self {
        Self(1)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub(crate) fn from_position(position: usize) -> Self {
        Self(position as u32 + 1)
    }

    pub(crate) fn position(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl From<PoseId> for ModelRef {
    fn from(id: PoseId) -> Self {
        Self(id.0.max(1))
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
