use super::format::SourceFormat;
use super::ids::{ModelRef, PoseId};
use super::score::{ScoreSet, ScoreValue};
use std::collections::BTreeMap;

/// One docking result, normalized across all supported formats.
///
/// Records are immutable once built by a reader: scores are exposed read-only and no
/// raw file text is kept, only derived values and the [`ModelRef`] addressing the
/// pose's coordinates in the accompanying structural payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    id: PoseId,
    source_format: SourceFormat,
    scores: ScoreSet,
    cluster: Option<u32>,
    cluster_rank: Option<u32>,
    model_ref: ModelRef,
    extra: BTreeMap<String, String>,
}

impl PoseRecord {
    pub fn new(
        id: PoseId,
        source_format: SourceFormat,
        scores: ScoreSet,
        model_ref: ModelRef,
    ) -> Self {
        Self {
            id,
            source_format,
            scores,
            cluster: None,
            cluster_rank: None,
            model_ref,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_cluster(mut self, cluster: u32, rank: u32) -> Self {
        self.cluster = Some(cluster);
        self.cluster_rank = Some(rank);
        self
    }

    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn id(&self) -> PoseId {
        self.id
    }

    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }

    pub fn scores(&self) -> &ScoreSet {
        &self.scores
    }

    pub fn score(&self, field: &str) -> Option<ScoreValue> {
        self.scores.get(field)
    }

    pub fn cluster(&self) -> Option<u32> {
        self.cluster
    }

    pub fn cluster_rank(&self) -> Option<u32> {
        self.cluster_rank
    }

    pub fn model_ref(&self) -> ModelRef {
        self.model_ref
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Re-addresses the record after filtering, e.g. keeping only cluster leaders.
    pub(crate) fn renumbered(mut self, id: PoseId, model_ref: ModelRef) -> Self {
        self.id = id;
        self.model_ref = model_ref;
        self
    }
}
