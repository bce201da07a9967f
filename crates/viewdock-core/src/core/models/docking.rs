use super::format::SourceFormat;
use super::ids::{ModelRef, PoseId};
use super::payload::StructuralPayload;
use super::pose::PoseRecord;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Everything a reader extracts from one docking result file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocking {
    pub format: SourceFormat,
    /// Poses in file order, with ids `1..=n`.
    pub records: Vec<PoseRecord>,
    pub payload: StructuralPayload,
    /// Receptor/target structure found next to the input, if any.
    pub receptor: Option<PathBuf>,
}

impl ParsedDocking {
    pub fn new(format: SourceFormat, records: Vec<PoseRecord>, payload: StructuralPayload) -> Self {
        Self {
            format,
            records,
            payload,
            receptor: None,
        }
    }

    pub fn with_receptor(mut self, receptor: Option<PathBuf>) -> Self {
        self.receptor = receptor;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps the first `max_n` poses. Applied after a complete parse, so the
    /// records kept never depend on the limit.
    pub fn truncate(self, max_n: usize) -> Self {
        if max_n >= self.records.len() {
            return self;
        }
        self.select(|_, index| index < max_n)
    }

    /// Keeps the poses matching `keep`, renumbering ids and model references
    /// `1..=n` in file order and rebuilding the payload to match.
    pub fn select(self, mut keep: impl FnMut(&PoseRecord, usize) -> bool) -> Self {
        let kept: Vec<PoseRecord> = self
            .records
            .into_iter()
            .enumerate()
            .filter(|(index, record)| keep(record, *index))
            .map(|(_, record)| record)
            .collect();

        let refs: Vec<ModelRef> = kept.iter().map(PoseRecord::model_ref).collect();
        let payload = self.payload.select(&refs);
        let records = kept
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                record.renumbered(
                    PoseId(position as u32 + 1),
                    ModelRef::from_position(position),
                )
            })
            .collect();

        Self {
            format: self.format,
            records,
            payload,
            receptor: self.receptor,
        }
    }

    /// Splits clustered results into one docking set per cluster, in ascending
    /// cluster order. Poses without a cluster index are grouped under `None`.
    pub fn split_by_cluster(self) -> Vec<(Option<u32>, ParsedDocking)> {
        let clusters: BTreeSet<Option<u32>> = self.records.iter().map(PoseRecord::cluster).collect();
        clusters
            .into_iter()
            .map(|cluster| {
                let part = self.clone().select(|record, _| record.cluster() == cluster);
                (cluster, part)
            })
            .collect()
    }
}
