//! Segmentation of PDB-style cluster files into poses.
//!
//! SwissDock writes every pose as a run of `REMARK` lines carrying its scores,
//! followed by a run of `ATOM`/`HETATM` lines. Any other record (`MODEL`, `TER`,
//! `ENDMDL`, `END`, ...) closes the current coordinate run.

use super::error::FormatError;
use crate::core::models::format::SourceFormat;
use crate::core::models::ids::{ModelRef, PoseId};
use crate::core::models::pose::PoseRecord;
use crate::core::models::score::ScoreSet;
use phf::{Set, phf_set};
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::warn;

/// Score keys SwissDock writes for every pose; their values must be numeric.
pub(crate) static SWISSDOCK_SCORE_KEYS: Set<&'static str> = phf_set! {
    "Cluster",
    "ClusterRank",
    "deltaG",
    "FullFitness",
    "Energy",
    "SimpleFitness",
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumberedLine {
    pub number: usize,
    pub content: String,
}

/// The raw lines of one pose, before any grammar is applied to its remarks.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawPose {
    pub remarks: Vec<NumberedLine>,
    pub first_atom: NumberedLine,
    pub atoms: Vec<String>,
}

pub(crate) fn is_coordinate_record(keyword: &str) -> bool {
    keyword.eq_ignore_ascii_case("ATOM") || keyword.eq_ignore_ascii_case("HETATM")
}

pub(crate) fn segment_poses(reader: &mut impl BufRead) -> Result<Vec<RawPose>, FormatError> {
    let mut poses = Vec::new();
    let mut pending_remarks: Vec<NumberedLine> = Vec::new();
    let mut current: Option<RawPose> = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        let trimmed = line.trim();
        let Some(keyword) = trimmed.split_whitespace().next() else {
            continue;
        };

        if is_coordinate_record(keyword) {
            let pose = current.get_or_insert_with(|| RawPose {
                remarks: std::mem::take(&mut pending_remarks),
                first_atom: NumberedLine {
                    number: line_num,
                    content: trimmed.to_string(),
                },
                atoms: Vec::new(),
            });
            pose.atoms.push(trimmed.to_string());
            continue;
        }

        if let Some(pose) = current.take() {
            poses.push(pose);
        }
        if keyword.eq_ignore_ascii_case("REMARK") {
            pending_remarks.push(NumberedLine {
                number: line_num,
                content: trimmed.to_string(),
            });
        }
    }

    if let Some(pose) = current.take() {
        poses.push(pose);
    }
    if let Some(first) = pending_remarks.first() {
        warn!(
            "Ignoring {} trailing REMARK line(s) from line {} with no coordinates after them.",
            pending_remarks.len(),
            first.number
        );
    }
    Ok(poses)
}

/// Strips the leading `REMARK` keyword from a remark line.
pub(crate) fn remark_body(content: &str) -> &str {
    content
        .trim_start()
        .get(6..)
        .map(str::trim)
        .unwrap_or("")
}

/// Assembles the record of the `index`-th (0-based) clustered pose once its remarks
/// have been interpreted. Every pose must name its cluster, its rank inside the
/// cluster and at least one energy term.
pub(crate) fn clustered_record(
    format: SourceFormat,
    index: usize,
    raw: &RawPose,
    scores: ScoreSet,
    mut extra: BTreeMap<String, String>,
    remark_text: Vec<String>,
) -> Result<PoseRecord, FormatError> {
    let at_pose = |reason: &str| {
        FormatError::malformed(raw.first_atom.number, &raw.first_atom.content, reason)
    };

    let cluster_index = |field: &str| -> Result<u32, FormatError> {
        let value = scores
            .get(field)
            .and_then(|v| v.as_integer())
            .ok_or_else(|| at_pose(&format!("pose has no '{}' remark", field)))?;
        u32::try_from(value).map_err(|_| at_pose(&format!("'{}' must not be negative", field)))
    };
    let cluster = cluster_index("Cluster")?;
    let rank = cluster_index("ClusterRank")?;

    if !scores
        .fields()
        .any(|field| field != "Cluster" && field != "ClusterRank")
    {
        return Err(at_pose("pose has no energy remark"));
    }

    if !remark_text.is_empty() {
        extra.insert("remark".to_string(), remark_text.join("\n"));
    }

    let id = PoseId(index as u32 + 1);
    Ok(PoseRecord::new(id, format, scores, ModelRef::from(id))
        .with_cluster(cluster, rank)
        .with_extra(extra))
}
