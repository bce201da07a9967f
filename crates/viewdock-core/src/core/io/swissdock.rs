//! SwissDock cluster files (`.dock4` and Attracting Cavities `.chimerax`).
//!
//! Scores are written as `REMARK <Key>: <number>` lines ahead of each pose's
//! coordinates. `Cluster` and `ClusterRank` are integers, everything else is real.

use super::blocks::{self, NumberedLine, RawPose, SWISSDOCK_SCORE_KEYS};
use super::error::FormatError;
use super::traits::DockingFile;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use crate::core::models::payload::{PdbModel, StructuralPayload};
use crate::core::models::pose::PoseRecord;
use crate::core::models::score::{ScoreSet, ScoreValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

static REMARK_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^REMARK\s+(\w+)\s*:\s*(\S+)\s*$").expect("valid REMARK score pattern")
});

pub struct Dock4File;

impl DockingFile for Dock4File {
    const FORMAT: SourceFormat = SourceFormat::SwissDock;

    fn read_from(reader: &mut impl BufRead, _origin: &Path) -> Result<ParsedDocking, FormatError> {
        let raw_poses = blocks::segment_poses(reader)?;
        if raw_poses.is_empty() {
            return Err(FormatError::malformed(0, "", "no SwissDock poses found in file"));
        }

        let mut records = Vec::with_capacity(raw_poses.len());
        let mut models = Vec::with_capacity(raw_poses.len());
        for (index, raw) in raw_poses.into_iter().enumerate() {
            records.push(pose_record(index, &raw)?);
            models.push(PdbModel::new(raw.atoms));
        }

        Ok(ParsedDocking::new(
            Self::FORMAT,
            records,
            StructuralPayload::PdbModels(models),
        ))
    }
}

fn pose_record(index: usize, raw: &RawPose) -> Result<PoseRecord, FormatError> {
    let mut scores = ScoreSet::new();
    let mut extra = BTreeMap::new();
    let mut remark_text = Vec::new();

    for remark in &raw.remarks {
        if !read_colon_score(remark, &mut scores, &mut extra)? {
            let body = blocks::remark_body(&remark.content);
            if !body.is_empty() {
                remark_text.push(body.to_string());
            }
        }
    }

    blocks::clustered_record(Dock4File::FORMAT, index, raw, scores, extra, remark_text)
}

/// Applies the `REMARK <Key>: <value>` grammar to one REMARK line.
///
/// Returns `false` when the line does not follow the grammar. Known SwissDock
/// keys must carry a number; other non-numeric values are kept in `extra`.
pub(super) fn read_colon_score(
    remark: &NumberedLine,
    scores: &mut ScoreSet,
    extra: &mut BTreeMap<String, String>,
) -> Result<bool, FormatError> {
    let Some(caps) = REMARK_SCORE.captures(&remark.content) else {
        return Ok(false);
    };
    let key = &caps[1];
    let value = &caps[2];
    match ScoreValue::parse_for(key, value) {
        Some(parsed) => {
            scores.insert(key, parsed);
        }
        None if SWISSDOCK_SCORE_KEYS.contains(key) => {
            return Err(FormatError::malformed(
                remark.number,
                &remark.content,
                format!("value of '{}' is not a valid number", key),
            ));
        }
        None => {
            extra.insert(key.to_string(), value.to_string());
        }
    }
    Ok(true)
}
