//! Legacy SwissDock/EADock `.chimerax` web-data files.
//!
//! The `.chimerax` document is a small XML file naming a target structure
//! (`<file loc="...">` inside `<web_files>`) and a cluster `.pdb` opened by the
//! embedded `<py_cmd>`. Both are resolved by file name next to the `.chimerax`
//! file; nothing is fetched over the network. Pose scores live in the cluster
//! file's REMARK lines, either as `KEY = VALUE` pairs or in the `Key: value`
//! form of `.dock4` files.

use super::blocks::{self, NumberedLine, RawPose, SWISSDOCK_SCORE_KEYS};
use super::error::FormatError;
use super::swissdock::read_colon_score;
use super::traits::DockingFile;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use crate::core::models::payload::{PdbModel, StructuralPayload};
use crate::core::models::pose::PoseRecord;
use crate::core::models::score::{ScoreSet, ScoreValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static TARGET_LOC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<web_files>.*?<file\b[^>]*\bloc\s*=\s*"([^"]+)""#)
        .expect("valid target location pattern")
});
static PY_CMD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<py_cmd>(.*?)</py_cmd>").expect("valid py_cmd pattern")
});
static CLUSTER_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+\.pdb)""#).expect("valid cluster file pattern"));

pub struct LegacyChimeraxFile;

/// Sibling files referenced by a legacy `.chimerax` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ChimeraxReferences {
    pub target: Option<PathBuf>,
    pub cluster: PathBuf,
}

impl DockingFile for LegacyChimeraxFile {
    const FORMAT: SourceFormat = SourceFormat::LegacyChimerax;

    fn read_from(reader: &mut impl BufRead, origin: &Path) -> Result<ParsedDocking, FormatError> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;

        let directory = origin.parent().unwrap_or_else(|| Path::new(""));
        let references = resolve_references(&document, directory)?;

        let cluster_file = File::open(&references.cluster).map_err(|_| {
            FormatError::MissingPairedFile {
                path: references.cluster.clone(),
            }
        })?;
        debug!("Reading legacy SwissDock cluster file {:?}", references.cluster);
        let raw_poses = blocks::segment_poses(&mut BufReader::new(cluster_file))?;
        if raw_poses.is_empty() {
            return Err(FormatError::malformed(
                0,
                "",
                format!("no poses found in cluster file '{}'", references.cluster.display()),
            ));
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
        )
        .with_receptor(references.target))
    }
}

/// Extracts the target and cluster file names from a `.chimerax` document and
/// resolves them inside `directory`.
///
/// # Errors
///
/// Returns [`FormatError::MalformedRecord`] if the document names no cluster file,
/// and [`FormatError::MissingPairedFile`] if the cluster file is not present.
pub fn resolve_references(document: &str, directory: &Path) -> Result<ChimeraxReferences, FormatError> {
    let py_cmd = PY_CMD.captures(document).ok_or_else(|| {
        FormatError::malformed(0, "", "document has no <py_cmd> element naming the cluster file")
    })?;
    let command = py_cmd.get(1).map_or("", |m| m.as_str());
    let command_offset = py_cmd.get(0).map_or(0, |m| m.start());

    let cluster_name = CLUSTER_FILE
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| file_name(m.as_str()))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            let (line, content) = line_at(document, command_offset);
            FormatError::malformed(line, content, "<py_cmd> does not reference a cluster .pdb file")
        })?;

    let cluster = directory.join(cluster_name);
    if !cluster.is_file() {
        return Err(FormatError::MissingPairedFile { path: cluster });
    }

    let target = TARGET_LOC
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| directory.join(file_name(m.as_str())))
        .and_then(|path| {
            if path.is_file() {
                Some(path)
            } else {
                warn!("Target structure {:?} named by the chimerax file was not found locally.", path);
                None
            }
        });

    Ok(ChimeraxReferences { target, cluster })
}

fn file_name(location: &str) -> &str {
    location.rsplit(['/', '\\']).next().unwrap_or(location).trim()
}

fn line_at(document: &str, offset: usize) -> (usize, &str) {
    let line = document[..offset].matches('\n').count() + 1;
    let content = document.lines().nth(line - 1).unwrap_or("");
    (line, content.trim())
}

fn pose_record(index: usize, raw: &RawPose) -> Result<PoseRecord, FormatError> {
    let mut scores = ScoreSet::new();
    let mut extra = BTreeMap::new();
    let mut remark_text = Vec::new();

    for remark in &raw.remarks {
        read_pairs(remark, &mut scores, &mut extra, &mut remark_text)?;
    }

    blocks::clustered_record(
        LegacyChimeraxFile::FORMAT,
        index,
        raw,
        scores,
        extra,
        remark_text,
    )
}

/// Applies the `KEY = VALUE` grammar to one REMARK line. Lines without any `=`
/// token are read as `Key: value`, and are free text when that fails too.
fn read_pairs(
    remark: &NumberedLine,
    scores: &mut ScoreSet,
    extra: &mut BTreeMap<String, String>,
    remark_text: &mut Vec<String>,
) -> Result<(), FormatError> {
    let body = blocks::remark_body(&remark.content);
    let tokens: Vec<&str> = body
        .split_whitespace()
        .filter(|token| !matches!(*token, ";" | ","))
        .collect();

    if !tokens.contains(&"=") {
        if read_colon_score(remark, scores, extra)? {
            return Ok(());
        }
        if !body.is_empty() {
            remark_text.push(body.to_string());
        }
        return Ok(());
    }

    let malformed = |reason: String| FormatError::malformed(remark.number, &remark.content, reason);

    for pair in tokens.chunks(3) {
        let (key, value) = match pair {
            [key, "=", value] if *key != "=" && *value != "=" => {
                (*key, value.trim_end_matches([';', ',']))
            }
            _ => {
                return Err(malformed(format!(
                    "expected 'KEY = VALUE' pairs, found '{}'",
                    pair.join(" ")
                )));
            }
        };

        if SWISSDOCK_SCORE_KEYS.contains(key) {
            let parsed = ScoreValue::parse_for(key, value).ok_or_else(|| {
                malformed(format!("value of '{}' is not a valid number", key))
            })?;
            scores.insert(key, parsed);
        } else {
            extra.insert(key.to_string(), value.to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"<?xml version="1.0"?>
<ChimeraPuppet type="std_webdata">
<web_files>
<file name="target.pdb" format="text" loc="http://www.swissdock.ch/files/tmp/123/target.pdb"/>
</web_files>
<commands>
  <py_cmd>
chimera.openModels.open("http://www.swissdock.ch/files/tmp/123/clusters.dock4.pdb", type="PDB")
  </py_cmd>
</commands>
</ChimeraPuppet>
"#;

    const CLUSTER: &str = "\
REMARK  Cluster = 0 ; ClusterRank = 0 ; deltaG = -7.26
REMARK  FullFitness = -1820.55  Solver = EADock
ATOM      1  C1  LIG     1       1.000   2.000   3.000
TER
REMARK  Cluster = 0 ; ClusterRank = 1 ; deltaG = -7.02
REMARK  FullFitness = -1818.10  Solver = EADock
REMARK  generated by EADock DSS
ATOM      1  C1  LIG     1       1.200   2.000   3.000
END
";

    fn write_fixture(with_target: bool) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let chimerax = dir.path().join("result.chimerax");
        fs::write(&chimerax, DOCUMENT).unwrap();
        fs::write(dir.path().join("clusters.dock4.pdb"), CLUSTER).unwrap();
        if with_target {
            fs::write(dir.path().join("target.pdb"), "END\n").unwrap();
        }
        (dir, chimerax)
    }

    #[test]
    fn reads_pairs_from_local_cluster_file() {
        let (dir, chimerax) = write_fixture(true);
        let parsed = LegacyChimeraxFile::read_from_path(&chimerax).unwrap();

        assert_eq!(parsed.format, SourceFormat::LegacyChimerax);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.receptor, Some(dir.path().join("target.pdb")));

        let second = &parsed.records[1];
        assert_eq!(second.cluster_rank(), Some(1));
        assert_eq!(second.score("deltaG"), Some(ScoreValue::Real(-7.02)));
        assert_eq!(second.score("FullFitness"), Some(ScoreValue::Real(-1818.10)));
        assert_eq!(second.extra().get("Solver").unwrap(), "EADock");
        assert_eq!(second.extra().get("remark").unwrap(), "generated by EADock DSS");
        assert!(second.score("Solver").is_none());
    }

    #[test]
    fn colon_style_cluster_file_is_read() {
        let (dir, chimerax) = write_fixture(true);
        fs::write(
            dir.path().join("clusters.dock4.pdb"),
            "\
REMARK  Cluster: 0
REMARK  ClusterRank: 0
REMARK  deltaG: -8.20
ATOM      1  C1  LIG     1       1.000   2.000   3.000
TER
REMARK  Cluster: 1
REMARK  ClusterRank: 0
REMARK  deltaG: -7.95
REMARK  generated by EADock DSS
ATOM      1  C1  LIG     1       1.200   2.000   3.000
END
",
        )
        .unwrap();

        let parsed = LegacyChimeraxFile::read_from_path(&chimerax).unwrap();
        assert_eq!(parsed.len(), 2);
        let second = &parsed.records[1];
        assert_eq!(second.cluster(), Some(1));
        assert_eq!(second.cluster_rank(), Some(0));
        assert_eq!(second.score("deltaG"), Some(ScoreValue::Real(-7.95)));
        assert_eq!(second.extra().get("remark").unwrap(), "generated by EADock DSS");
    }

    #[test]
    fn missing_target_is_tolerated() {
        let (_dir, chimerax) = write_fixture(false);
        let parsed = LegacyChimeraxFile::read_from_path(&chimerax).unwrap();
        assert!(parsed.receptor.is_none());
    }

    #[test]
    fn missing_cluster_file_is_reported() {
        let dir = tempdir().unwrap();
        let chimerax = dir.path().join("result.chimerax");
        fs::write(&chimerax, DOCUMENT).unwrap();

        match LegacyChimeraxFile::read_from_path(&chimerax) {
            Err(FormatError::MissingPairedFile { path }) => {
                assert_eq!(path, dir.path().join("clusters.dock4.pdb"))
            }
            other => panic!("expected MissingPairedFile, got {:?}", other),
        }
    }

    #[test]
    fn document_without_py_cmd_is_malformed() {
        let document = "<ChimeraPuppet type=\"std_webdata\">\n</ChimeraPuppet>\n";
        let result = resolve_references(document, Path::new("."));
        assert!(matches!(result, Err(FormatError::MalformedRecord { .. })));
    }

    #[test]
    fn py_cmd_without_pdb_reports_its_line() {
        let document = "<ChimeraPuppet>\n<commands>\n<py_cmd>print('hi')</py_cmd>\n</commands>\n";
        match resolve_references(document, Path::new(".")) {
            Err(FormatError::MalformedRecord { line, content, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(content, "<py_cmd>print('hi')</py_cmd>");
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn dangling_equals_sign_is_malformed() {
        let remark = NumberedLine {
            number: 7,
            content: "REMARK Cluster = 0 deltaG =".to_string(),
        };
        let result = read_pairs(
            &remark,
            &mut ScoreSet::new(),
            &mut BTreeMap::new(),
            &mut Vec::new(),
        );
        match result {
            Err(FormatError::MalformedRecord { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_known_key_is_malformed() {
        let remark = NumberedLine {
            number: 1,
            content: "REMARK deltaG = high".to_string(),
        };
        let result = read_pairs(
            &remark,
            &mut ScoreSet::new(),
            &mut BTreeMap::new(),
            &mut Vec::new(),
        );
        assert!(matches!(result, Err(FormatError::MalformedRecord { .. })));
    }
}
