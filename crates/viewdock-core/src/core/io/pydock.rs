//! pyDock energy tables (`.ene` / `.eneRST`).
//!
//! The table is whitespace delimited: the first non-separator line names the
//! columns, every following line is one docked conformation. A same-stem `.pdb`
//! must sit next to the table and a `*_rec.pdb` in that directory is the receptor.
//!
//! When the directory also holds per-conformation `*_<Conf>.pdb` files, each pose
//! is addressed to its own file and rows whose file is missing are dropped.
//! Otherwise every pose shares the same-stem `.pdb`.

use super::detect::paired_structure_path;
use super::error::FormatError;
use super::traits::DockingFile;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use crate::core::models::ids::{ModelRef, PoseId};
use crate::core::models::payload::StructuralPayload;
use crate::core::models::pose::PoseRecord;
use crate::core::models::score::{ScoreSet, ScoreValue};
use std::fs::{self, File};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SEPARATOR_PREFIX: &str = "----";
const RECEPTOR_SUFFIX: &str = "_rec.pdb";
const CONF_COLUMN: &str = "Conf";

pub struct PyDockFile;

impl DockingFile for PyDockFile {
    const FORMAT: SourceFormat = SourceFormat::PyDock;

    fn read_from(reader: &mut impl BufRead, origin: &Path) -> Result<ParsedDocking, FormatError> {
        let structure = paired_structure_path(origin);
        if File::open(&structure).is_err() {
            return Err(FormatError::MissingPairedFile { path: structure });
        }

        let mut header: Option<Vec<String>> = None;
        let mut records = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || line.starts_with(SEPARATOR_PREFIX) {
                continue;
            }

            let Some(columns) = header.as_ref() else {
                header = Some(read_header(line_num, trimmed)?);
                continue;
            };

            let values: Vec<&str> = trimmed.split_whitespace().collect();
            if values.len() != columns.len() {
                return Err(FormatError::malformed(
                    line_num,
                    trimmed,
                    format!(
                        "expected {} columns to match the header, found {}",
                        columns.len(),
                        values.len()
                    ),
                ));
            }

            let mut scores = ScoreSet::new();
            for (column, raw) in columns.iter().zip(values) {
                let value = ScoreValue::parse_for(column, raw).ok_or_else(|| {
                    FormatError::malformed(
                        line_num,
                        trimmed,
                        format!("value '{}' of column '{}' is not numeric", raw, column),
                    )
                })?;
                scores.insert(column.as_str(), value);
            }

            let id = PoseId(records.len() as u32 + 1);
            records.push(PoseRecord::new(id, Self::FORMAT, scores, ModelRef::from(id)));
        }

        if header.is_none() {
            return Err(FormatError::malformed(0, "", "energy table has no header row"));
        }
        if records.is_empty() {
            return Err(FormatError::malformed(0, "", "energy table has no conformation rows"));
        }

        let directory = match origin.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let pdb_files = list_pdb_files(directory);
        let receptor = pdb_files
            .iter()
            .find(|path| file_name_ends_with(path, RECEPTOR_SUFFIX))
            .cloned();

        let parsed = match attach_conformations(records, &pdb_files) {
            Ok((records, files)) => ParsedDocking::new(
                Self::FORMAT,
                records,
                StructuralPayload::ConformationFiles(files),
            ),
            Err(records) => ParsedDocking::new(
                Self::FORMAT,
                records,
                StructuralPayload::PairedStructure { path: structure },
            ),
        };
        Ok(parsed.with_receptor(receptor))
    }
}

/// Pairs every record with its `*_<Conf>.pdb` file, dropping records without one
/// and renumbering the rest in table order.
///
/// Hands the records back untouched when no conformation file exists at all.
fn attach_conformations(
    records: Vec<PoseRecord>,
    pdb_files: &[PathBuf],
) -> Result<(Vec<PoseRecord>, Vec<PathBuf>), Vec<PoseRecord>> {
    let matches: Vec<Option<PathBuf>> = records
        .iter()
        .map(|record| {
            let conf = record.score(CONF_COLUMN)?.as_integer()?;
            let suffix = format!("_{}.pdb", conf);
            pdb_files
                .iter()
                .find(|path| file_name_ends_with(path, &suffix))
                .cloned()
        })
        .collect();

    if matches.iter().all(Option::is_none) {
        return Err(records);
    }

    let total = records.len();
    let (kept, files): (Vec<PoseRecord>, Vec<PathBuf>) = records
        .into_iter()
        .zip(matches)
        .filter_map(|(record, file)| file.map(|file| (record, file)))
        .unzip();
    if kept.len() < total {
        warn!(
            "{} of {} conformations listed in the energy table have no structure file and were skipped.",
            total - kept.len(),
            total
        );
    }

    let records = kept
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            record.renumbered(PoseId(position as u32 + 1), ModelRef::from_position(position))
        })
        .collect();
    Ok((records, files))
}

fn read_header(line_num: usize, line: &str) -> Result<Vec<String>, FormatError> {
    let mut columns: Vec<String> = Vec::new();
    for name in line.split_whitespace() {
        if columns.iter().any(|c| c == name) {
            return Err(FormatError::malformed(
                line_num,
                line,
                format!("column '{}' appears twice in the header", name),
            ));
        }
        columns.push(name.to_string());
    }
    Ok(columns)
}

/// `.pdb` files in `directory`, in file name order.
fn list_pdb_files(directory: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("Cannot list '{}' for structures: {}", directory.display(), err);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| file_name_ends_with(path, ".pdb"))
        .collect();
    files.sort();
    files
}

fn file_name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}
