//! AutoDock Vina `.pdbqt` output.
//!
//! Every pose is a `MODEL` ... `ENDMDL` block whose `REMARK VINA RESULT:` line holds
//! the affinity and the lower/upper RMSD bounds, in that column order.

use super::error::FormatError;
use super::traits::DockingFile;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use crate::core::models::ids::{ModelRef, PoseId};
use crate::core::models::payload::{PdbModel, StructuralPayload};
use crate::core::models::pose::PoseRecord;
use crate::core::models::score::{ScoreSet, ScoreValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

pub const AFFINITY: &str = "Affinity";
pub const RMSD_LOWER: &str = "RMSD lb";
pub const RMSD_UPPER: &str = "RMSD ub";

static VINA_RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^REMARK\s+VINA\s+RESULT:\s*(.*)$").expect("valid VINA RESULT pattern")
});
static NAMED_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^REMARK\s+([A-Za-z][A-Za-z +]*?)\s*:\s*(\S+)\s*$").expect("valid energy term pattern")
});

pub struct VinaFile;

#[derive(Debug)]
struct OpenModel {
    line: usize,
    content: String,
    serial: Option<String>,
    result: Option<[f64; 3]>,
    terms: Vec<(String, f64)>,
    remarks: Vec<String>,
    atoms: Vec<String>,
}

impl OpenModel {
    fn new(line: usize, content: &str) -> Self {
        Self {
            line,
            content: content.to_string(),
            serial: content.split_whitespace().nth(1).map(str::to_string),
            result: None,
            terms: Vec::new(),
            remarks: Vec::new(),
            atoms: Vec::new(),
        }
    }

    fn finish(self, ordinal: usize) -> Result<(PoseRecord, PdbModel), FormatError> {
        let [affinity, rmsd_lb, rmsd_ub] = self.result.ok_or_else(|| {
            FormatError::malformed(self.line, &self.content, "model has no 'REMARK VINA RESULT:' line")
        })?;

        let mut scores = ScoreSet::new();
        scores.insert(AFFINITY, ScoreValue::Real(affinity));
        scores.insert(RMSD_LOWER, ScoreValue::Real(rmsd_lb));
        scores.insert(RMSD_UPPER, ScoreValue::Real(rmsd_ub));
        for (name, value) in self.terms {
            scores.insert(name, ScoreValue::Real(value));
        }

        let mut extra = BTreeMap::new();
        if let Some(serial) = self.serial {
            extra.insert("model".to_string(), serial);
        }
        if !self.remarks.is_empty() {
            extra.insert("remark".to_string(), self.remarks.join("\n"));
        }

        let id = PoseId(ordinal as u32);
        let record = PoseRecord::new(id, SourceFormat::Vina, scores, ModelRef::from(id))
            .with_extra(extra);
        Ok((record, PdbModel::new(self.atoms)))
    }
}

impl DockingFile for VinaFile {
    const FORMAT: SourceFormat = SourceFormat::Vina;

    fn read_from(reader: &mut impl BufRead, _origin: &Path) -> Result<ParsedDocking, FormatError> {
        let mut records = Vec::new();
        let mut models = Vec::new();
        let mut current: Option<OpenModel> = None;
        let mut last_line = 0;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            last_line = line_num;

            let keyword = line.split_whitespace().next().unwrap_or("");
            match keyword {
                "MODEL" => {
                    if current.is_some() {
                        return Err(FormatError::malformed(
                            line_num,
                            &line,
                            "MODEL opened before the previous one was closed",
                        ));
                    }
                    current = Some(OpenModel::new(line_num, &line));
                }
                "ENDMDL" => {
                    let model = current.take().ok_or_else(|| {
                        FormatError::malformed(line_num, &line, "ENDMDL without a matching MODEL")
                    })?;
                    let (record, structure) = model.finish(records.len() + 1)?;
                    records.push(record);
                    models.push(structure);
                }
                "REMARK" => {
                    if let Some(model) = current.as_mut() {
                        read_remark(model, line_num, &line)?;
                    }
                }
                "ATOM" | "HETATM" => match current.as_mut() {
                    Some(model) => model.atoms.push(line),
                    None => {
                        return Err(FormatError::malformed(
                            line_num,
                            &line,
                            "coordinates outside of a MODEL block",
                        ));
                    }
                },
                _ => {}
            }
        }

        if let Some(model) = current {
            return Err(FormatError::malformed(
                model.line,
                &model.content,
                "MODEL is never closed by ENDMDL",
            ));
        }
        if records.is_empty() {
            return Err(FormatError::malformed(last_line, "", "no MODEL blocks found"));
        }

        Ok(ParsedDocking::new(
            Self::FORMAT,
            records,
            StructuralPayload::PdbModels(models),
        ))
    }
}

fn read_remark(model: &mut OpenModel, line_num: usize, line: &str) -> Result<(), FormatError> {
    if let Some(caps) = VINA_RESULT.captures(line) {
        if model.result.is_some() {
            return Err(FormatError::malformed(
                line_num,
                line,
                "model has more than one VINA RESULT line",
            ));
        }
        let values: Vec<f64> = caps[1]
            .split_whitespace()
            .take(3)
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| {
                FormatError::malformed(line_num, line, "VINA RESULT values are not numeric")
            })?;
        let [affinity, lower, upper] = values[..] else {
            return Err(FormatError::malformed(
                line_num,
                line,
                "VINA RESULT needs affinity, RMSD lower bound and RMSD upper bound",
            ));
        };
        model.result = Some([affinity, lower, upper]);
        return Ok(());
    }

    if let Some(caps) = NAMED_TERM.captures(line) {
        if let Ok(value) = caps[2].parse::<f64>() {
            model.terms.push((caps[1].trim().to_string(), value));
            return Ok(());
        }
    }

    let body = line.trim_start().get(6..).map(str::trim).unwrap_or("");
    if !body.is_empty() {
        model.remarks.push(body.to_string());
    }
    Ok(())
}
