//! Docking format detection.
//!
//! Detection is a fixed decision per file extension, refined by a content signature
//! where one extension covers several layouts. There is no scoring between
//! candidates: extensions are mutually exclusive, so at most one rule applies.

use super::error::FormatError;
use crate::core::models::format::SourceFormat;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Number of leading non-empty lines inspected for header signatures.
const PEEK_LINES: usize = 20;

const ATTRACTING_CAVITIES_MARKER: &str = "attracting cavities";
const LEGACY_CHIMERAX_TOKENS: [&str; 3] = ["<ChimeraPuppet", "<web_files", "<py_cmd"];

/// Detects the docking format of the file at `path`, reading its content.
///
/// # Errors
///
/// Returns [`FormatError::UnrecognizedFormat`] when no rule matches,
/// [`FormatError::MissingPairedFile`] for pyDock tables without their `.pdb`, or an
/// I/O error if the file cannot be read.
pub fn detect_from_path(path: &Path) -> Result<SourceFormat, FormatError> {
    if matches!(extension(path).as_deref(), Some("ene" | "enerst")) {
        return detect_format(path, "");
    }
    let content = std::fs::read_to_string(path)?;
    detect_format(path, &content)
}

/// Detects the docking format from a path and the content already read from it.
pub fn detect_format(path: &Path, content: &str) -> Result<SourceFormat, FormatError> {
    let ext = extension(path).ok_or_else(|| {
        FormatError::unrecognized(path, "file has no extension to select a reader")
    })?;

    match ext.as_str() {
        "pdbqt" => {
            if has_complete_vina_models(content) {
                Ok(SourceFormat::Vina)
            } else {
                Err(FormatError::unrecognized(
                    path,
                    "no MODEL/ENDMDL block carrying a 'REMARK VINA RESULT:' line in every model",
                ))
            }
        }
        "dock4" => Ok(SourceFormat::SwissDock),
        "chimerax" => {
            let head = peek(content);
            if head
                .iter()
                .any(|line| line.to_ascii_lowercase().contains(ATTRACTING_CAVITIES_MARKER))
            {
                Ok(SourceFormat::SwissDock)
            } else if head
                .iter()
                .any(|line| LEGACY_CHIMERAX_TOKENS.iter().any(|t| line.contains(t)))
            {
                Ok(SourceFormat::LegacyChimerax)
            } else {
                Err(FormatError::unrecognized(
                    path,
                    "chimerax file carries neither an Attracting Cavities header nor ChimeraX web-data tokens",
                ))
            }
        }
        "ene" | "enerst" => {
            let paired = paired_structure_path(path);
            if File::open(&paired).is_ok() {
                Ok(SourceFormat::PyDock)
            } else {
                Err(FormatError::MissingPairedFile { path: paired })
            }
        }
        "xyz" => {
            let leading = peek(content).into_iter().next();
            match leading.map(|line| line.trim().parse::<usize>()) {
                Some(Ok(_)) => Ok(SourceFormat::Xyz),
                _ => Err(FormatError::unrecognized(
                    path,
                    "xyz file does not start with an integer atom count",
                )),
            }
        }
        other => Err(FormatError::unrecognized(
            path,
            format!("extension '.{}' is not a supported docking format", other),
        )),
    }
}

/// The structure file paired with a pyDock energy table: same stem, `.pdb` extension.
pub fn paired_structure_path(path: &Path) -> PathBuf {
    path.with_extension("pdb")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn peek(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(PEEK_LINES)
        .collect()
}

fn has_complete_vina_models(content: &str) -> bool {
    let mut complete = 0usize;
    let mut open: Option<bool> = None;

    for line in content.lines() {
        let keyword = line.split_whitespace().next().unwrap_or("");
        match keyword {
            "MODEL" => {
                if open.replace(false).is_some() {
                    return false;
                }
            }
            "ENDMDL" => match open.take() {
                Some(true) => complete += 1,
                _ => return false,
            },
            "REMARK" if line.contains("VINA RESULT:") => {
                if let Some(has_result) = open.as_mut() {
                    *has_result = true;
                }
            }
            _ => {}
        }
    }
    complete > 0
}
