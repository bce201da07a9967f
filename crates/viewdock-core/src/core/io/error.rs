use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unrecognized docking format for '{path}': {reason}", path = path.display())]
    UnrecognizedFormat { path: PathBuf, reason: String },

    #[error("Required paired file '{path}' is missing or unreadable", path = path.display())]
    MissingPairedFile { path: PathBuf },

    #[error("Malformed record on line {line}: {reason}\n    {content}")]
    MalformedRecord {
        line: usize,
        content: String,
        reason: String,
    },
}

impl FormatError {
    pub(crate) fn malformed(line: usize, content: &str, reason: impl Into<String>) -> Self {
        FormatError::MalformedRecord {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unrecognized(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FormatError::UnrecognizedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_message_carries_line_and_content() {
        let err = FormatError::malformed(12, "REMARK VINA RESULT: x", "expected three numbers");
        let message = err.to_string();
        assert!(message.contains("line 12"));
        assert!(message.contains("REMARK VINA RESULT: x"));
        assert!(message.contains("expected three numbers"));
    }
}
