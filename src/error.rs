use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal engine errors. Per-file failures are never surfaced here — they are
/// recorded as [`Diagnostic`]s on the owning file and the run continues.
/// Only structural precondition violations abort a run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("resolution invoked before extraction completed ({missing} file(s) missing)")]
    IncompleteExtraction { missing: usize },

    #[error("candidate path is not relative to the project root: {path}")]
    PathOutsideRoot { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Machine-readable reason attached to a degraded or failed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Full-grammar parse failed; the fallback tier was used instead.
    ParseError,
    /// Both the grammar and the fallback tier produced nothing.
    ExtractionFailure,
    /// No grammar exists for the language; fallback tier was used.
    NoGrammar,
    /// The file could not be read from disk.
    ReadError,
    /// The file's bytes were not valid UTF-8.
    InvalidUtf8,
}

/// One diagnostic entry for a degraded or failed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ReasonCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::IncompleteExtraction { missing: 3 };
        assert!(err.to_string().contains("3 file(s)"));
    }

    #[test]
    fn test_diagnostic_construction() {
        let d = Diagnostic::new(ReasonCode::ParseError, "tree-sitter returned None");
        assert_eq!(d.code, ReasonCode::ParseError);
        assert!(d.message.contains("tree-sitter"));
    }
}
