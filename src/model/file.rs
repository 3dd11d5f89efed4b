use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::language::Lang;
use crate::model::tag::Role;

/// Stable identifier for a [`SourceFile`] inside one `ProjectModel`.
/// Index into the model's file arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FileId(pub usize);

/// Outcome of extraction for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseStatus {
    /// Full-grammar parse succeeded.
    #[default]
    Full,
    /// Full parse failed or no grammar exists; fallback pattern matching
    /// recovered a lower-confidence extraction.
    Degraded,
    /// Nothing could be extracted. The file still exists in the model so
    /// dependents keep a node to point at.
    Failed,
}

/// One analyzed file and its parse outcome. Created once per candidate path,
/// immutable after extraction (roles and complexity are annotated by the
/// later classifier/metrics passes before the model is handed out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: FileId,
    /// Path relative to the project root — the file's stable identifier.
    pub path: PathBuf,
    pub lang: Lang,
    /// Raw source text. Retained for classifier source-pattern signals.
    pub text: String,
    pub lines: usize,
    pub status: ParseStatus,
    pub diagnostics: Vec<Diagnostic>,
    /// Structural roles assigned by the classifier. Empty is normal.
    pub roles: Vec<Role>,
    /// Deterministic weighted score computed by the graph builder.
    pub complexity: u64,
}

impl SourceFile {
    pub fn new(id: FileId, path: PathBuf, lang: Lang, text: String) -> Self {
        let lines = text.lines().count();
        Self {
            id,
            path,
            lang,
            text,
            lines,
            status: ParseStatus::Full,
            diagnostics: Vec::new(),
            roles: Vec::new(),
            complexity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        let f = SourceFile::new(
            FileId(0),
            PathBuf::from("a.py"),
            Lang::Python,
            "x = 1\ny = 2\n".into(),
        );
        assert_eq!(f.lines, 2);
        assert_eq!(f.status, ParseStatus::Full);
        assert!(f.diagnostics.is_empty());
    }
}
