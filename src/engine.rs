//! Pipeline orchestration.
//!
//! One `analyze` call runs the full pipeline: read candidates into the
//! model, extract every file in parallel, then resolve, classify, build
//! graphs, score, and extract the API surface — strictly in that order.
//! Extraction is the only parallel phase; everything downstream sees the
//! complete extracted set or none of it.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::adapter::{self, FileExtraction};
use crate::error::{Diagnostic, EngineError, ReasonCode, Result};
use crate::graph::metrics::{self, ComplexityWeights};
use crate::graph::{CallGraph, DependencyGraph};
use crate::language::Lang;
use crate::model::{FileId, ParseStatus, ProjectModel};
use crate::resolver::{self, ResolveStats};

/// Cooperative cancellation handle. Checked between files during
/// extraction; files already extracted stay in the model and the run
/// completes with whatever was gathered.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    pub weights: ComplexityWeights,
}

/// Outcome of one analysis run.
#[derive(Debug)]
pub struct Analysis {
    pub model: ProjectModel,
    pub stats: ResolveStats,
    pub cancelled: bool,
}

/// Analyze `candidates` (paths relative to `root`) and build the project
/// model.
///
/// Candidate order does not affect the result: files are sorted by path
/// before ids are assigned, and nothing resolves until every file is
/// extracted. Per-file problems (unreadable, undecodable, unparseable)
/// degrade that file and keep going; only structural violations error out.
pub fn analyze(
    root: &Path,
    mut candidates: Vec<PathBuf>,
    options: AnalyzeOptions,
    cancel: &CancelFlag,
) -> Result<Analysis> {
    candidates.sort();
    candidates.dedup();

    let mut model = ProjectModel::new();
    // Extractions settled during the read phase (read/decode failures).
    let mut settled: Vec<(FileId, FileExtraction)> = Vec::new();

    for rel in candidates {
        if rel.is_absolute() || rel.components().any(|c| c == Component::ParentDir) {
            return Err(EngineError::PathOutsideRoot { path: rel });
        }
        let lang = rel
            .extension()
            .and_then(|e| e.to_str())
            .map(Lang::from_extension)
            .unwrap_or(Lang::Unknown);

        match std::fs::read(root.join(&rel)) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => {
                    model.add_file(rel, lang, text);
                }
                Err(_) => {
                    let id = model.add_file(rel, lang, String::new());
                    settled.push((id, failed(ReasonCode::InvalidUtf8, "not valid UTF-8")));
                }
            },
            Err(err) => {
                let id = model.add_file(rel, lang, String::new());
                settled.push((id, failed(ReasonCode::ReadError, err.to_string())));
            }
        }
    }

    let already: HashSet<FileId> = settled.iter().map(|(id, _)| *id).collect();
    let mut extractions: Vec<(FileId, FileExtraction)> = model
        .files()
        .par_iter()
        .filter(|f| !already.contains(&f.id))
        .filter_map(|f| {
            if cancel.is_cancelled() {
                return None;
            }
            Some((f.id, adapter::extract_file(&f.path, f.lang, &f.text)))
        })
        .collect();

    let cancelled = cancel.is_cancelled();
    if !cancelled && extractions.len() + settled.len() != model.files().len() {
        return Err(EngineError::IncompleteExtraction {
            missing: model.files().len() - extractions.len() - settled.len(),
        });
    }
    if cancelled {
        // Files the flag cut off still need a terminal status.
        let extracted: HashSet<FileId> = extractions.iter().map(|(id, _)| *id).collect();
        for f in model.files() {
            if !extracted.contains(&f.id) && !already.contains(&f.id) {
                settled.push((
                    f.id,
                    failed(ReasonCode::ExtractionFailure, "run cancelled before extraction"),
                ));
            }
        }
    }
    extractions.extend(settled);

    let stats = resolver::apply(&mut model, extractions);
    crate::classify::classify(&mut model);

    model.dependency_graph = DependencyGraph::build(model.files(), &model.imports);
    model.call_graph = CallGraph::build(model.symbols(), &model.calls);
    metrics::annotate_complexity(&mut model, options.weights);

    crate::surface::extract_surface(&mut model);

    Ok(Analysis {
        model,
        stats,
        cancelled,
    })
}

fn failed(code: ReasonCode, message: impl Into<String>) -> FileExtraction {
    FileExtraction {
        status: ParseStatus::Failed,
        diagnostics: vec![Diagnostic::new(code, message)],
        ..FileExtraction::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_end_to_end_small_project() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "app.py",
            "from helpers import save\n\ndef run():\n    save()\n\nif __name__ == \"__main__\":\n    run()\n",
        );
        write(&dir, "helpers.py", "def save():\n    pass\n");

        let analysis = analyze(
            dir.path(),
            vec![PathBuf::from("app.py"), PathBuf::from("helpers.py")],
            AnalyzeOptions::default(),
            &CancelFlag::new(),
        )
        .unwrap();

        assert!(!analysis.cancelled);
        assert_eq!(analysis.stats.files_full, 2);
        assert_eq!(analysis.stats.imports_internal, 1);
        assert_eq!(analysis.stats.calls_resolved, 1);
        let app = analysis
            .model
            .file_by_path(Path::new("app.py"))
            .map(|id| analysis.model.file(id))
            .unwrap();
        assert!(app.roles.contains(&crate::model::Role::EntryPoint));
        assert!(app.complexity > 0);
    }

    #[test]
    fn test_unreadable_file_degrades_not_aborts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ok.py", "def f():\n    pass\n");

        let analysis = analyze(
            dir.path(),
            vec![PathBuf::from("ok.py"), PathBuf::from("missing.py")],
            AnalyzeOptions::default(),
            &CancelFlag::new(),
        )
        .unwrap();

        assert_eq!(analysis.stats.files_full, 1);
        assert_eq!(analysis.stats.files_failed, 1);
        let diags = analysis.model.diagnostics();
        assert!(
            diags
                .iter()
                .any(|(_, d)| d.code == ReasonCode::ReadError)
        );
    }

    #[test]
    fn test_non_utf8_file_fails_that_file_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin.py"), [0xff, 0xfe, 0x00]).unwrap();
        write(&dir, "ok.py", "def f():\n    pass\n");

        let analysis = analyze(
            dir.path(),
            vec![PathBuf::from("bin.py"), PathBuf::from("ok.py")],
            AnalyzeOptions::default(),
            &CancelFlag::new(),
        )
        .unwrap();

        assert_eq!(analysis.stats.files_failed, 1);
        assert_eq!(analysis.stats.files_full, 1);
        assert!(
            analysis
                .model
                .diagnostics()
                .iter()
                .any(|(_, d)| d.code == ReasonCode::InvalidUtf8)
        );
    }

    #[test]
    fn test_path_outside_root_rejected() {
        let dir = TempDir::new().unwrap();
        let err = analyze(
            dir.path(),
            vec![PathBuf::from("../etc/passwd")],
            AnalyzeOptions::default(),
            &CancelFlag::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::PathOutsideRoot { .. }));
    }

    #[test]
    fn test_candidate_order_does_not_change_ids() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "def f():\n    pass\n");
        write(&dir, "b.py", "def g():\n    pass\n");

        let run = |order: Vec<&str>| {
            analyze(
                dir.path(),
                order.into_iter().map(PathBuf::from).collect(),
                AnalyzeOptions::default(),
                &CancelFlag::new(),
            )
            .unwrap()
        };
        let fwd = run(vec!["a.py", "b.py"]);
        let rev = run(vec!["b.py", "a.py"]);
        assert_eq!(
            fwd.model.files()[0].path,
            rev.model.files()[0].path
        );
        assert_eq!(fwd.model.symbols()[0].name, rev.model.symbols()[0].name);
    }

    #[test]
    fn test_pre_cancelled_run_completes_with_failed_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "def f():\n    pass\n");
        let cancel = CancelFlag::new();
        cancel.cancel();

        let analysis = analyze(
            dir.path(),
            vec![PathBuf::from("a.py")],
            AnalyzeOptions::default(),
            &cancel,
        )
        .unwrap();
        assert!(analysis.cancelled);
        assert_eq!(analysis.stats.files_failed, 1);
    }
}
