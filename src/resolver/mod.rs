//! Two-phase resolution.
//!
//! Phase one folds every per-file extraction into the model: file status,
//! symbols (with parent links wired by qualified name), and the raw import
//! and call records. Phase two resolves imports against the complete file
//! set, then calls against the complete symbol set. Nothing resolves until
//! everything is extracted, so results never depend on file visit order.

pub mod calls;
pub mod imports;

use std::collections::HashMap;

use serde::Serialize;

use crate::adapter::FileExtraction;
use crate::model::{
    CallEdge, FileId, ImportEdge, LineSpan, ParseStatus, ProjectModel, SymbolId,
};
use crate::resolver::imports::Resolution;

/// Counters reported after resolution. All exact.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct ResolveStats {
    pub files_full: usize,
    pub files_degraded: usize,
    pub files_failed: usize,
    pub symbols: usize,
    pub imports_internal: usize,
    pub imports_external: usize,
    pub imports_unresolved: usize,
    pub calls_resolved: usize,
    pub calls_unresolved: usize,
}

/// Fold extractions into the model and resolve all cross-references.
///
/// `extractions` must pair each file id with the extraction of that file's
/// text; order does not matter, the fold sorts by file id so symbol ids
/// come out deterministic.
pub fn apply(model: &mut ProjectModel, mut extractions: Vec<(FileId, FileExtraction)>) -> ResolveStats {
    let mut stats = ResolveStats::default();
    extractions.sort_by_key(|(id, _)| *id);

    // Raw cross-reference records, held until every symbol exists.
    let mut raw_imports: Vec<(FileId, String)> = Vec::new();
    let mut raw_calls: Vec<(FileId, String, String)> = Vec::new();

    for (file_id, ex) in extractions {
        match ex.status {
            ParseStatus::Full => stats.files_full += 1,
            ParseStatus::Degraded => stats.files_degraded += 1,
            ParseStatus::Failed => stats.files_failed += 1,
        }
        {
            let file = model.file_mut(file_id);
            file.status = ex.status;
            file.diagnostics = ex.diagnostics;
        }

        // Insert symbols first, then wire parents: a Rust impl block can
        // precede the struct it implements, so parents may be declared
        // after their children.
        let mut by_name: HashMap<String, SymbolId> = HashMap::new();
        let mut inserted: Vec<(SymbolId, Option<String>)> = Vec::new();
        for raw in ex.symbols {
            let id = model.add_symbol(
                file_id,
                raw.kind,
                raw.name.clone(),
                LineSpan {
                    start: raw.start,
                    end: raw.end,
                },
                raw.decorators,
                None,
                raw.nesting,
                raw.params,
                raw.exported,
            );
            by_name.insert(raw.name, id);
            inserted.push((id, raw.parent));
            stats.symbols += 1;
        }
        for (id, parent_name) in inserted {
            if let Some(parent_id) = parent_name.and_then(|n| by_name.get(&n).copied()) {
                model.symbol_mut(id).parent = Some(parent_id);
            }
        }

        for spec in ex.imports {
            raw_imports.push((file_id, spec));
        }
        for call in ex.calls {
            // Module-level calls carry no enclosing symbol and stay out of
            // the call graph.
            if !call.caller.is_empty() {
                raw_calls.push((file_id, call.caller, call.callee));
            }
        }
    }

    // Imports resolve against the complete file set.
    let mut import_edges: Vec<ImportEdge> = Vec::new();
    for (from, spec) in raw_imports {
        let edge = match imports::resolve_specifier(model, from, &spec) {
            Resolution::Internal(target) => {
                stats.imports_internal += 1;
                ImportEdge {
                    from,
                    specifier: spec,
                    target: Some(target),
                    external: false,
                }
            }
            Resolution::External => {
                stats.imports_external += 1;
                ImportEdge {
                    from,
                    specifier: spec,
                    target: None,
                    external: true,
                }
            }
            Resolution::Unresolved => {
                stats.imports_unresolved += 1;
                ImportEdge {
                    from,
                    specifier: spec,
                    target: None,
                    external: false,
                }
            }
        };
        import_edges.push(edge);
    }
    model.imports.extend(import_edges);

    // Calls resolve last: they reach one hop through the resolved imports.
    let mut call_edges: Vec<CallEdge> = Vec::new();
    for (file, caller_name, callee) in raw_calls {
        let Some(caller) = lookup_symbol(model, file, &caller_name) else {
            continue;
        };
        let target = calls::resolve_call(model, file, &callee);
        if target.is_some() {
            stats.calls_resolved += 1;
        } else {
            stats.calls_unresolved += 1;
        }
        call_edges.push(CallEdge {
            caller,
            callee,
            target,
        });
    }
    model.calls.extend(call_edges);

    stats
}

fn lookup_symbol(model: &ProjectModel, file: FileId, name: &str) -> Option<SymbolId> {
    model
        .symbols_in(file)
        .iter()
        .find(|&&id| model.symbol(id).name == name)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::extract_file;
    use crate::language::Lang;
    use std::path::PathBuf;

    fn run(files: &[(&str, Lang, &str)]) -> (ProjectModel, ResolveStats) {
        let mut model = ProjectModel::new();
        let mut extractions = Vec::new();
        for (path, lang, src) in files {
            let id = model.add_file(PathBuf::from(path), *lang, src.to_string());
            extractions.push((id, extract_file(&PathBuf::from(path), *lang, src)));
        }
        let stats = apply(&mut model, extractions);
        (model, stats)
    }

    #[test]
    fn test_cross_file_import_and_call() {
        let (model, stats) = run(&[
            (
                "app.py",
                Lang::Python,
                "from helpers import save\n\ndef run():\n    save()\n",
            ),
            ("helpers.py", Lang::Python, "def save():\n    pass\n"),
        ]);
        assert_eq!(stats.files_full, 2);
        assert_eq!(stats.imports_internal, 1);
        assert_eq!(stats.calls_resolved, 1);

        let edge = &model.imports[0];
        assert!(!edge.external);
        let call = &model.calls[0];
        assert_eq!(model.symbol(call.caller).name, "run");
        assert_eq!(model.symbol(call.target.unwrap()).name, "save");
    }

    #[test]
    fn test_stdlib_import_classified_external() {
        let (_model, stats) = run(&[("app.py", Lang::Python, "import json\n")]);
        assert_eq!(stats.imports_external, 1);
        assert_eq!(stats.imports_internal, 0);
    }

    #[test]
    fn test_parent_wired_across_declaration_order() {
        let src = "\
impl Store {
    pub fn get(&self) {}
}

pub struct Store;
";
        let (model, _) = run(&[("src/lib.rs", Lang::Rust, src)]);
        let get = model
            .symbols()
            .iter()
            .find(|s| s.name == "Store.get")
            .unwrap();
        let parent = get.parent.expect("parent wired");
        assert_eq!(model.symbol(parent).name, "Store");
    }

    #[test]
    fn test_module_level_calls_excluded_from_call_graph() {
        let (model, stats) = run(&[(
            "app.py",
            Lang::Python,
            "def boot():\n    pass\n\nboot()\n",
        )]);
        assert!(model.calls.is_empty());
        assert_eq!(stats.calls_resolved, 0);
    }

    #[test]
    fn test_degraded_file_still_contributes_imports() {
        let (model, stats) = run(&[
            (
                "broken.py",
                Lang::Python,
                "import helpers\n\ndef bad(:\n    pass\n",
            ),
            ("helpers.py", Lang::Python, "def save():\n    pass\n"),
        ]);
        assert_eq!(stats.files_degraded, 1);
        assert_eq!(stats.imports_internal, 1);
        assert!(model.imports[0].target.is_some());
    }
}
