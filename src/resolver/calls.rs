use crate::model::{FileId, ProjectModel, SymbolId, SymbolKind};

/// Resolve one call site to a symbol id, or `None` when the callee is
/// external or otherwise out of reach.
///
/// Lookup order:
/// 1. Symbols in the caller's own file, exact qualified-name match first,
///    then short-name match. Declaration order breaks ties.
/// 2. One hop through the file's resolved imports: exported symbols in
///    directly imported files, visited in sorted path order so the winner
///    is deterministic.
///
/// Receiver-qualified callees (`db.save`) match on the final segment when
/// no qualified name matches, which is how instance method calls land on
/// `Class.method` symbols.
pub fn resolve_call(model: &ProjectModel, file: FileId, callee: &str) -> Option<SymbolId> {
    let short = callee.rsplit('.').next().unwrap_or(callee);

    if let Some(id) = match_in_file(model, file, callee, short, false) {
        return Some(id);
    }

    let mut imported: Vec<FileId> = model
        .imports
        .iter()
        .filter(|e| e.from == file && !e.external)
        .filter_map(|e| e.target)
        .collect();
    imported.sort_by(|a, b| model.file(*a).path.cmp(&model.file(*b).path));
    imported.dedup();

    for target_file in imported {
        if let Some(id) = match_in_file(model, target_file, callee, short, true) {
            return Some(id);
        }
    }
    None
}

fn match_in_file(
    model: &ProjectModel,
    file: FileId,
    callee: &str,
    short: &str,
    exported_only: bool,
) -> Option<SymbolId> {
    let candidates = model.symbols_in(file);
    let callable = |id: &&SymbolId| {
        let sym = model.symbol(**id);
        !matches!(sym.kind, SymbolKind::Variable) && (!exported_only || sym.exported)
    };
    // Exact qualified match wins over a short-name match anywhere.
    if let Some(&id) = candidates
        .iter()
        .filter(callable)
        .find(|&&id| model.symbol(id).name == callee)
    {
        return Some(id);
    }
    candidates
        .iter()
        .filter(callable)
        .find(|&&id| model.symbol(id).short_name() == short)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Lang;
    use crate::model::{ImportEdge, LineSpan};
    use std::path::PathBuf;

    fn add_sym(
        model: &mut ProjectModel,
        file: FileId,
        name: &str,
        exported: bool,
    ) -> SymbolId {
        model.add_symbol(
            file,
            SymbolKind::Function,
            name.into(),
            LineSpan { start: 1, end: 1 },
            vec![],
            None,
            0,
            vec![],
            exported,
        )
    }

    #[test]
    fn test_same_file_wins_over_import() {
        let mut model = ProjectModel::new();
        let a = model.add_file(PathBuf::from("a.py"), Lang::Python, String::new());
        let b = model.add_file(PathBuf::from("b.py"), Lang::Python, String::new());
        let local = add_sym(&mut model, a, "helper", false);
        let _remote = add_sym(&mut model, b, "helper", true);
        model.imports.push(ImportEdge {
            from: a,
            specifier: "b".into(),
            target: Some(b),
            external: false,
        });
        assert_eq!(resolve_call(&model, a, "helper"), Some(local));
    }

    #[test]
    fn test_one_hop_through_import_exported_only() {
        let mut model = ProjectModel::new();
        let a = model.add_file(PathBuf::from("a.py"), Lang::Python, String::new());
        let b = model.add_file(PathBuf::from("b.py"), Lang::Python, String::new());
        let pub_sym = add_sym(&mut model, b, "save", true);
        let _priv_sym = add_sym(&mut model, b, "_load", false);
        model.imports.push(ImportEdge {
            from: a,
            specifier: "b".into(),
            target: Some(b),
            external: false,
        });
        assert_eq!(resolve_call(&model, a, "save"), Some(pub_sym));
        assert_eq!(resolve_call(&model, a, "_load"), None);
    }

    #[test]
    fn test_receiver_qualified_matches_method_short_name() {
        let mut model = ProjectModel::new();
        let a = model.add_file(PathBuf::from("a.py"), Lang::Python, String::new());
        let method = add_sym(&mut model, a, "Store.save", false);
        assert_eq!(resolve_call(&model, a, "db.save"), Some(method));
    }

    #[test]
    fn test_exact_qualified_beats_short_name() {
        let mut model = ProjectModel::new();
        let a = model.add_file(PathBuf::from("a.py"), Lang::Python, String::new());
        let _method = add_sym(&mut model, a, "Other.save", false);
        let exact = add_sym(&mut model, a, "Store.save", false);
        assert_eq!(resolve_call(&model, a, "Store.save"), Some(exact));
    }

    #[test]
    fn test_sorted_path_order_breaks_cross_file_ties() {
        let mut model = ProjectModel::new();
        let main = model.add_file(PathBuf::from("main.py"), Lang::Python, String::new());
        // Insertion order is z then a; resolution must prefer a.py.
        let z = model.add_file(PathBuf::from("z.py"), Lang::Python, String::new());
        let a = model.add_file(PathBuf::from("a.py"), Lang::Python, String::new());
        let _in_z = add_sym(&mut model, z, "run", true);
        let in_a = add_sym(&mut model, a, "run", true);
        for (target, spec) in [(z, "z"), (a, "a")] {
            model.imports.push(ImportEdge {
                from: main,
                specifier: spec.into(),
                target: Some(target),
                external: false,
            });
        }
        assert_eq!(resolve_call(&model, main, "run"), Some(in_a));
    }

    #[test]
    fn test_unknown_callee_unresolved() {
        let mut model = ProjectModel::new();
        let a = model.add_file(PathBuf::from("a.py"), Lang::Python, String::new());
        assert_eq!(resolve_call(&model, a, "fetch"), None);
    }
}
