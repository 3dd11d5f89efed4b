use std::path::{Component, Path, PathBuf};

use crate::language::{Lang, SOURCE_EXTENSIONS};
use crate::model::{FileId, ProjectModel};

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Internal(FileId),
    External,
    Unresolved,
}

/// Resolve one raw import specifier against the project's file set.
///
/// Matching is purely lexical (no filesystem access): a specifier is turned
/// into candidate project-relative paths and each candidate goes through the
/// same three steps — exact path, extension completion, directory index
/// file (`index.*`, `__init__.py`, `mod.rs`).
///
/// Specifiers that are explicitly relative (`./x`, `../x`, leading-dot
/// Python imports, `self`/`super` Rust paths) can only be internal; when
/// no file matches they stay `Unresolved`. Bare specifiers that match no
/// project file classify as `External`.
pub fn resolve_specifier(model: &ProjectModel, from: FileId, spec: &str) -> Resolution {
    let from_path = &model.file(from).path;
    let from_dir = from_path.parent().unwrap_or_else(|| Path::new(""));
    let lang = model.file(from).lang;

    if spec.starts_with("./") || spec.starts_with("../") {
        let candidate = normalize(&from_dir.join(spec));
        return match try_match(model, &candidate) {
            Some(id) => Resolution::Internal(id),
            None => Resolution::Unresolved,
        };
    }

    if lang == Lang::Python && spec.starts_with('.') {
        return match resolve_python_relative(model, from_dir, spec) {
            Some(id) => Resolution::Internal(id),
            None => Resolution::Unresolved,
        };
    }

    if lang == Lang::Rust {
        return resolve_rust(model, from_dir, spec);
    }

    // Absolute dotted (Python) or bare (JS/TS/Go) specifier: try it as a
    // project path from the importing file's directory and from the root.
    let rel = spec.replace('.', "/");
    for base in [from_dir, Path::new("")] {
        let candidate = normalize(&base.join(&rel));
        if let Some(id) = try_match(model, &candidate) {
            return Resolution::Internal(id);
        }
    }
    Resolution::External
}

/// Leading-dot Python import: one dot anchors at the file's own package,
/// each additional dot walks one package up.
fn resolve_python_relative(model: &ProjectModel, from_dir: &Path, spec: &str) -> Option<FileId> {
    let dots = spec.chars().take_while(|&c| c == '.').count();
    let rest = &spec[dots..];
    let mut base = from_dir.to_path_buf();
    for _ in 1..dots {
        base = base.parent().map(Path::to_path_buf).unwrap_or_default();
    }
    let candidate = if rest.is_empty() {
        base
    } else {
        base.join(rest.replace('.', "/"))
    };
    try_match(model, &normalize(&candidate))
}

/// Rust `use` paths. `crate::` anchors at the source root (the importing
/// file's topmost directory), `self::` at the file's own directory,
/// `super::` one module up. Trailing item segments (types, functions) are
/// peeled off until a module file matches.
fn resolve_rust(model: &ProjectModel, from_dir: &Path, spec: &str) -> Resolution {
    let segs: Vec<&str> = spec.split('.').collect();
    let (anchor, rest): (PathBuf, &[&str]) = match segs[0] {
        "crate" => {
            // a/b/c.rs -> source root a/
            let root = from_dir
                .components()
                .next()
                .map(|c| PathBuf::from(c.as_os_str()))
                .unwrap_or_default();
            (root, &segs[1..])
        }
        "self" => (from_dir.to_path_buf(), &segs[1..]),
        "super" => (
            from_dir.parent().map(Path::to_path_buf).unwrap_or_default(),
            &segs[1..],
        ),
        _ => return Resolution::External,
    };

    for take in (1..=rest.len()).rev() {
        let candidate = normalize(&anchor.join(rest[..take].join("/")));
        if let Some(id) = try_match(model, &candidate) {
            return Resolution::Internal(id);
        }
    }
    Resolution::Unresolved
}

/// Three-step match: exact path, then extension completion, then a
/// directory index file.
fn try_match(model: &ProjectModel, candidate: &Path) -> Option<FileId> {
    if let Some(id) = model.file_by_path(candidate) {
        return Some(id);
    }
    for ext in SOURCE_EXTENSIONS {
        let mut with_ext = candidate.as_os_str().to_owned();
        with_ext.push(".");
        with_ext.push(ext);
        if let Some(id) = model.file_by_path(Path::new(&with_ext)) {
            return Some(id);
        }
    }
    for index in [
        "index.ts", "index.tsx", "index.js", "index.jsx", "__init__.py", "mod.rs",
    ] {
        if let Some(id) = model.file_by_path(&candidate.join(index)) {
            return Some(id);
        }
    }
    None
}

/// Collapse `.` and `..` components lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
