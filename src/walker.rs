use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::AtlasConfig;
use crate::language::{Lang, SOURCE_EXTENSIONS};

/// Directory names that are never worth analyzing, regardless of ignore
/// files.
const HARD_EXCLUDES: &[&str] = &[
    "node_modules",
    "target",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    ".git",
];

/// Walk a project directory and collect candidate source files, as paths
/// relative to `root`.
///
/// Respects `.gitignore` rules, always excludes dependency/build
/// directories, and applies any additional exclusions from
/// `config.exclude`. When `verbose` is true, each discovered file path is
/// printed to stderr.
///
/// When `allowed_languages` is `Some(set)`, only files whose extension maps
/// to one of those languages are included.
pub fn walk_project(
    root: &Path,
    config: &AtlasConfig,
    verbose: bool,
    allowed_languages: Option<&HashSet<Lang>>,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        // Read .gitignore files even when the directory is not inside a git
        // repository, so exclusions work for standalone directories.
        .require_git(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };
        let path = entry.path();

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }
        if path_has_excluded_dir(path) {
            continue;
        }
        if is_excluded_by_config(path, config) {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SOURCE_EXTENSIONS.contains(&ext) {
            continue;
        }
        if let Some(langs) = allowed_languages
            && !langs.contains(&Lang::from_extension(ext))
        {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        if verbose {
            eprintln!("found: {}", rel.display());
        }
        files.push(rel);
    }

    files.sort();
    Ok(files)
}

fn path_has_excluded_dir(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| HARD_EXCLUDES.contains(&s))
    })
}

/// Config exclusions accept glob patterns (`generated/**`, `*.gen.ts`);
/// patterns without glob metacharacters fall back to substring matching.
fn is_excluded_by_config(path: &Path, config: &AtlasConfig) -> bool {
    let Some(patterns) = &config.exclude else {
        return false;
    };
    let text = path.to_string_lossy();
    patterns.iter().any(|p| {
        if p.contains(['*', '?', '[']) {
            glob::Pattern::new(p)
                .map(|pat| {
                    pat.matches(&text)
                        || path.file_name().is_some_and(|n| {
                            n.to_str().is_some_and(|n| pat.matches(n))
                        })
                })
                .unwrap_or(false)
        } else {
            text.contains(p.as_str())
        }
    })
}
