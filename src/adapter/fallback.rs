//! Pattern-scan extraction tier.
//!
//! Used when a language has no grammar (Go, unknown extensions) or when the
//! grammar parse came back with syntax errors. Line-oriented regex scanning
//! recovers top-level declarations and import specifiers; nesting depth,
//! parameters, and call sites are out of reach at this tier, so files
//! extracted here always carry `ParseStatus::Degraded` or `Failed`.

use std::sync::OnceLock;

use regex::Regex;

use crate::adapter::{FileExtraction, RawSymbol};
use crate::language::Lang;
use crate::model::SymbolKind;

macro_rules! cached_regex {
    ($pattern:expr) => {{
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new($pattern).unwrap())
    }};
}

pub fn extract(lang: Lang, source: &str) -> FileExtraction {
    let mut ex = FileExtraction::default();
    match lang {
        Lang::Go => scan_go(source, &mut ex),
        Lang::Python => scan_python(source, &mut ex),
        Lang::TypeScript | Lang::JavaScript => scan_js(source, &mut ex),
        Lang::Rust => scan_rust(source, &mut ex),
        Lang::Unknown => scan_generic(source, &mut ex),
    }
    ex
}

fn push(ex: &mut FileExtraction, name: &str, kind: SymbolKind, line: usize, exported: bool) {
    ex.symbols.push(RawSymbol {
        name: name.to_owned(),
        kind,
        start: line,
        end: line,
        decorators: Vec::new(),
        parent: None,
        nesting: 0,
        params: Vec::new(),
        exported,
    });
}

fn scan_go(source: &str, ex: &mut FileExtraction) {
    let func = cached_regex!(r"^func\s+(?:\([^)]*\)\s+)?([A-Za-z_]\w*)\s*\(");
    let type_decl = cached_regex!(r"^type\s+([A-Za-z_]\w*)\s+(?:struct|interface)\b");
    let import_single = cached_regex!(r#"^import\s+(?:\w+\s+)?"([^"]+)""#);
    let import_line = cached_regex!(r#"^\s+(?:\w+\s+)?"([^"]+)"\s*$"#);

    let mut in_import_block = false;
    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        if in_import_block {
            if line.trim_start().starts_with(')') {
                in_import_block = false;
            } else if let Some(cap) = import_line.captures(line) {
                ex.imports.push(cap[1].to_owned());
            }
            continue;
        }
        if line.trim_end() == "import (" || line.starts_with("import (") {
            in_import_block = true;
        } else if let Some(cap) = import_single.captures(line) {
            ex.imports.push(cap[1].to_owned());
        } else if let Some(cap) = func.captures(line) {
            // Go exports by capitalization.
            let exported = cap[1].chars().next().is_some_and(|c| c.is_uppercase());
            push(ex, &cap[1], SymbolKind::Function, lineno, exported);
        } else if let Some(cap) = type_decl.captures(line) {
            let exported = cap[1].chars().next().is_some_and(|c| c.is_uppercase());
            push(ex, &cap[1], SymbolKind::Class, lineno, exported);
        }
    }
}

fn scan_python(source: &str, ex: &mut FileExtraction) {
    let def = cached_regex!(r"^(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(");
    let class = cached_regex!(r"^class\s+([A-Za-z_]\w*)");
    let import_from = cached_regex!(r"^from\s+(\.*[\w.]*)\s+import\b");
    let import_plain = cached_regex!(r"^import\s+([\w.]+)");
    let decorator = cached_regex!(r"^(@[\w.]+.*)$");

    let mut pending: Vec<String> = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(cap) = decorator.captures(line) {
            pending.push(cap[1].trim_end().to_owned());
            continue;
        }
        if let Some(cap) = def.captures(line) {
            let exported = !cap[1].starts_with('_');
            push(ex, &cap[1], SymbolKind::Function, lineno, exported);
            if let Some(sym) = ex.symbols.last_mut() {
                sym.decorators = std::mem::take(&mut pending);
            }
        } else if let Some(cap) = class.captures(line) {
            let exported = !cap[1].starts_with('_');
            push(ex, &cap[1], SymbolKind::Class, lineno, exported);
            if let Some(sym) = ex.symbols.last_mut() {
                sym.decorators = std::mem::take(&mut pending);
            }
        } else if let Some(cap) = import_from.captures(line) {
            ex.imports.push(cap[1].to_owned());
        } else if let Some(cap) = import_plain.captures(line) {
            ex.imports.push(cap[1].to_owned());
        } else if !line.trim().is_empty() {
            pending.clear();
        }
    }
}

fn scan_js(source: &str, ex: &mut FileExtraction) {
    let func = cached_regex!(r"^\s*(export\s+)?(?:async\s+)?function\s+([A-Za-z_$]\w*)");
    let class = cached_regex!(r"^\s*(export\s+)?class\s+([A-Za-z_$]\w*)");
    let arrow = cached_regex!(
        r"^\s*(export\s+)?(?:const|let|var)\s+([A-Za-z_$]\w*)\s*=\s*(?:async\s*)?\("
    );
    let import_from = cached_regex!(r#"from\s+['"]([^'"]+)['"]"#);
    let import_bare = cached_regex!(r#"^import\s+['"]([^'"]+)['"]"#);
    let require = cached_regex!(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#);

    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(cap) = func.captures(line) {
            push(ex, &cap[2], SymbolKind::Function, lineno, cap.get(1).is_some());
        } else if let Some(cap) = class.captures(line) {
            push(ex, &cap[2], SymbolKind::Class, lineno, cap.get(1).is_some());
        } else if let Some(cap) = arrow.captures(line) {
            push(ex, &cap[2], SymbolKind::Function, lineno, cap.get(1).is_some());
        }
        if let Some(cap) = import_bare.captures(line) {
            ex.imports.push(cap[1].to_owned());
        } else if let Some(cap) = import_from.captures(line) {
            ex.imports.push(cap[1].to_owned());
        }
        for cap in require.captures_iter(line) {
            ex.imports.push(cap[1].to_owned());
        }
    }
}

fn scan_rust(source: &str, ex: &mut FileExtraction) {
    let func = cached_regex!(r"^\s*(pub[\w() ]*\s+)?(?:async\s+)?fn\s+([A-Za-z_]\w*)");
    let type_decl = cached_regex!(r"^\s*(pub[\w() ]*\s+)?(?:struct|enum|trait)\s+([A-Za-z_]\w*)");
    let use_decl = cached_regex!(r"^\s*use\s+([\w:]+)");

    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(cap) = func.captures(line) {
            push(ex, &cap[2], SymbolKind::Function, lineno, cap.get(1).is_some());
        } else if let Some(cap) = type_decl.captures(line) {
            push(ex, &cap[2], SymbolKind::Class, lineno, cap.get(1).is_some());
        } else if let Some(cap) = use_decl.captures(line) {
            ex.imports.push(cap[1].replace("::", "."));
        }
    }
}

/// Last-resort scan for unrecognized extensions: any language's function or
/// class keyword counts.
fn scan_generic(source: &str, ex: &mut FileExtraction) {
    let decl = cached_regex!(
        r"^\s*(?:export\s+)?(?:pub\s+)?(?:async\s+)?(?:function|def|fn|func)\s+([A-Za-z_]\w*)"
    );
    let class = cached_regex!(r"^\s*(?:export\s+)?class\s+([A-Za-z_]\w*)");
    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(cap) = decl.captures(line) {
            push(ex, &cap[1], SymbolKind::Function, lineno, true);
        } else if let Some(cap) = class.captures(line) {
            push(ex, &cap[1], SymbolKind::Class, lineno, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_functions_and_imports() {
        let src = "\
package server

import (
\t\"fmt\"
\t\"net/http\"
)

func Serve(addr string) error {
\treturn nil
}

func (s *Server) handle(w http.ResponseWriter, r *http.Request) {}

type Server struct{}
";
        let mut ex = FileExtraction::default();
        scan_go(src, &mut ex);
        assert_eq!(ex.imports, vec!["fmt".to_string(), "net/http".to_string()]);
        let serve = ex.symbols.iter().find(|s| s.name == "Serve").unwrap();
        assert!(serve.exported);
        let handle = ex.symbols.iter().find(|s| s.name == "handle").unwrap();
        assert!(!handle.exported);
        assert!(ex.symbols.iter().any(|s| s.name == "Server" && s.kind == SymbolKind::Class));
    }

    #[test]
    fn test_python_decorator_attachment() {
        let src = "\
from flask import Flask

@app.route(\"/health\")
def health():
    return \"ok\"
";
        let mut ex = FileExtraction::default();
        scan_python(src, &mut ex);
        assert_eq!(ex.imports, vec!["flask".to_string()]);
        let health = ex.symbols.iter().find(|s| s.name == "health").unwrap();
        assert_eq!(health.decorators, vec!["@app.route(\"/health\")"]);
    }

    #[test]
    fn test_js_declarations() {
        let src = "\
import React from 'react';
const load = require('./loader');

export function render() {}
export const App = () => null;
class Store {}
";
        let mut ex = FileExtraction::default();
        scan_js(src, &mut ex);
        assert!(ex.imports.contains(&"react".to_string()));
        assert!(ex.imports.contains(&"./loader".to_string()));
        let render = ex.symbols.iter().find(|s| s.name == "render").unwrap();
        assert!(render.exported);
        let store = ex.symbols.iter().find(|s| s.name == "Store").unwrap();
        assert!(!store.exported);
    }

    #[test]
    fn test_unknown_language_generic_scan() {
        let ex = extract(Lang::Unknown, "function greet() {}\n");
        assert_eq!(ex.symbols.len(), 1);
        assert_eq!(ex.symbols[0].name, "greet");
    }
}
