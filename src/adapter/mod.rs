pub mod fallback;
pub mod python;
pub mod rust_lang;
pub mod support;
pub mod typescript;

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

use tree_sitter::{Parser, Tree};

use crate::error::{Diagnostic, ReasonCode};
use crate::language::Lang;
use crate::model::{ParseStatus, SymbolKind};

// Thread-local Parser instances — one per rayon worker thread, zero lock
// contention. Each Parser is initialised once per thread with its grammar.
thread_local! {
    static PARSER_PY: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_python::LANGUAGE.into()).unwrap();
        p
    });
    static PARSER_TS: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()).unwrap();
        p
    });
    static PARSER_TSX: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into()).unwrap();
        p
    });
    static PARSER_JS: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_javascript::LANGUAGE.into()).unwrap();
        p
    });
    static PARSER_RS: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        p
    });
}

/// A symbol as extracted by an adapter, before it enters the model.
#[derive(Debug, Clone)]
pub struct RawSymbol {
    /// File-qualified name (`Class.method`, `outer.inner`).
    pub name: String,
    pub kind: SymbolKind,
    /// 1-based start line of the declaration.
    pub start: usize,
    /// 1-based end line of the declaration.
    pub end: usize,
    /// Decorator/annotation/attribute text, verbatim.
    pub decorators: Vec<String>,
    /// Qualified name of the enclosing class/function, if nested.
    pub parent: Option<String>,
    /// Maximum statement nesting depth inside the body.
    pub nesting: usize,
    /// Declared parameter names.
    pub params: Vec<String>,
    pub exported: bool,
}

/// A call site attributed to its enclosing symbol by qualified name.
/// `caller` is empty for module-level calls (no enclosing symbol).
#[derive(Debug, Clone)]
pub struct RawCall {
    pub caller: String,
    pub callee: String,
}

/// Everything one adapter extracts from one file's text. Pure value — the
/// adapter never touches shared state, so extraction parallelizes safely.
#[derive(Debug, Default)]
pub struct FileExtraction {
    pub status: ParseStatus,
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: Vec<RawSymbol>,
    /// Raw import specifiers as written, deduplicated, in source order.
    pub imports: Vec<String>,
    pub calls: Vec<RawCall>,
}

/// Extract symbols, imports, and call sites from one file.
///
/// Single dispatch point for all languages. Tiered strategy:
/// 1. Full grammar parse, when the language has one and the tree comes back
///    without syntax errors (`status = Full`).
/// 2. Regex pattern scan otherwise (`status = Degraded`), with a diagnostic
///    naming why the grammar tier was skipped.
/// 3. If the pattern scan also recovers nothing, `status = Failed` with an
///    `ExtractionFailure` diagnostic and zero symbols.
///
/// Never panics on malformed input and never aborts the surrounding run.
pub fn extract_file(path: &Path, lang: Lang, source: &str) -> FileExtraction {
    let bytes = source.as_bytes();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let is_tsx = matches!(ext, "tsx" | "jsx");

    if lang.has_grammar() {
        match parse_clean(lang, is_tsx, bytes) {
            Ok(tree) => {
                let mut ex = match lang {
                    Lang::Python => python::extract(&tree, bytes),
                    Lang::TypeScript | Lang::JavaScript => {
                        typescript::extract(&tree, bytes, is_tsx)
                    }
                    Lang::Rust => rust_lang::extract(&tree, bytes),
                    _ => unreachable!("has_grammar() gated"),
                };
                ex.status = ParseStatus::Full;
                finish(ex)
            }
            Err(reason) => degrade(lang, source, ReasonCode::ParseError, reason),
        }
    } else {
        degrade(
            lang,
            source,
            ReasonCode::NoGrammar,
            format!("no grammar for {}", lang.display_name()),
        )
    }
}

/// Run the fallback tier and settle on Degraded or Failed.
fn degrade(lang: Lang, source: &str, code: ReasonCode, reason: String) -> FileExtraction {
    let mut ex = fallback::extract(lang, source);
    if ex.symbols.is_empty() && ex.imports.is_empty() {
        ex.status = ParseStatus::Failed;
        ex.symbols.clear();
        ex.calls.clear();
        ex.diagnostics.push(Diagnostic::new(
            ReasonCode::ExtractionFailure,
            format!("{reason}; pattern scan recovered nothing"),
        ));
    } else {
        ex.status = ParseStatus::Degraded;
        ex.diagnostics.push(Diagnostic::new(code, reason));
    }
    finish(ex)
}

/// Parse with the per-thread parser for `lang`, rejecting trees that contain
/// syntax errors so the fallback tier gets a chance at broken files.
fn parse_clean(lang: Lang, is_tsx: bool, source: &[u8]) -> std::result::Result<Tree, String> {
    let tree = match (lang, is_tsx) {
        (Lang::Python, _) => PARSER_PY.with(|p| p.borrow_mut().parse(source, None)),
        (Lang::TypeScript, false) => PARSER_TS.with(|p| p.borrow_mut().parse(source, None)),
        (Lang::TypeScript, true) => PARSER_TSX.with(|p| p.borrow_mut().parse(source, None)),
        (Lang::JavaScript, _) => PARSER_JS.with(|p| p.borrow_mut().parse(source, None)),
        (Lang::Rust, _) => PARSER_RS.with(|p| p.borrow_mut().parse(source, None)),
        _ => None,
    };
    let tree = tree.ok_or_else(|| "tree-sitter returned None".to_owned())?;
    if tree.root_node().has_error() {
        return Err("syntax errors in parse tree".to_owned());
    }
    Ok(tree)
}

/// Post-extraction cleanup shared by all tiers: dedupe import specifiers
/// (first occurrence wins) and enforce per-file qualified-name uniqueness by
/// suffixing `#line` on collisions.
fn finish(mut ex: FileExtraction) -> FileExtraction {
    let mut seen_imports = HashSet::new();
    ex.imports.retain(|spec| seen_imports.insert(spec.clone()));

    let mut seen_names: HashSet<String> = HashSet::new();
    for sym in &mut ex.symbols {
        if !seen_names.insert(sym.name.clone()) {
            sym.name = format!("{}#{}", sym.name, sym.start);
            seen_names.insert(sym.name.clone());
        }
    }
    ex
}
