pub mod edge;
pub mod file;
pub mod surface;
pub mod symbol;
pub mod tag;

pub use edge::{CallEdge, ImportEdge};
pub use file::{FileId, ParseStatus, SourceFile};
pub use surface::{Component, ComponentKind, Endpoint, HttpMethod};
pub use symbol::{LineSpan, Symbol, SymbolId, SymbolKind};
pub use tag::{Confidence, FrameworkTag, Role, TagScope};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Diagnostic;
use crate::graph::{CallGraph, DependencyGraph};
use crate::language::Lang;

/// The complete aggregate for one analyzed project: files, symbols, edges,
/// tags, endpoints, components, and the derived graphs.
///
/// Built up mutably by the resolver/classifier/graph phases, then handed to
/// the rendering layer read-only. Arenas are private so the phase invariants
/// (a symbol's owning file exists before the symbol is added; resolution is
/// monotonic) cannot be bypassed from outside.
#[derive(Debug, Default, Serialize)]
pub struct ProjectModel {
    files: Vec<SourceFile>,
    #[serde(skip)]
    path_index: HashMap<PathBuf, FileId>,
    symbols: Vec<Symbol>,
    /// Symbol ids per file, parallel to `files`.
    #[serde(skip)]
    file_symbols: Vec<Vec<SymbolId>>,
    pub imports: Vec<ImportEdge>,
    pub calls: Vec<CallEdge>,
    pub tags: Vec<FrameworkTag>,
    pub endpoints: Vec<Endpoint>,
    pub components: Vec<Component>,
    /// Derived graphs. Skipped during serialization — the rendering layer
    /// reconstructs adjacency from the edge lists if it needs it.
    #[serde(skip)]
    pub dependency_graph: DependencyGraph,
    #[serde(skip)]
    pub call_graph: CallGraph,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    // -- mutation (engine phases only) --------------------------------------

    /// Add a file to the model. Returns the existing id when the path was
    /// already added.
    pub(crate) fn add_file(&mut self, path: PathBuf, lang: Lang, text: String) -> FileId {
        if let Some(&existing) = self.path_index.get(&path) {
            return existing;
        }
        let id = FileId(self.files.len());
        self.path_index.insert(path.clone(), id);
        self.files.push(SourceFile::new(id, path, lang, text));
        self.file_symbols.push(Vec::new());
        id
    }

    /// Add a symbol owned by `file`. The file must already exist in the
    /// model; the arena index bound enforces that.
    pub(crate) fn add_symbol(
        &mut self,
        file: FileId,
        kind: SymbolKind,
        name: String,
        span: LineSpan,
        decorators: Vec<String>,
        parent: Option<SymbolId>,
        nesting: usize,
        params: Vec<String>,
        exported: bool,
    ) -> SymbolId {
        assert!(file.0 < self.files.len(), "symbol added before its file");
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol {
            id,
            file,
            kind,
            name,
            span,
            decorators,
            parent,
            nesting,
            params,
            exported,
            roles: Vec::new(),
        });
        self.file_symbols[file.0].push(id);
        id
    }

    pub(crate) fn file_mut(&mut self, id: FileId) -> &mut SourceFile {
        &mut self.files[id.0]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    // -- read access --------------------------------------------------------

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn file_by_path(&self, path: &Path) -> Option<FileId> {
        self.path_index.get(path).copied()
    }

    /// Symbols declared in `file`, in declaration order.
    pub fn symbols_in(&self, file: FileId) -> &[SymbolId] {
        &self.file_symbols[file.0]
    }

    /// One diagnostics entry per degraded/failed file.
    pub fn diagnostics(&self) -> Vec<(&SourceFile, &Diagnostic)> {
        self.files
            .iter()
            .filter(|f| f.status != ParseStatus::Full)
            .flat_map(|f| f.diagnostics.iter().map(move |d| (f, d)))
            .collect()
    }

    /// Framework tags scoped to `file`.
    pub fn tags_for(&self, file: FileId) -> impl Iterator<Item = &FrameworkTag> {
        self.tags
            .iter()
            .filter(move |t| t.scope == TagScope::File(file))
    }
}
