use serde::{Deserialize, Serialize};

use crate::model::file::FileId;
use crate::model::tag::Role;

/// Stable identifier for a [`Symbol`] inside one `ProjectModel`.
/// Index into the model's symbol arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SymbolId(pub usize);

/// The kind of a named declaration extracted from source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Class,
    /// A UI component: a function or class whose body produces markup
    /// (JSX) or that matches a framework component convention.
    Component,
    Variable,
}

/// 1-based inclusive line span of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

/// A named function/class/component/variable declaration.
///
/// `name` is qualified within its file (`Class.method`, `outer.inner`) and
/// unique per file; global uniqueness is not assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub file: FileId,
    pub kind: SymbolKind,
    pub name: String,
    pub span: LineSpan,
    /// Decorator/annotation/attribute text preserved verbatim, e.g.
    /// `@app.get("/users/{id}")` or `#[get("/users/<id>")]`.
    pub decorators: Vec<String>,
    /// Owning class/function, if nested.
    pub parent: Option<SymbolId>,
    /// Maximum statement nesting depth observed inside the body.
    pub nesting: usize,
    /// Declared parameter names. For components these are the prop names.
    pub params: Vec<String>,
    pub exported: bool,
    /// Structural roles assigned by the classifier. Empty is normal.
    pub roles: Vec<Role>,
}

impl Symbol {
    /// Last segment of the qualified name (`Class.method` -> `method`).
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}
