use serde::{Deserialize, Serialize};

use crate::model::file::FileId;
use crate::model::symbol::SymbolId;

/// One import statement from a source file.
///
/// Resolution is monotonic: `target` may move from `None` to `Some` during
/// the resolver phase, never back, and no other phase touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: FileId,
    /// Raw specifier as written: `"./utils"`, `"fastapi"`, `"crate::model"`.
    pub specifier: String,
    /// Resolved target file, or `None` for external/unresolved imports.
    pub target: Option<FileId>,
    /// True when the specifier was classified as an external package rather
    /// than a project file that failed to match.
    pub external: bool,
}

/// One call site attributed to its enclosing symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: SymbolId,
    /// Raw callee name as written (`save`, `db.commit`, `useState`).
    pub callee: String,
    /// Resolved callee symbol. `None` means unresolved/dynamic/external —
    /// recorded, never raised as a failure.
    pub target: Option<SymbolId>,
}
