use serde::{Deserialize, Serialize};

use crate::model::symbol::SymbolId;

/// HTTP method recognized from a routing pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    /// Catch-all registrations (`app.use`, `@app.route` without methods).
    Any,
}

impl HttpMethod {
    pub fn from_verb(verb: &str) -> Option<HttpMethod> {
        match verb.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "all" | "any" | "route" | "use" => Some(HttpMethod::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Any => "ANY",
        }
    }
}

/// A typed API endpoint derived from a recognized routing pattern.
///
/// `path` is preserved verbatim including parameter syntax — no trailing
/// slash or parameter normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub symbol: SymbolId,
    pub method: HttpMethod,
    pub path: String,
    /// Which framework's pattern matched, e.g. "fastapi" or "express".
    pub framework: String,
}

/// Function vs class component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Function,
    Class,
}

/// A UI-component record: declared prop names and detected hook/lifecycle
/// call names (names only, taken from the symbol's call edges).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub symbol: SymbolId,
    pub kind: ComponentKind,
    pub props: Vec<String>,
    pub hooks: Vec<String>,
}
