use serde::{Deserialize, Serialize};

/// A programming language the engine knows how to process.
///
/// Plain enum (not trait objects): adapters are selected by matching on this
/// tag at a single dispatch point, which keeps per-language logic out of the
/// rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    Python,
    TypeScript,
    JavaScript,
    Rust,
    /// Go has no bundled grammar — served entirely by the fallback
    /// pattern-matching tier.
    Go,
    /// Caller declared the language as unknown. Fallback tier only.
    Unknown,
}

impl Lang {
    /// Detect a language from a file extension. Returns `Unknown` for
    /// extensions the engine has no handling for.
    pub fn from_extension(ext: &str) -> Lang {
        match ext {
            "py" | "pyi" => Lang::Python,
            "ts" | "tsx" => Lang::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Lang::JavaScript,
            "rs" => Lang::Rust,
            "go" => Lang::Go,
            _ => Lang::Unknown,
        }
    }

    /// Parse a CLI/config string into a `Lang`. Case-insensitive.
    pub fn from_str_loose(s: &str) -> Option<Lang> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Some(Lang::Python),
            "typescript" | "ts" => Some(Lang::TypeScript),
            "javascript" | "js" => Some(Lang::JavaScript),
            "rust" | "rs" => Some(Lang::Rust),
            "go" | "golang" => Some(Lang::Go),
            _ => None,
        }
    }

    /// Human-readable display name for summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Lang::Python => "Python",
            Lang::TypeScript => "TypeScript",
            Lang::JavaScript => "JavaScript",
            Lang::Rust => "Rust",
            Lang::Go => "Go",
            Lang::Unknown => "unknown",
        }
    }

    /// True when a full tree-sitter grammar is available for this language.
    /// Languages without one go straight to the fallback tier.
    pub fn has_grammar(&self) -> bool {
        matches!(
            self,
            Lang::Python | Lang::TypeScript | Lang::JavaScript | Lang::Rust
        )
    }

    /// Source-file extensions this language may resolve to, in preference
    /// order. Used by the resolver's extension-insensitive matching step.
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            Lang::Python => &["py", "pyi"],
            Lang::TypeScript => &["ts", "tsx", "js", "jsx"],
            Lang::JavaScript => &["js", "jsx", "ts", "tsx", "mjs", "cjs"],
            Lang::Rust => &["rs"],
            Lang::Go => &["go"],
            Lang::Unknown => &[],
        }
    }
}

/// All extensions the walker treats as source files.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "pyi", "ts", "tsx", "js", "jsx", "mjs", "cjs", "rs", "go",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Lang::from_extension("py"), Lang::Python);
        assert_eq!(Lang::from_extension("tsx"), Lang::TypeScript);
        assert_eq!(Lang::from_extension("jsx"), Lang::JavaScript);
        assert_eq!(Lang::from_extension("rs"), Lang::Rust);
        assert_eq!(Lang::from_extension("go"), Lang::Go);
        assert_eq!(Lang::from_extension("rb"), Lang::Unknown);
        assert_eq!(Lang::from_extension(""), Lang::Unknown);
    }

    #[test]
    fn test_from_str_loose() {
        assert_eq!(Lang::from_str_loose("Python"), Some(Lang::Python));
        assert_eq!(Lang::from_str_loose("ts"), Some(Lang::TypeScript));
        assert_eq!(Lang::from_str_loose("golang"), Some(Lang::Go));
        assert_eq!(Lang::from_str_loose("cobol"), None);
    }

    #[test]
    fn test_grammar_availability() {
        assert!(Lang::Python.has_grammar());
        assert!(Lang::Rust.has_grammar());
        assert!(!Lang::Go.has_grammar());
        assert!(!Lang::Unknown.has_grammar());
    }

    #[test]
    fn test_source_extensions_cover_walker_list() {
        for ext in ["py", "ts", "js", "rs", "go"] {
            assert!(SOURCE_EXTENSIONS.contains(&ext));
            assert_ne!(Lang::from_extension(ext), Lang::Unknown);
        }
    }
}
