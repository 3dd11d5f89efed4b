//! Cross-language code analysis engine.
//!
//! code-atlas extracts symbols, imports, and call sites from Python,
//! TypeScript/JavaScript, and Rust sources (with a pattern-matching
//! fallback for everything else), resolves them into file dependency and
//! symbol call graphs, classifies frameworks and structural roles, and
//! extracts the project's API surface — HTTP endpoints and UI components.
//!
//! The pipeline is strictly phased: every candidate file is extracted
//! before anything resolves, so results never depend on file visit order.
//! Per-file problems degrade that file and are recorded as diagnostics;
//! they never abort a run.

pub mod adapter;
pub mod classify;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod language;
pub mod model;
pub mod output;
pub mod resolver;
pub mod surface;
pub mod walker;

pub use engine::{Analysis, AnalyzeOptions, CancelFlag, analyze};
pub use error::{EngineError, Result};
pub use language::Lang;
pub use model::ProjectModel;
