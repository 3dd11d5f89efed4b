use serde::{Deserialize, Serialize};

use crate::model::file::FileId;

/// How strongly a classification signal implies its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Where a framework tag applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagScope {
    Project,
    File(FileId),
}

/// A detected framework, with the signals that triggered it.
///
/// Tags accumulate — conflicting signals on one file produce multiple tags,
/// never a forced single choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkTag {
    pub scope: TagScope,
    pub framework: String,
    /// Human-readable evidence, e.g. `import:fastapi` or `decorator:@app.get`.
    pub signals: Vec<String>,
    pub confidence: Confidence,
}

/// Structural role of a file or symbol. Absence of a role is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    EntryPoint,
    Configuration,
    Test,
    UiComponent,
    RouteHandler,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::EntryPoint => "entry-point",
            Role::Configuration => "configuration",
            Role::Test => "test",
            Role::UiComponent => "ui-component",
            Role::RouteHandler => "route-handler",
        }
    }
}
