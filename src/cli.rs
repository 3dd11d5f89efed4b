use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A cross-language code analysis engine.
///
/// code-atlas extracts symbols, imports, and calls from a project, resolves
/// them into dependency and call graphs, detects frameworks and entry
/// points, and reports the project's API surface.
#[derive(Parser, Debug)]
#[command(
    name = "code-atlas",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a project and print a summary of what was extracted.
    Analyze {
        /// Path to the project root.
        path: PathBuf,

        /// Print each discovered file path during the walk.
        #[arg(short, long)]
        verbose: bool,

        /// Output results as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,

        /// Restrict analysis to these languages (comma-separated:
        /// python,typescript,javascript,rust,go).
        #[arg(long, value_delimiter = ',')]
        lang: Vec<String>,
    },

    /// Report the most complex files and most-called symbols.
    Stats {
        /// Path to the project root.
        path: PathBuf,

        /// How many entries to show per ranking.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Output results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Detect circular dependencies in the import graph.
    Cycles {
        /// Path to the project root.
        path: PathBuf,

        /// Output results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List HTTP endpoints recognized from routing patterns.
    Endpoints {
        /// Path to the project root.
        path: PathBuf,

        /// Output results as JSON.
        #[arg(long)]
        json: bool,
    },
}
