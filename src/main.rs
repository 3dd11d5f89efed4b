use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use code_atlas::cli::{Cli, Commands};
use code_atlas::config::AtlasConfig;
use code_atlas::engine::{self, AnalyzeOptions, CancelFlag};
use code_atlas::graph::cycles::find_cycles;
use code_atlas::language::Lang;
use code_atlas::output;
use code_atlas::walker::walk_project;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            verbose,
            json,
            lang,
        } => {
            let started = Instant::now();
            let analysis = run_analysis(&path, verbose, &lang)?;
            let summary =
                output::AnalysisSummary::from_analysis(&analysis, started.elapsed().as_secs_f64());
            output::print_summary(&summary, &analysis.model, json);
        }
        Commands::Stats { path, top, json } => {
            let analysis = run_analysis(&path, false, &[])?;
            output::print_stats(&analysis.model, top, json);
        }
        Commands::Cycles { path, json } => {
            let analysis = run_analysis(&path, false, &[])?;
            let cycles = find_cycles(&analysis.model.dependency_graph, &analysis.model);
            output::print_cycles(&cycles, json);
        }
        Commands::Endpoints { path, json } => {
            let analysis = run_analysis(&path, false, &[])?;
            output::print_endpoints(&analysis.model, json);
        }
    }

    Ok(())
}

fn run_analysis(path: &Path, verbose: bool, lang: &[String]) -> Result<engine::Analysis> {
    let config = AtlasConfig::load(path);

    let mut allowed: HashSet<Lang> = HashSet::new();
    for name in lang.iter().chain(config.languages.iter().flatten()) {
        match Lang::from_str_loose(name) {
            Some(l) => {
                allowed.insert(l);
            }
            None => anyhow::bail!("unknown language: {name}"),
        }
    }
    let filter = (!allowed.is_empty()).then_some(&allowed);

    let candidates = walk_project(path, &config, verbose, filter)?;
    if verbose {
        eprintln!("walk: {} candidate file(s)", candidates.len());
    }

    let options = AnalyzeOptions {
        weights: config.effective_weights(),
    };
    let analysis = engine::analyze(path, candidates, options, &CancelFlag::new())?;
    if verbose {
        eprintln!(
            "extract: {} full, {} degraded, {} failed",
            analysis.stats.files_full, analysis.stats.files_degraded, analysis.stats.files_failed
        );
    }
    Ok(analysis)
}
