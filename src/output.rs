use serde::Serialize;

use crate::classify::project_type;
use crate::engine::Analysis;
use crate::graph::cycles::Cycle;
use crate::graph::metrics;
use crate::model::{ProjectModel, TagScope};

/// Aggregate statistics for one analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub files: usize,
    pub files_full: usize,
    pub files_degraded: usize,
    pub files_failed: usize,
    pub total_lines: usize,
    pub symbols: usize,
    pub imports_internal: usize,
    pub imports_external: usize,
    pub imports_unresolved: usize,
    pub calls_resolved: usize,
    pub calls_unresolved: usize,
    pub endpoints: usize,
    pub components: usize,
    pub project_type: String,
    pub frameworks: Vec<String>,
    pub cancelled: bool,
    /// Wall-clock time for the run in seconds.
    pub elapsed_secs: f64,
}

impl AnalysisSummary {
    pub fn from_analysis(analysis: &Analysis, elapsed_secs: f64) -> Self {
        let model = &analysis.model;
        let stats = &analysis.stats;
        Self {
            files: model.files().len(),
            files_full: stats.files_full,
            files_degraded: stats.files_degraded,
            files_failed: stats.files_failed,
            total_lines: model.files().iter().map(|f| f.lines).sum(),
            symbols: stats.symbols,
            imports_internal: stats.imports_internal,
            imports_external: stats.imports_external,
            imports_unresolved: stats.imports_unresolved,
            calls_resolved: stats.calls_resolved,
            calls_unresolved: stats.calls_unresolved,
            endpoints: model.endpoints.len(),
            components: model.components.len(),
            project_type: project_type(model).to_owned(),
            frameworks: model
                .tags
                .iter()
                .filter(|t| t.scope == TagScope::Project)
                .map(|t| t.framework.clone())
                .collect(),
            cancelled: analysis.cancelled,
            elapsed_secs,
        }
    }
}

/// Print a summary of the run.
///
/// Degraded/failed file warnings go to **stderr** so stdout stays clean for
/// downstream JSON consumers.
pub fn print_summary(summary: &AnalysisSummary, model: &ProjectModel, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("error serialising summary: {e}"),
        }
        return;
    }

    println!(
        "Analyzed {} files in {:.2}s ({} full, {} degraded, {} failed)",
        summary.files,
        summary.elapsed_secs,
        summary.files_full,
        summary.files_degraded,
        summary.files_failed
    );
    println!(
        "  {} lines, {} symbols, {} internal imports ({} external, {} unresolved)",
        summary.total_lines,
        summary.symbols,
        summary.imports_internal,
        summary.imports_external,
        summary.imports_unresolved
    );
    println!(
        "  {} calls resolved, {} unresolved",
        summary.calls_resolved, summary.calls_unresolved
    );
    println!("  project type: {}", summary.project_type);
    if !summary.frameworks.is_empty() {
        println!("  frameworks: {}", summary.frameworks.join(", "));
    }
    if summary.endpoints > 0 {
        println!("  {} endpoints", summary.endpoints);
    }
    if summary.components > 0 {
        println!("  {} components", summary.components);
    }
    if summary.cancelled {
        eprintln!("warning: run was cancelled; results are partial");
    }

    for (file, diag) in model.diagnostics() {
        eprintln!(
            "warning: {}: {:?}: {}",
            file.path.display(),
            diag.code,
            diag.message
        );
    }
}

/// Print the most complex files and the most-called symbols.
pub fn print_stats(model: &ProjectModel, top: usize, json: bool) {
    let mut ranked: Vec<_> = model.files().iter().collect();
    ranked.sort_by(|a, b| b.complexity.cmp(&a.complexity).then(a.path.cmp(&b.path)));
    ranked.truncate(top);
    let traffic = metrics::high_traffic(model, top);

    // Most depended-on files by import fan-in.
    let mut imported: Vec<_> = model
        .files()
        .iter()
        .map(|f| (f, model.dependency_graph.fan_in(f.id)))
        .filter(|&(_, n)| n > 0)
        .collect();
    imported.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.path.cmp(&b.0.path)));
    imported.truncate(top);

    if json {
        let value = serde_json::json!({
            "complex_files": ranked.iter().map(|f| serde_json::json!({
                "path": f.path,
                "complexity": f.complexity,
                "lines": f.lines,
            })).collect::<Vec<_>>(),
            "most_imported": imported.iter().map(|(f, n)| serde_json::json!({
                "path": f.path,
                "importers": n,
            })).collect::<Vec<_>>(),
            "high_traffic": traffic.iter().map(|(id, fan_in)| serde_json::json!({
                "symbol": model.symbol(*id).name,
                "file": model.file(model.symbol(*id).file).path,
                "fan_in": fan_in,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        return;
    }

    println!("most complex files:");
    for f in &ranked {
        println!("  {:>6}  {}", f.complexity, f.path.display());
    }
    if !imported.is_empty() {
        println!("most imported files:");
        for (f, n) in &imported {
            println!("  {:>6}  {}", n, f.path.display());
        }
    }
    if !traffic.is_empty() {
        println!("most called symbols:");
        for (id, fan_in) in &traffic {
            let sym = model.symbol(*id);
            println!(
                "  {:>6}  {} ({})",
                fan_in,
                sym.name,
                model.file(sym.file).path.display()
            );
        }
    }
}

pub fn print_cycles(cycles: &[Cycle], json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(cycles).unwrap_or_default()
        );
        return;
    }
    for cycle in cycles {
        let parts: Vec<String> = cycle
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("cycle: {}", parts.join(" <-> "));
    }
    println!("{} cycle(s) found", cycles.len());
}

pub fn print_endpoints(model: &ProjectModel, json: bool) {
    if json {
        let value: Vec<_> = model
            .endpoints
            .iter()
            .map(|e| {
                let sym = model.symbol(e.symbol);
                serde_json::json!({
                    "method": e.method.as_str(),
                    "path": e.path,
                    "handler": sym.name,
                    "file": model.file(sym.file).path,
                    "line": sym.span.start,
                    "framework": e.framework,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        return;
    }
    for e in &model.endpoints {
        let sym = model.symbol(e.symbol);
        println!(
            "{:7} {}  ->  {} ({}:{}) [{}]",
            e.method.as_str(),
            e.path,
            sym.name,
            model.file(sym.file).path.display(),
            sym.span.start,
            e.framework
        );
    }
    println!("{} endpoint(s) found", model.endpoints.len());
}
