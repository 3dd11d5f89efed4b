use std::collections::HashMap;

use crate::model::{FileId, ProjectModel, SymbolId};

/// Weights for the file complexity score. Each term captures one axis:
/// declaration volume, control-flow depth, and coupling. Overridable from
/// configuration, but every weight must stay positive so the score remains
/// monotonic — adding a symbol or a dependency can never lower it.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(default)]
pub struct ComplexityWeights {
    pub symbols: u64,
    pub nesting: u64,
    pub fan_out: u64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            symbols: 2,
            nesting: 3,
            fan_out: 1,
        }
    }
}

impl ComplexityWeights {
    pub fn validate(&self) -> bool {
        self.symbols > 0 && self.nesting > 0 && self.fan_out > 0
    }
}

/// Score every file and store the result on its `SourceFile`.
///
/// score = w_s * symbol_count + w_n * max_nesting + w_f * fan_out
///
/// Fan-out here is the file's total outward coupling: every import edge and
/// every call site it contains, whether resolved, external, or unresolved.
pub fn annotate_complexity(model: &mut ProjectModel, weights: ComplexityWeights) {
    let mut fan_out: HashMap<FileId, u64> = HashMap::new();
    for import in &model.imports {
        *fan_out.entry(import.from).or_default() += 1;
    }
    for call in &model.calls {
        *fan_out.entry(model.symbol(call.caller).file).or_default() += 1;
    }

    let scores: Vec<(FileId, u64)> = model
        .files()
        .iter()
        .map(|f| {
            let syms = model.symbols_in(f.id);
            let max_nesting = syms
                .iter()
                .map(|&s| model.symbol(s).nesting as u64)
                .max()
                .unwrap_or(0);
            let score = weights.symbols * syms.len() as u64
                + weights.nesting * max_nesting
                + weights.fan_out * fan_out.get(&f.id).copied().unwrap_or(0);
            (f.id, score)
        })
        .collect();
    for (id, score) in scores {
        model.file_mut(id).complexity = score;
    }
}

/// Symbols ranked by call-graph fan-in, highest first. Ties break by
/// qualified name so the ranking is stable. Symbols nobody calls are
/// omitted.
pub fn high_traffic(model: &ProjectModel, limit: usize) -> Vec<(SymbolId, usize)> {
    let mut ranked: Vec<(SymbolId, usize)> = model
        .symbols()
        .iter()
        .map(|s| (s.id, model.call_graph.fan_in(s.id)))
        .filter(|&(_, n)| n > 0)
        .collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| model.symbol(a.0).name.cmp(&model.symbol(b.0).name))
    });
    ranked.truncate(limit);
    ranked
}
