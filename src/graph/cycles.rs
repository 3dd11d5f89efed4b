use std::collections::HashMap;
use std::path::PathBuf;

use petgraph::Directed;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::Graph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::graph::DependencyGraph;
use crate::model::ProjectModel;

/// A set of files forming a circular dependency.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Cycle {
    /// Unique member files, sorted by path. No closing repeat.
    pub files: Vec<PathBuf>,
}

/// Detect circular dependencies in the project's import graph.
///
/// Kosaraju's SCC algorithm needs a regular (non-stable) petgraph `Graph`,
/// so the dependency graph is first copied into one. Strongly connected
/// components with more than one file are cycles.
///
/// Cycles are sorted by their first file path so output is deterministic.
pub fn find_cycles(dep: &DependencyGraph, model: &ProjectModel) -> Vec<Cycle> {
    let mut file_graph: Graph<crate::model::FileId, (), Directed> = Graph::new();
    let mut stable_to_plain = HashMap::new();

    for idx in dep.graph.node_indices() {
        let plain = file_graph.add_node(dep.graph[idx]);
        stable_to_plain.insert(idx, plain);
    }
    for edge in dep.graph.edge_references() {
        file_graph.add_edge(
            stable_to_plain[&edge.source()],
            stable_to_plain[&edge.target()],
            (),
        );
    }

    let mut cycles: Vec<Cycle> = kosaraju_scc(&file_graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut files: Vec<PathBuf> = scc
                .iter()
                .map(|&idx| model.file(file_graph[idx]).path.clone())
                .collect();
            files.sort();
            Cycle { files }
        })
        .collect();

    cycles.sort_by(|a, b| a.files[0].cmp(&b.files[0]));
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Lang;
    use crate::model::ImportEdge;

    fn model_with_imports(names: &[&str], edges: &[(usize, usize)]) -> ProjectModel {
        let mut model = ProjectModel::new();
        let ids: Vec<_> = names
            .iter()
            .map(|n| model.add_file(PathBuf::from(n), Lang::TypeScript, String::new()))
            .collect();
        for &(from, to) in edges {
            model.imports.push(ImportEdge {
                from: ids[from],
                specifier: names[to].to_owned(),
                target: Some(ids[to]),
                external: false,
            });
        }
        model.dependency_graph = DependencyGraph::build(model.files(), &model.imports);
        model
    }

    #[test]
    fn test_mutual_cycle_detected() {
        let model = model_with_imports(&["a.ts", "b.ts"], &[(0, 1), (1, 0)]);
        let cycles = find_cycles(&model.dependency_graph, &model);
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            cycles[0].files,
            vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")]
        );
    }

    #[test]
    fn test_three_file_cycle_lists_each_file_once() {
        let model = model_with_imports(&["a.ts", "b.ts", "c.ts"], &[(0, 1), (1, 2), (2, 0)]);
        let cycles = find_cycles(&model.dependency_graph, &model);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].files.len(), 3);
        assert_ne!(cycles[0].files.first(), cycles[0].files.last());
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let model = model_with_imports(&["a.ts", "b.ts", "c.ts"], &[(0, 1), (1, 2)]);
        assert!(find_cycles(&model.dependency_graph, &model).is_empty());
    }

    #[test]
    fn test_two_disjoint_cycles_sorted_by_first_path() {
        let model = model_with_imports(
            &["x.ts", "y.ts", "a.ts", "b.ts"],
            &[(0, 1), (1, 0), (2, 3), (3, 2)],
        );
        let cycles = find_cycles(&model.dependency_graph, &model);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].files[0], PathBuf::from("a.ts"));
        assert_eq!(cycles[1].files[0], PathBuf::from("x.ts"));
    }
}
