pub mod cycles;
pub mod metrics;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};

use crate::model::{CallEdge, FileId, ImportEdge, SourceFile, Symbol, SymbolId};

/// File-level dependency graph: one node per analyzed file, one edge per
/// resolved import. External and unresolved imports never become nodes;
/// they are tallied so stats can report them.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    pub graph: StableGraph<FileId, (), Directed>,
    pub node_of: HashMap<FileId, NodeIndex>,
    pub external_imports: usize,
    pub unresolved_imports: usize,
}

impl DependencyGraph {
    pub fn build(files: &[SourceFile], imports: &[ImportEdge]) -> Self {
        let mut dep = Self::default();
        for file in files {
            let idx = dep.graph.add_node(file.id);
            dep.node_of.insert(file.id, idx);
        }
        for edge in imports {
            match edge.target {
                Some(target) if !edge.external => {
                    let (from, to) = (dep.node_of[&edge.from], dep.node_of[&target]);
                    // Multiple specifiers between the same pair collapse to
                    // one edge so fan counts mean distinct files.
                    if !dep.graph.contains_edge(from, to) {
                        dep.graph.add_edge(from, to, ());
                    }
                }
                _ if edge.external => dep.external_imports += 1,
                _ => dep.unresolved_imports += 1,
            }
        }
        dep
    }

    /// Distinct files this file imports.
    pub fn fan_out(&self, file: FileId) -> usize {
        self.neighbors(file, petgraph::Direction::Outgoing).len()
    }

    /// Distinct files importing this file.
    pub fn fan_in(&self, file: FileId) -> usize {
        self.neighbors(file, petgraph::Direction::Incoming).len()
    }

    pub fn dependencies(&self, file: FileId) -> Vec<FileId> {
        self.neighbors(file, petgraph::Direction::Outgoing)
    }

    pub fn dependents(&self, file: FileId) -> Vec<FileId> {
        self.neighbors(file, petgraph::Direction::Incoming)
    }

    fn neighbors(&self, file: FileId, dir: petgraph::Direction) -> Vec<FileId> {
        let Some(&idx) = self.node_of.get(&file) else {
            return Vec::new();
        };
        let mut out: Vec<FileId> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Symbol-level call graph over resolved call edges. Unresolved callees
/// (externals, dynamic dispatch) are counted, not modeled.
#[derive(Debug, Default)]
pub struct CallGraph {
    pub graph: StableGraph<SymbolId, (), Directed>,
    pub node_of: HashMap<SymbolId, NodeIndex>,
    pub unresolved_calls: usize,
}

impl CallGraph {
    pub fn build(symbols: &[Symbol], calls: &[CallEdge]) -> Self {
        let mut cg = Self::default();
        for sym in symbols {
            let idx = cg.graph.add_node(sym.id);
            cg.node_of.insert(sym.id, idx);
        }
        for call in calls {
            match call.target {
                Some(target) => {
                    let (from, to) = (cg.node_of[&call.caller], cg.node_of[&target]);
                    cg.graph.add_edge(from, to, ());
                }
                None => cg.unresolved_calls += 1,
            }
        }
        cg
    }

    /// Number of call sites targeting this symbol. Counts sites, not
    /// distinct callers — three calls from one function are fan-in 3.
    pub fn fan_in(&self, symbol: SymbolId) -> usize {
        let Some(&idx) = self.node_of.get(&symbol) else {
            return 0;
        };
        self.graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .count()
    }

    pub fn fan_out(&self, symbol: SymbolId) -> usize {
        let Some(&idx) = self.node_of.get(&symbol) else {
            return 0;
        };
        self.graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Lang;
    use crate::model::ImportEdge;
    use std::path::PathBuf;

    fn file(id: usize, name: &str) -> SourceFile {
        SourceFile::new(FileId(id), PathBuf::from(name), Lang::Python, String::new())
    }

    // Out-degree counts distinct target files, not distinct specifiers:
    // two different specifiers naming the same file are one dependency.
    // Imports resolving to distinct files each contribute one edge, so a
    // file with N resolvable imports of N different files has out-degree N.
    #[test]
    fn test_duplicate_imports_collapse_to_one_edge() {
        let files = vec![file(0, "a.py"), file(1, "b.py")];
        let imports = vec![
            ImportEdge {
                from: FileId(0),
                specifier: "b".into(),
                target: Some(FileId(1)),
                external: false,
            },
            ImportEdge {
                from: FileId(0),
                specifier: ".b".into(),
                target: Some(FileId(1)),
                external: false,
            },
        ];
        let dep = DependencyGraph::build(&files, &imports);
        assert_eq!(dep.fan_out(FileId(0)), 1);
        assert_eq!(dep.fan_in(FileId(1)), 1);
    }

    #[test]
    fn test_external_and_unresolved_are_tallied_not_nodes() {
        let files = vec![file(0, "a.py")];
        let imports = vec![
            ImportEdge {
                from: FileId(0),
                specifier: "os".into(),
                target: None,
                external: true,
            },
            ImportEdge {
                from: FileId(0),
                specifier: "missing".into(),
                target: None,
                external: false,
            },
        ];
        let dep = DependencyGraph::build(&files, &imports);
        assert_eq!(dep.graph.node_count(), 1);
        assert_eq!(dep.external_imports, 1);
        assert_eq!(dep.unresolved_imports, 1);
        assert_eq!(dep.fan_out(FileId(0)), 0);
    }

    #[test]
    fn test_dependencies_and_dependents_sorted() {
        let files = vec![file(0, "a.py"), file(1, "b.py"), file(2, "c.py")];
        let imports = vec![
            ImportEdge {
                from: FileId(0),
                specifier: "c".into(),
                target: Some(FileId(2)),
                external: false,
            },
            ImportEdge {
                from: FileId(0),
                specifier: "b".into(),
                target: Some(FileId(1)),
                external: false,
            },
            ImportEdge {
                from: FileId(1),
                specifier: "c".into(),
                target: Some(FileId(2)),
                external: false,
            },
        ];
        let dep = DependencyGraph::build(&files, &imports);
        assert_eq!(dep.dependencies(FileId(0)), vec![FileId(1), FileId(2)]);
        assert_eq!(dep.dependents(FileId(2)), vec![FileId(0), FileId(1)]);
        assert!(dep.dependents(FileId(0)).is_empty());
    }

    #[test]
    fn test_call_fan_in_counts_sites() {
        use crate::model::{LineSpan, SymbolKind};
        let mk = |id: usize, name: &str| Symbol {
            id: SymbolId(id),
            file: FileId(0),
            kind: SymbolKind::Function,
            name: name.into(),
            span: LineSpan { start: 1, end: 1 },
            decorators: vec![],
            parent: None,
            nesting: 0,
            params: vec![],
            exported: false,
            roles: vec![],
        };
        let symbols = vec![mk(0, "a"), mk(1, "b")];
        let calls = vec![
            CallEdge {
                caller: SymbolId(0),
                callee: "b".into(),
                target: Some(SymbolId(1)),
            },
            CallEdge {
                caller: SymbolId(0),
                callee: "b".into(),
                target: Some(SymbolId(1)),
            },
            CallEdge {
                caller: SymbolId(0),
                callee: "ext".into(),
                target: None,
            },
        ];
        let cg = CallGraph::build(&symbols, &calls);
        assert_eq!(cg.fan_in(SymbolId(1)), 2);
        assert_eq!(cg.unresolved_calls, 1);
    }
}
