//! Package dependency graph and Graphviz export.

use std::collections::HashMap;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::WorkspaceError;
use crate::manifest::ManifestDoc;
use crate::workspace::Workspace;

/// Dependency digraph over a workspace's packages.
///
/// Edges point from a package to each of its dependencies. By default only
/// in-workspace targets get edges; with `include_external` every declared
/// dependency becomes a node.
#[derive(Debug)]
pub struct DepGraph {
    graph: DiGraph<String, &'static str>,
    /// Packages whose manifest could not be parsed; reported, not fatal.
    pub skipped: Vec<String>,
}

impl DepGraph {
    /// Build the graph for every package under the workspace source root.
    pub fn build(ws: &Workspace, include_external: bool) -> Result<Self, WorkspaceError> {
        let names = ws.package_names()?;
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut skipped = Vec::new();

        for name in &names {
            nodes.insert(name.clone(), graph.add_node(name.clone()));
        }

        for name in &names {
            let manifest = match ManifestDoc::load(&ws.manifest_path(name)) {
                Ok(m) => m,
                Err(_) => {
                    skipped.push(name.clone());
                    continue;
                }
            };
            let from = nodes[name];
            for dep in manifest.dependencies() {
                let to = match nodes.get(&dep) {
                    Some(&idx) => idx,
                    None if include_external => {
                        let idx = graph.add_node(dep.clone());
                        nodes.insert(dep.clone(), idx);
                        idx
                    }
                    None => continue,
                };
                graph.add_edge(from, to, "");
            }
        }

        Ok(Self { graph, skipped })
    }

    /// Restrict to the subgraph reachable from `root` (the package and its
    /// transitive dependencies).
    pub fn reachable_from(&self, root: &str) -> Option<DepGraph> {
        let start = self
            .graph
            .node_indices()
            .find(|&idx| self.graph[idx] == root)?;

        let mut keep = vec![false; self.graph.node_count()];
        let mut dfs = petgraph::visit::Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            keep[idx.index()] = true;
        }

        let graph = self.graph.filter_map(
            |idx, weight| keep[idx.index()].then(|| weight.clone()),
            |_, _| Some(""),
        );
        Some(DepGraph {
            graph,
            skipped: self.skipped.clone(),
        })
    }

    /// Number of package nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
