//! Whole-graph analysis: dependency paths, cycle groups and summary metrics

use crate::graph::Graph;
use crate::model::CanonicalId;
use petgraph::algo;
use serde::Serialize;

/// Summary numbers for a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphMetrics {
    pub num_nodes: usize,
    pub num_edges: usize,
    /// `edges / (n * (n - 1))`; 0 for fewer than two nodes
    pub density: f64,
    pub is_dag: bool,
    pub num_weakly_connected_components: usize,
    pub num_strongly_connected_components: usize,
    /// Strongly connected components with more than one node
    pub cycle_groups: usize,
}

/// Shortest dependency path from `from` to `to`, following edge direction.
///
/// `None` when either node is unknown or no path exists.
pub fn dependency_path(graph: &Graph, from: &CanonicalId, to: &CanonicalId) -> Option<Vec<CanonicalId>> {
    let start = graph.index_of(from).ok()?;
    let goal = graph.index_of(to).ok()?;
    let inner = graph.inner();
    let (_, path) = algo::astar(inner, start, |n| n == goal, |_| 1usize, |_| 0)?;
    Some(
        path.into_iter()
            .filter_map(|idx| inner.node_weight(idx))
            .map(|n| n.canonical_id().clone())
            .collect(),
    )
}

/// Groups of nodes that depend on each other circularly.
///
/// Each group is sorted, and groups are ordered by their first member.
pub fn dependency_cycles(graph: &Graph) -> Vec<Vec<CanonicalId>> {
    let inner = graph.inner();
    let mut groups: Vec<Vec<CanonicalId>> = algo::tarjan_scc(inner)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut ids: Vec<CanonicalId> = scc
                .into_iter()
                .filter_map(|idx| inner.node_weight(idx))
                .map(|n| n.canonical_id().clone())
                .collect();
            ids.sort();
            ids
        })
        .collect();
    groups.sort();
    groups
}

pub fn metrics(graph: &Graph) -> GraphMetrics {
    let inner = graph.inner();
    let n = graph.node_count();
    let e = graph.edge_count();
    let density = if n > 1 {
        e as f64 / (n * (n - 1)) as f64
    } else {
        0.0
    };
    let sccs = algo::tarjan_scc(inner);
    GraphMetrics {
        num_nodes: n,
        num_edges: e,
        density,
        is_dag: !algo::is_cyclic_directed(inner),
        num_weakly_connected_components: algo::connected_components(inner),
        num_strongly_connected_components: sccs.len(),
        cycle_groups: sccs.iter().filter(|scc| scc.len() > 1).count(),
    }
}
