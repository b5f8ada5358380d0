//! Random dependency-graph generator

use crate::error::Result;
use crate::graph::Graph;
use crate::model::GraphNode;
use crate::naming::nth_name;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Shape of a generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of nodes to create
    pub nodes: usize,
    /// Probability of an edge between any ordered pair of distinct nodes
    pub edge_density: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nodes: 12,
            edge_density: 0.25,
        }
    }
}

/// Build a random graph named `A0, B0, …` with at least one root.
///
/// Candidate edges are drawn first; if none of the nodes would be a root, a
/// random node is chosen and its incoming candidates are discarded before any
/// edge is inserted.
pub fn generate(config: &GeneratorConfig, rng: &mut RandomSource) -> Result<Graph> {
    let mut graph = Graph::new();
    let names: Vec<String> = (0..config.nodes).map(nth_name).collect();
    for name in &names {
        graph.add_node(GraphNode::new(name.as_str(), name.as_str())?)?;
    }

    let mut candidates = Vec::new();
    for (s, source) in names.iter().enumerate() {
        for (d, target) in names.iter().enumerate() {
            if s == d {
                continue;
            }
            if rng.chance(config.edge_density) {
                candidates.push((source, target));
            }
        }
    }

    let has_root = names
        .iter()
        .any(|name| candidates.iter().all(|(_, target)| *target != name));
    if !has_root {
        if let Some(i) = rng.pick(names.len()) {
            let root = &names[i];
            tracing::debug!("No natural root; forcing {} to be one", root);
            candidates.retain(|(_, target)| *target != root);
        }
    }

    for (source, target) in candidates {
        graph.add_edge(source.as_str(), target.as_str())?;
    }

    tracing::info!(
        "Generated graph with {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
