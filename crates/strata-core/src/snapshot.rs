//! JSON snapshot of a graph and its per-node history

use crate::error::Result;
use crate::graph::Graph;
use crate::model::{GraphNode, ParentSnapshot, RenameRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Persisted state of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub display_name: String,
    #[serde(default)]
    pub transform_count: u32,
    #[serde(default)]
    pub rename_history: Vec<RenameRecord>,
    #[serde(default)]
    pub parent_history: Vec<ParentSnapshot>,
}

/// On-disk form: canonical id -> node state, plus the edge list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    pub nodes: BTreeMap<String, NodeState>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl GraphSnapshot {
    /// Capture the current state of `graph`.
    pub fn capture(graph: &Graph) -> Self {
        let nodes = graph
            .all_nodes()
            .map(|n| {
                (
                    n.canonical_id().to_string(),
                    NodeState {
                        display_name: n.display_name().to_string(),
                        transform_count: n.transform_count(),
                        rename_history: n.rename_history().to_vec(),
                        parent_history: n.parent_history().to_vec(),
                    },
                )
            })
            .collect();
        let edges = graph
            .edges()
            .map(|e| (e.source.to_string(), e.target.to_string()))
            .collect();
        GraphSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            nodes,
            edges,
        }
    }

    /// Rebuild a graph, re-validating names, ids and history lengths.
    ///
    /// Nodes are registered in canonical-id order and edges in file order.
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::new();
        for (id, state) in self.nodes {
            graph.add_node(GraphNode::restore(
                id,
                state.display_name,
                state.transform_count,
                state.rename_history,
                state.parent_history,
            )?)?;
        }
        for (source, target) in self.edges {
            graph.add_edge(source, target)?;
        }
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialize `graph` to `path` as pretty JSON.
pub fn save_snapshot(graph: &Graph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = GraphSnapshot::capture(graph).to_json()?;
    std::fs::write(path, json)?;
    tracing::debug!("Graph snapshot saved: {}", path.display());
    Ok(())
}

/// Load a graph previously written by [`save_snapshot`] (or hand-written in the same shape).
pub fn load_snapshot(path: &Path) -> Result<Graph> {
    let json = std::fs::read_to_string(path)?;
    let graph = GraphSnapshot::from_json(&json)?.into_graph()?;
    tracing::debug!(
        "Graph snapshot loaded from {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
