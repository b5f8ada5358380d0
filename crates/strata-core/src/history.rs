//! Lineage report: per-node rename and parent-name history

use crate::graph::Graph;
use crate::model::{CanonicalId, ParentSnapshot, RenameRecord};
use serde::Serialize;
use std::fmt;

/// History of a single canonical node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLineage {
    pub canonical_id: CanonicalId,
    pub display_name: String,
    pub transform_count: u32,
    pub renames: Vec<RenameRecord>,
    pub parent_snapshots: Vec<ParentSnapshot>,
}

/// Lineage of every node, sorted by canonical id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineageReport {
    pub nodes: Vec<NodeLineage>,
}

impl LineageReport {
    pub fn get(&self, id: &CanonicalId) -> Option<&NodeLineage> {
        self.nodes
            .binary_search_by(|n| n.canonical_id.cmp(id))
            .ok()
            .map(|i| &self.nodes[i])
    }
}

/// Build the lineage report. Read-only.
pub fn lineage_report(graph: &Graph) -> LineageReport {
    let mut nodes: Vec<NodeLineage> = graph
        .all_nodes()
        .map(|node| NodeLineage {
            canonical_id: node.canonical_id().clone(),
            display_name: node.display_name().to_string(),
            transform_count: node.transform_count(),
            renames: node.rename_history().to_vec(),
            parent_snapshots: node.parent_history().to_vec(),
        })
        .collect();
    nodes.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));
    LineageReport { nodes }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for NodeLineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.canonical_id)?;
        write!(
            f,
            "   transforms ({}): [{}]",
            self.transform_count,
            join(&self.renames)
        )?;
        for (step, parents) in self.parent_snapshots.iter().enumerate() {
            write!(f, "\n   step {} parent map: [{}]", step + 1, join(parents))?;
        }
        Ok(())
    }
}

impl fmt::Display for LineageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
