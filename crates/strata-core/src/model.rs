//! Core data structures: node identity, display names and per-node history

use crate::error::{Result, StrataError};
use crate::naming::is_valid_name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permanent identity of a node. Never changes while the display name mutates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn new(id: impl Into<String>) -> Self {
        CanonicalId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalId {
    fn from(s: &str) -> Self {
        CanonicalId(s.to_string())
    }
}

impl From<String> for CanonicalId {
    fn from(s: String) -> Self {
        CanonicalId(s)
    }
}

/// One entry of a node's rename history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    pub old_name: String,
    pub new_name: String,
}

impl fmt::Display for RenameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.old_name, self.new_name)
    }
}

/// How one upstream neighbor was named when its dependent was transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRename {
    /// Parent's name at the start of the layer pass.
    pub before: String,
    /// Parent's name at the moment the dependent was renamed.
    pub after: String,
}

impl fmt::Display for ParentRename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.before, self.after)
    }
}

/// Parent names captured during one transformation pass, in predecessor order.
pub type ParentSnapshot = Vec<ParentRename>;

/// A single dependency unit in the graph.
///
/// History fields are append-only; `rename_history.len() == transform_count`
/// holds at all times because both only change through [`GraphNode::apply_rename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    canonical_id: CanonicalId,
    display_name: String,
    transform_count: u32,
    rename_history: Vec<RenameRecord>,
    parent_history: Vec<ParentSnapshot>,
}

impl GraphNode {
    /// Create a fresh node. Fails if `display_name` is not `<letters><digits>`.
    pub fn new(canonical_id: impl Into<CanonicalId>, display_name: impl Into<String>) -> Result<Self> {
        let display_name = display_name.into();
        if !is_valid_name(&display_name) {
            return Err(StrataError::format(display_name));
        }
        Ok(GraphNode {
            canonical_id: canonical_id.into(),
            display_name,
            transform_count: 0,
            rename_history: Vec::new(),
            parent_history: Vec::new(),
        })
    }

    /// Rebuild a node from persisted state, re-checking every invariant.
    pub fn restore(
        canonical_id: impl Into<CanonicalId>,
        display_name: impl Into<String>,
        transform_count: u32,
        rename_history: Vec<RenameRecord>,
        parent_history: Vec<ParentSnapshot>,
    ) -> Result<Self> {
        let mut node = GraphNode::new(canonical_id, display_name)?;
        if rename_history.len() != transform_count as usize {
            return Err(StrataError::Snapshot(format!(
                "node {} has transform_count {} but {} rename records",
                node.canonical_id,
                transform_count,
                rename_history.len()
            )));
        }
        if parent_history.len() > rename_history.len() {
            return Err(StrataError::Snapshot(format!(
                "node {} has more parent snapshots than renames",
                node.canonical_id
            )));
        }
        for record in &rename_history {
            for name in [&record.old_name, &record.new_name] {
                if !is_valid_name(name) {
                    return Err(StrataError::format(name.as_str()));
                }
            }
        }
        if let Some(last) = rename_history.last() {
            if last.new_name != node.display_name {
                return Err(StrataError::Snapshot(format!(
                    "node {} is named {} but its last rename produced {}",
                    node.canonical_id, node.display_name, last.new_name
                )));
            }
        }
        node.transform_count = transform_count;
        node.rename_history = rename_history;
        node.parent_history = parent_history;
        Ok(node)
    }

    pub fn canonical_id(&self) -> &CanonicalId {
        &self.canonical_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn transform_count(&self) -> u32 {
        self.transform_count
    }

    pub fn rename_history(&self) -> &[RenameRecord] {
        &self.rename_history
    }

    pub fn parent_history(&self) -> &[ParentSnapshot] {
        &self.parent_history
    }

    /// Set a new display name, appending to the rename history.
    pub fn apply_rename(&mut self, new_name: impl Into<String>) -> Result<&RenameRecord> {
        let new_name = new_name.into();
        if !is_valid_name(&new_name) {
            return Err(StrataError::format(new_name));
        }
        let old_name = std::mem::replace(&mut self.display_name, new_name.clone());
        self.rename_history.push(RenameRecord { old_name, new_name });
        self.transform_count += 1;
        Ok(&self.rename_history[self.rename_history.len() - 1])
    }

    pub fn record_parents(&mut self, snapshot: ParentSnapshot) {
        self.parent_history.push(snapshot);
    }
}

/// A directed edge: `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: CanonicalId,
    pub target: CanonicalId,
}

impl GraphEdge {
    pub fn new(source: impl Into<CanonicalId>, target: impl Into<CanonicalId>) -> Self {
        GraphEdge {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
