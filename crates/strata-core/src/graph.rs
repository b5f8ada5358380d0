//! Graph arena using petgraph::DiGraph keyed by canonical id

use crate::error::{Result, StrataError};
use crate::layering::ALIAS_SEPARATOR;
use crate::model::*;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

/// Current-name-keyed adjacency: node name -> neighbor names.
pub type AdjacencyView = BTreeMap<String, Vec<String>>;

/// The dependency graph: an arena of nodes addressed by canonical id.
///
/// Nodes and edges are only ever added, so petgraph indices stay stable and
/// follow insertion order.
pub struct Graph {
    inner: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<CanonicalId, NodeIndex>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Register a node. Fails if its canonical id is already taken or could
    /// be mistaken for an alias.
    pub fn add_node(&mut self, node: GraphNode) -> Result<()> {
        if node.canonical_id().as_str().contains(ALIAS_SEPARATOR) {
            return Err(StrataError::ReservedSeparator(node.canonical_id().clone()));
        }
        if self.index.contains_key(node.canonical_id()) {
            return Err(StrataError::DuplicateNode(node.canonical_id().clone()));
        }
        let id = node.canonical_id().clone();
        let idx = self.inner.add_node(node);
        self.index.insert(id, idx);
        Ok(())
    }

    /// Add `source -> target`. Returns `false` if the edge already existed.
    pub fn add_edge(
        &mut self,
        source: impl Into<CanonicalId>,
        target: impl Into<CanonicalId>,
    ) -> Result<bool> {
        let edge = GraphEdge::new(source, target);
        if edge.source == edge.target {
            return Err(StrataError::SelfLoop(edge.source));
        }
        let s = self.index_of(&edge.source)?;
        let t = self.index_of(&edge.target)?;
        if self.inner.find_edge(s, t).is_some() {
            tracing::debug!("Ignoring repeated edge {}", edge);
            return Ok(false);
        }
        self.inner.add_edge(s, t, edge);
        Ok(true)
    }

    pub fn contains(&self, id: &CanonicalId) -> bool {
        self.index.contains_key(id)
    }

    /// Get a node by canonical id.
    pub fn node(&self, id: &CanonicalId) -> Option<&GraphNode> {
        self.index.get(id).and_then(|&idx| self.inner.node_weight(idx))
    }

    /// Get a mutable node by canonical id.
    pub fn node_mut(&mut self, id: &CanonicalId) -> Option<&mut GraphNode> {
        let idx = *self.index.get(id)?;
        self.inner.node_weight_mut(idx)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Iterate over all nodes in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner.node_weights()
    }

    /// Canonical ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &CanonicalId> {
        self.inner.node_weights().map(|n| n.canonical_id())
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.inner.edge_weights()
    }

    /// Downstream dependents of `id`, in edge insertion order.
    pub fn successors(&self, id: &CanonicalId) -> Vec<&CanonicalId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Upstream parents of `id`, in edge insertion order.
    pub fn predecessors(&self, id: &CanonicalId) -> Vec<&CanonicalId> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn in_degree(&self, id: &CanonicalId) -> usize {
        self.index
            .get(id)
            .map_or(0, |&idx| self.inner.edges_directed(idx, Direction::Incoming).count())
    }

    /// `{current_name: [current names of successors]}`, rebuilt on every call.
    pub fn successor_view(&self) -> AdjacencyView {
        self.adjacency_view(Direction::Outgoing)
    }

    /// `{current_name: [current names of predecessors]}`, rebuilt on every call.
    pub fn predecessor_view(&self) -> AdjacencyView {
        self.adjacency_view(Direction::Incoming)
    }

    pub(crate) fn index_of(&self, id: &CanonicalId) -> Result<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StrataError::UnknownNode(id.clone()))
    }

    pub(crate) fn inner(&self) -> &DiGraph<GraphNode, GraphEdge> {
        &self.inner
    }

    fn neighbors(&self, id: &CanonicalId, dir: Direction) -> Vec<&CanonicalId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency newest-first; edge indices give insertion order.
        let mut edges: Vec<EdgeIndex> = self
            .inner
            .edges_directed(idx, dir)
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        edges
            .into_iter()
            .filter_map(|e| self.inner.edge_weight(e))
            .map(|e| match dir {
                Direction::Outgoing => &e.target,
                Direction::Incoming => &e.source,
            })
            .collect()
    }

    /// Nodes sharing a display name collapse onto one key; the later node in
    /// insertion order wins.
    fn adjacency_view(&self, dir: Direction) -> AdjacencyView {
        let mut view = AdjacencyView::new();
        for node in self.all_nodes() {
            let names = self
                .neighbors(node.canonical_id(), dir)
                .into_iter()
                .filter_map(|id| self.node(id))
                .map(|n| n.display_name().to_string())
                .collect();
            if view.insert(node.display_name().to_string(), names).is_some() {
                tracing::warn!(
                    "Display name {} is shared by several nodes; adjacency view keeps {}",
                    node.display_name(),
                    node.canonical_id()
                );
            }
        }
        view
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
