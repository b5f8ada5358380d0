//! Breadth-first layering that duplicates a node each time an edge reaches it

use super::{AliasMinter, ForcedPlacement, Layering, LayeringStrategy};
use crate::error::Result;
use crate::graph::Graph;
use crate::model::{CanonicalId, GraphEdge};
use crate::random::RandomSource;
use std::collections::HashSet;

/// Reachability/duplication traversal.
///
/// Layer 0 holds every root. Each following layer holds one fresh alias per
/// edge leaving the previous layer that has not been consumed yet. Because an
/// edge is consumed at most once, the walk terminates on cyclic input.
///
/// When there is no root, a random node is forced to be one and its incoming
/// edges are dropped for this run. When the frontier dies out while some node
/// has never been reached, the lowest such canonical id is forced the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateLayering;

impl LayeringStrategy for DuplicateLayering {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn produce_layers(&self, graph: &Graph, rng: &mut RandomSource) -> Result<Layering> {
        let mut walk = Walk::new(graph);
        if graph.is_empty() {
            return Ok(walk.layering);
        }

        let mut roots: Vec<&CanonicalId> = graph
            .node_ids()
            .filter(|id| graph.in_degree(id) == 0)
            .collect();
        if roots.is_empty() {
            let ids: Vec<&CanonicalId> = graph.node_ids().collect();
            if let Some(i) = rng.pick(ids.len()) {
                walk.force_root(ids[i]);
                roots.push(ids[i]);
            }
        }

        let mut frontier: Vec<_> = roots.into_iter().map(|id| walk.minter.mint(id)).collect();
        loop {
            tracing::debug!("Layer {}: {} aliases", walk.layering.len(), frontier.len());
            walk.layering.layers.push(frontier.clone());

            let mut next = Vec::new();
            for alias in &frontier {
                for child in graph.successors(&alias.canonical) {
                    let edge = GraphEdge::new(alias.canonical.clone(), child.clone());
                    if walk.dropped.contains(&edge) || !walk.processed.insert(edge.clone()) {
                        continue;
                    }
                    walk.layering.processed_edges.push(edge);
                    next.push(walk.minter.mint(child));
                }
            }

            if next.is_empty() {
                let unreached = graph
                    .node_ids()
                    .filter(|id| !walk.minter.seen(id))
                    .min();
                match unreached {
                    Some(id) => {
                        walk.force_root(id);
                        next.push(walk.minter.mint(id));
                    }
                    None => break,
                }
            }
            frontier = next;
        }

        tracing::debug!(
            "Duplicate layering: {} layers, {} edges processed, {} dropped",
            walk.layering.len(),
            walk.layering.processed_edges.len(),
            walk.layering.dropped_edges.len()
        );
        Ok(walk.layering)
    }
}

struct Walk<'g> {
    graph: &'g Graph,
    layering: Layering,
    minter: AliasMinter,
    processed: HashSet<GraphEdge>,
    dropped: HashSet<GraphEdge>,
}

impl<'g> Walk<'g> {
    fn new(graph: &'g Graph) -> Self {
        Walk {
            graph,
            layering: Layering::default(),
            minter: AliasMinter::default(),
            processed: HashSet::new(),
            dropped: HashSet::new(),
        }
    }

    /// Treat `id` as a root: its not-yet-consumed incoming edges are dropped.
    fn force_root(&mut self, id: &CanonicalId) {
        tracing::debug!("Forcing {} as a root", id);
        for parent in self.graph.predecessors(id) {
            let edge = GraphEdge::new(parent.clone(), id.clone());
            if !self.processed.contains(&edge) && self.dropped.insert(edge.clone()) {
                self.layering.dropped_edges.push(edge);
            }
        }
        self.layering.forced.push(ForcedPlacement::Root(id.clone()));
    }
}
