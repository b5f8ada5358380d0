//! In-degree driven (Kahn-style) layering with forced cycle breaks

use super::{AliasMinter, ForcedPlacement, Layering, LayeringStrategy};
use crate::error::{Result, StrataError};
use crate::graph::Graph;
use crate::model::{CanonicalId, GraphEdge};
use crate::random::RandomSource;
use std::collections::{HashMap, HashSet, VecDeque};

/// Topological traversal over remaining in-degrees.
///
/// A node joins the layer after the one of the predecessor whose edge brought
/// its in-degree to zero. When the queue drains while nodes still wait on
/// unresolved edges, the lowest canonical id among them is forced free and
/// starts a new trailing layer. Each node is placed exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct KahnLayering;

impl LayeringStrategy for KahnLayering {
    fn name(&self) -> &'static str {
        "kahn"
    }

    fn produce_layers(&self, graph: &Graph, _rng: &mut RandomSource) -> Result<Layering> {
        let mut state = KahnState::new(graph);
        if graph.is_empty() {
            return Ok(state.layering);
        }

        let roots: Vec<&CanonicalId> = graph
            .node_ids()
            .filter(|id| state.in_degree.get(*id).copied() == Some(0))
            .collect();
        for id in roots {
            state.place(id, 0);
        }

        loop {
            state.drain()?;
            match state.next_break_candidate() {
                Some(id) => state.force_break(&id)?,
                None => break,
            }
        }

        tracing::debug!(
            "Kahn layering: {} layers, {} forced breaks",
            state.layering.len(),
            state.layering.forced_breaks().count()
        );
        Ok(state.layering)
    }
}

struct KahnState<'g> {
    graph: &'g Graph,
    in_degree: HashMap<CanonicalId, usize>,
    placed: HashSet<CanonicalId>,
    queue: VecDeque<(CanonicalId, usize)>,
    minter: AliasMinter,
    layering: Layering,
}

impl<'g> KahnState<'g> {
    fn new(graph: &'g Graph) -> Self {
        let in_degree = graph
            .node_ids()
            .map(|id| (id.clone(), graph.in_degree(id)))
            .collect();
        KahnState {
            graph,
            in_degree,
            placed: HashSet::new(),
            queue: VecDeque::new(),
            minter: AliasMinter::default(),
            layering: Layering::default(),
        }
    }

    fn place(&mut self, id: &CanonicalId, depth: usize) {
        let alias = self.minter.mint(id);
        self.layering.place(depth, alias);
        self.placed.insert(id.clone());
        self.queue.push_back((id.clone(), depth));
    }

    /// Process the queue until it is empty.
    fn drain(&mut self) -> Result<()> {
        let graph = self.graph;
        while let Some((id, depth)) = self.queue.pop_front() {
            for child in graph.successors(&id) {
                let edge = GraphEdge::new(id.clone(), child.clone());
                if self.placed.contains(child) {
                    // Target was forced free before this edge resolved.
                    self.layering.dropped_edges.push(edge);
                    continue;
                }
                let remaining = self.in_degree.get_mut(child).ok_or_else(|| {
                    StrataError::Consistency(format!("no in-degree counter for {child}"))
                })?;
                *remaining = remaining.checked_sub(1).ok_or_else(|| {
                    StrataError::Consistency(format!("in-degree of {child} dropped below zero"))
                })?;
                self.layering.processed_edges.push(edge);
                if *remaining == 0 {
                    self.place(child, depth + 1);
                }
            }
        }
        Ok(())
    }

    /// Lowest canonical id still waiting on unresolved edges.
    fn next_break_candidate(&self) -> Option<CanonicalId> {
        self.in_degree
            .iter()
            .filter(|(id, deg)| **deg > 0 && !self.placed.contains(*id))
            .map(|(id, _)| id)
            .min()
            .cloned()
    }

    /// Zero the in-degree of `id` and start a new trailing layer with it.
    fn force_break(&mut self, id: &CanonicalId) -> Result<()> {
        let remaining = self
            .in_degree
            .get_mut(id)
            .ok_or_else(|| StrataError::UnknownNode(id.clone()))?;
        if *remaining == 0 || self.placed.contains(id) {
            return Err(StrataError::Consistency(format!(
                "forced cycle break on {id}, which has no unresolved dependencies"
            )));
        }
        tracing::debug!("Forcing cycle break at {} ({} edges unresolved)", id, remaining);
        *remaining = 0;
        let depth = self.layering.len();
        self.layering
            .forced
            .push(ForcedPlacement::CycleBreak(id.clone()));
        self.place(id, depth);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn layers(graph: &Graph) -> Layering {
        KahnLayering
            .produce_layers(graph, &mut RandomSource::seeded(0))
            .unwrap()
    }

    #[test]
    fn test_chain() {
        let layering = layers(&chain(&["A0", "B0", "C0"]));
        assert_eq!(layering.layer_report(), vec![vec!["A0"], vec!["B0"], vec!["C0"]]);
        assert_eq!(layering.forced_breaks().count(), 0);
    }

    #[test]
    fn test_diamond_places_join_once() {
        let layering = layers(&diamond());
        assert_eq!(
            layering.layer_report(),
            vec![vec!["A0"], vec!["B0", "C0"], vec!["D0"]]
        );
    }

    #[test]
    fn test_two_cycle_forces_break() {
        let layering = layers(&two_cycle());
        let breaks: Vec<_> = layering.forced_breaks().collect();
        assert_eq!(breaks, vec![&CanonicalId::from("A0")]);
        assert_eq!(layering.layer_report(), vec![vec!["A0"], vec!["B0"]]);
        assert_eq!(layering.processed_edges, vec![GraphEdge::new("A0", "B0")]);
        assert_eq!(layering.dropped_edges, vec![GraphEdge::new("B0", "A0")]);
    }

    #[test]
    fn test_cycle_after_root_gets_trailing_layer() {
        let layering = layers(&rooted_with_detached_cycle());
        // R0 -> S0 resolve first; X0 <-> Y0 is broken at X0 in a new layer.
        assert_eq!(
            layering.layer_report(),
            vec![vec!["R0"], vec!["S0"], vec!["X0"], vec!["Y0"]]
        );
    }

    #[test]
    fn test_force_break_on_resolved_node_is_inconsistent() {
        let graph = chain(&["A0", "B0"]);
        let mut state = KahnState::new(&graph);
        let err = state.force_break(&CanonicalId::from("A0")).unwrap_err();
        assert!(matches!(err, StrataError::Consistency(_)));
    }

    #[test]
    fn test_empty_graph() {
        assert!(layers(&Graph::new()).is_empty());
    }
}
