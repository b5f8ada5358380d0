//! Graph fixtures for tests

use crate::graph::Graph;
use crate::model::GraphNode;

/// Graph with the given nodes (id == initial name) and edges.
pub fn graph_with(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for id in nodes {
        graph.add_node(GraphNode::new(*id, *id).unwrap()).unwrap();
    }
    for (source, target) in edges {
        graph.add_edge(*source, *target).unwrap();
    }
    graph
}

/// `n[0] -> n[1] -> … -> n[k]`
pub fn chain(nodes: &[&str]) -> Graph {
    let edges: Vec<(&str, &str)> = nodes.windows(2).map(|w| (w[0], w[1])).collect();
    graph_with(nodes, &edges)
}

/// `A0 <-> B0`
pub fn two_cycle() -> Graph {
    graph_with(&["A0", "B0"], &[("A0", "B0"), ("B0", "A0")])
}

/// `A0 -> {B0, C0} -> D0`
pub fn diamond() -> Graph {
    graph_with(
        &["A0", "B0", "C0", "D0"],
        &[("A0", "B0"), ("A0", "C0"), ("B0", "D0"), ("C0", "D0")],
    )
}

/// `R0 -> S0` plus a cycle `X0 <-> Y0` unreachable from the root.
pub fn rooted_with_detached_cycle() -> Graph {
    graph_with(
        &["R0", "S0", "X0", "Y0"],
        &[("R0", "S0"), ("X0", "Y0"), ("Y0", "X0")],
    )
}

/// `A0 -> B0 -> C0 -> D0 -> B0`: a cycle hanging off a root.
pub fn tail_cycle() -> Graph {
    graph_with(
        &["A0", "B0", "C0", "D0"],
        &[("A0", "B0"), ("B0", "C0"), ("C0", "D0"), ("D0", "B0")],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        assert_eq!(chain(&["A0", "B0", "C0"]).edge_count(), 2);
        assert_eq!(two_cycle().edge_count(), 2);
        assert_eq!(diamond().node_count(), 4);
        assert_eq!(rooted_with_detached_cycle().edge_count(), 3);
        assert_eq!(tail_cycle().edge_count(), 4);
    }
}
