//! Graph builders shared by the unit tests.

use crate::graph::{Graph, Node, NodeId};

pub fn person(id: NodeId) -> Node {
    Node::new(id, format!("p{}", id), 0.0, 0, 0)
}

pub fn graph_with(ids: impl IntoIterator<Item = NodeId>) -> Graph {
    let mut g = Graph::new();
    for id in ids {
        g.add_node(person(id)).unwrap();
    }
    g
}

/// 0 - 1 - ... - (n-1), unit weights.
pub fn make_chain(n: NodeId) -> Graph {
    let mut g = graph_with(0..n);
    for i in 0..n - 1 {
        g.add_edge(i, i + 1).unwrap();
    }
    g
}

/// `center` joined to leaves 1..=leaves.
pub fn make_star(center: NodeId, leaves: NodeId) -> Graph {
    let mut g = graph_with(std::iter::once(center).chain(1..=leaves));
    for i in 1..=leaves {
        g.add_edge(center, i).unwrap();
    }
    g
}

/// Ring 0 - 1 - ... - (n-1) - 0, unit weights.
pub fn make_cycle(n: NodeId) -> Graph {
    let mut g = graph_with(0..n);
    for i in 0..n {
        g.add_edge(i, (i + 1) % n).unwrap();
    }
    g
}

/// Four people with edges 1-2, 1-3, 2-4, 3-4, auto-weighted from features.
pub fn make_diamond() -> Graph {
    let mut g = Graph::new();
    g.add_node(Node::new(1, "Ali", 8.5, 120, 15)).unwrap();
    g.add_node(Node::new(2, "Ayse", 7.2, 95, 12)).unwrap();
    g.add_node(Node::new(3, "Mehmet", 9.0, 150, 18)).unwrap();
    g.add_node(Node::new(4, "Fatma", 6.8, 80, 10)).unwrap();
    g.add_edge(1, 2).unwrap();
    g.add_edge(1, 3).unwrap();
    g.add_edge(2, 4).unwrap();
    g.add_edge(3, 4).unwrap();
    g
}

/// Explicitly weighted graph from `(from, to, weight)` triples.
pub fn make_weighted(edges: &[(NodeId, NodeId, f64)]) -> Graph {
    let mut g = Graph::new();
    for &(from, to, weight) in edges {
        for id in [from, to] {
            if !g.contains(id) {
                g.add_node(person(id)).unwrap();
            }
        }
        g.add_weighted_edge(from, to, weight).unwrap();
    }
    g
}
