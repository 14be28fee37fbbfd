use crate::error::Result;
use crate::graph::{Graph, Node};

/// The eight-person sample network used by the demo driver: ids 1..=8 and
/// eleven undirected, auto-weighted friendships.
pub fn sample_graph() -> Result<Graph> {
    let people = [
        (1, "Ali", 8.5, 120, 15),
        (2, "Ayse", 7.2, 95, 12),
        (3, "Mehmet", 9.0, 150, 18),
        (4, "Fatma", 6.8, 80, 10),
        (5, "Ahmet", 7.5, 110, 14),
        (6, "Zeynep", 8.2, 130, 16),
        (7, "Mustafa", 6.5, 75, 9),
        (8, "Elif", 9.5, 160, 20),
    ];
    let friendships = [
        (1, 2),
        (1, 3),
        (2, 4),
        (2, 5),
        (3, 4),
        (3, 6),
        (4, 7),
        (5, 6),
        (5, 8),
        (6, 8),
        (7, 8),
    ];

    let mut graph = Graph::with_capacity(people.len(), friendships.len());
    for (id, name, activity, interactions, connections) in people {
        graph.add_node(Node::new(id, name, activity, interactions, connections))?;
    }
    for (from, to) in friendships {
        graph.add_edge(from, to)?;
    }
    Ok(graph)
}
