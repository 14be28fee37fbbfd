use crate::graph::Node;

/// Edge weight derived from the feature vectors of both endpoints.
///
/// `1 / (1 + Δactivity² + Δinteraction² + Δconnection²)`: symmetric, always
/// in `(0, 1]`, and exactly 1 only when all three features match.
pub fn edge_weight(a: &Node, b: &Node) -> f64 {
    let activity = a.activity - b.activity;
    let interaction = (a.interaction_count - b.interaction_count) as f64;
    let connection = (a.connection_count - b.connection_count) as f64;

    1.0 / (1.0 + activity * activity + interaction * interaction + connection * connection)
}
