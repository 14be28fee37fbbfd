use crate::error::Result;
use crate::graph::{Graph, NodeId};

/// Common entry point for every algorithm run against a [`Graph`].
///
/// `execute` returns the order in which the algorithm visited (or colored,
/// or ranked) nodes. Whole-graph algorithms ignore `start`. Algorithms that
/// keep results replace them on every run; querying before the first run
/// fails with [`GraphError::InvalidState`](crate::GraphError::InvalidState).
pub trait GraphAlgorithm {
    fn name(&self) -> &'static str;

    fn execute(&mut self, graph: &Graph, start: NodeId) -> Result<Vec<NodeId>>;
}

/// Algorithms that expose an accumulated cost per node after a run.
pub trait DistanceQuery {
    /// Cost from the start node; `f64::INFINITY` when unreachable.
    fn distance(&self, id: NodeId) -> Result<f64>;
}

/// Algorithms that can reconstruct a path from the start node after a run.
pub trait PathQuery {
    /// Node ids from start to `target` inclusive. Empty when unreachable,
    /// a single element when `target` is the start.
    fn shortest_path(&self, target: NodeId) -> Result<Vec<NodeId>>;
}
