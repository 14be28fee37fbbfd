use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::algorithm::GraphAlgorithm;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId};

/// Breadth-first traversal over neighbor sets, FIFO frontier.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bfs;

/// Depth-first traversal over neighbor sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dfs;

impl Bfs {
    pub fn new() -> Self {
        Self
    }
}

impl Dfs {
    pub fn new() -> Self {
        Self
    }
}

impl GraphAlgorithm for Bfs {
    fn name(&self) -> &'static str {
        "Breadth-First Search (BFS)"
    }

    /// Visit order from `start`. Neighbors are expanded in their stored
    /// insertion order and every node is visited at most once.
    fn execute(&mut self, graph: &Graph, start: NodeId) -> Result<Vec<NodeId>> {
        let order: Vec<NodeId> = bfs_walk(graph, start)?.into_iter().map(|(id, _)| id).collect();
        debug!(start, visited = order.len(), "bfs complete");
        Ok(order)
    }
}

impl GraphAlgorithm for Dfs {
    fn name(&self) -> &'static str {
        "Depth-First Search (DFS)"
    }

    /// Visit order from `start`, identical to the recursive formulation but
    /// driven by an explicit stack of `(node, next neighbor position)` so deep
    /// chains cannot overflow the call stack.
    fn execute(&mut self, graph: &Graph, start: NodeId) -> Result<Vec<NodeId>> {
        if !graph.contains(start) {
            return Err(GraphError::UnknownNode(start));
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = Vec::new();

        visited.insert(start);
        order.push(start);
        stack.push((start, 0));

        while let Some((current, cursor)) = stack.last_mut() {
            let neighbors = graph.neighbors(*current);
            match neighbors[*cursor..].iter().position(|n| !visited.contains(n)) {
                Some(offset) => {
                    let next = neighbors[*cursor + offset];
                    *cursor += offset + 1;
                    visited.insert(next);
                    order.push(next);
                    stack.push((next, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!(start, visited = order.len(), "dfs complete");
        Ok(order)
    }
}

/// Hop depth of every node reachable from `start` (start itself at 0).
pub fn bfs_levels(graph: &Graph, start: NodeId) -> Result<HashMap<NodeId, u32>> {
    Ok(bfs_walk(graph, start)?.into_iter().collect())
}

/// BFS from `start` returning `(node, depth)` in dequeue order.
///
/// Nodes are marked when enqueued, so each one appears exactly once at its
/// minimum hop distance.
pub(crate) fn bfs_walk(graph: &Graph, start: NodeId) -> Result<Vec<(NodeId, u32)>> {
    if !graph.contains(start) {
        return Err(GraphError::UnknownNode(start));
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<(NodeId, u32)> = VecDeque::new();
    let mut order = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        order.push((current, depth));
        for &neighbor in graph.neighbors(current) {
            if visited.insert(neighbor) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    Ok(order)
}
