use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::weight::edge_weight;

/// Caller-assigned node identifier, unique within a graph.
pub type NodeId = u64;

/// A person in the social network.
///
/// The three feature scalars only feed the edge weight and the A* heuristic.
/// Coordinates default to the origin, which counts as "no position".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub activity: f64,
    pub interaction_count: i64,
    pub connection_count: i64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Neighbor ids in insertion order, maintained by the owning graph.
    #[serde(default, skip_deserializing)]
    neighbors: Vec<NodeId>,
}

impl Node {
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        activity: f64,
        interaction_count: i64,
        connection_count: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            activity,
            interaction_count,
            connection_count,
            x: 0.0,
            y: 0.0,
            neighbors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// True when the node carries coordinates other than the default origin.
    pub fn has_position(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }

    /// Euclidean distance between the two nodes' coordinates.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    fn link(&mut self, other: NodeId) {
        if !self.neighbors.contains(&other) {
            self.neighbors.push(other);
        }
    }

    fn unlink(&mut self, other: NodeId) {
        self.neighbors.retain(|&n| n != other);
    }
}

/// One directed edge record. An undirected connection is stored as two
/// records, one per direction, carrying the same weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from_id: NodeId,
    pub to_id: NodeId,
    pub weight: f64,
    pub is_directed: bool,
}

/// Summary returned by [`Graph::statistics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    pub node_count: usize,
    /// Undirected edge count: total edge records / 2.
    pub edge_count: usize,
    pub density: f64,
    pub average_degree: f64,
}

/// In-memory social graph: insertion-ordered node arena, edge list and an
/// adjacency index of outgoing edge records keyed by node id.
///
/// Invariants: ids are unique, edges only join existing nodes, no self-loops,
/// every undirected record has its mirrored record with equal weight, and
/// `adjacency[id]` holds exactly the records whose `from_id == id`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count * 2),
            adjacency: HashMap::with_capacity(node_count),
        }
    }

    /// Append a node. Any neighbor list carried by `node` is discarded; the
    /// graph alone maintains neighbor sets.
    pub fn add_node(&mut self, mut node: Node) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        node.neighbors.clear();

        trace!(node_id = node.id, name = %node.name, "add node");
        self.index.insert(node.id, self.nodes.len());
        self.adjacency.insert(node.id, Vec::new());
        self.nodes.push(node);
        Ok(())
    }

    /// Undirected edge with the weight derived from both endpoints' features.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.insert_edge(from, to, None, false)
    }

    /// Undirected edge with an explicit weight.
    pub fn add_weighted_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<()> {
        self.insert_edge(from, to, Some(weight), false)
    }

    /// General edge insertion.
    ///
    /// `weight = None` derives the weight via [`edge_weight`]. Weights are
    /// expected to be non-negative. Re-inserting an existing `(from, to)` pair
    /// updates that record in place rather than adding a parallel edge.
    /// Validation happens before any mutation.
    pub fn insert_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: Option<f64>,
        directed: bool,
    ) -> Result<()> {
        let from_idx = *self.index.get(&from).ok_or(GraphError::UnknownNode(from))?;
        let to_idx = *self.index.get(&to).ok_or(GraphError::UnknownNode(to))?;
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }

        let weight =
            weight.unwrap_or_else(|| edge_weight(&self.nodes[from_idx], &self.nodes[to_idx]));

        // An undirected pair re-inserted as directed loses its mirror record,
        // and `to` stops listing `from` as a neighbor.
        let replaces_undirected = directed
            && self.edges_of(from).iter().any(|e| e.to_id == to && !e.is_directed);
        if replaces_undirected {
            self.drop_record(to, from);
            self.nodes[to_idx].unlink(from);
        }

        trace!(from, to, weight, directed, "add edge");
        self.upsert_record(Edge { from_id: from, to_id: to, weight, is_directed: directed });
        self.nodes[from_idx].link(to);

        if !directed {
            self.upsert_record(Edge { from_id: to, to_id: from, weight, is_directed: false });
            self.nodes[to_idx].link(from);
        }
        Ok(())
    }

    fn upsert_record(&mut self, edge: Edge) {
        let outgoing = self.adjacency.entry(edge.from_id).or_default();
        match outgoing.iter_mut().find(|e| e.to_id == edge.to_id) {
            Some(existing) => {
                *existing = edge;
                if let Some(listed) = self
                    .edges
                    .iter_mut()
                    .find(|e| e.from_id == edge.from_id && e.to_id == edge.to_id)
                {
                    *listed = edge;
                }
            }
            None => {
                outgoing.push(edge);
                self.edges.push(edge);
            }
        }
    }

    fn drop_record(&mut self, from: NodeId, to: NodeId) {
        self.edges.retain(|e| !(e.from_id == from && e.to_id == to));
        if let Some(outgoing) = self.adjacency.get_mut(&from) {
            outgoing.retain(|e| e.to_id != to);
        }
    }

    /// Remove a node together with every edge touching it, and purge it from
    /// all neighbor sets. Returns false if the id was not present.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(position) = self.index.remove(&id) else {
            return false;
        };

        self.edges.retain(|e| e.from_id != id && e.to_id != id);
        self.adjacency.remove(&id);
        for outgoing in self.adjacency.values_mut() {
            outgoing.retain(|e| e.to_id != id);
        }

        self.nodes.remove(position);
        for node in &mut self.nodes {
            node.unlink(id);
        }
        for (i, node) in self.nodes.iter().enumerate().skip(position) {
            self.index.insert(node.id, i);
        }

        trace!(node_id = id, "remove node");
        true
    }

    /// Remove the connection between two nodes in both directions.
    /// Returns false if neither direction existed.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let (Some(&from_idx), Some(&to_idx)) = (self.index.get(&from), self.index.get(&to)) else {
            return false;
        };

        let before = self.edges.len();
        self.edges.retain(|e| {
            !((e.from_id == from && e.to_id == to) || (e.from_id == to && e.to_id == from))
        });
        if self.edges.len() == before {
            return false;
        }

        if let Some(outgoing) = self.adjacency.get_mut(&from) {
            outgoing.retain(|e| e.to_id != to);
        }
        if let Some(outgoing) = self.adjacency.get_mut(&to) {
            outgoing.retain(|e| e.to_id != from);
        }
        self.nodes[from_idx].unlink(to);
        self.nodes[to_idx].unlink(from);

        trace!(from, to, "remove edge");
        true
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Outgoing edge records of a node; empty when the id is unknown.
    pub fn edges_of(&self, id: NodeId) -> &[Edge] {
        self.adjacency.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Neighbor ids of a node in insertion order; empty when the id is unknown.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.neighbors()).unwrap_or(&[])
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    pub fn edge_exists(&self, from: NodeId, to: NodeId) -> bool {
        self.edges_of(from).iter().any(|e| e.to_id == to)
    }

    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.edges_of(from).iter().find(|e| e.to_id == to).map(|e| e.weight)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every edge record, both directions of undirected edges included.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// One record per connection: directed records as stored, undirected
    /// pairs reduced to the record with `from_id < to_id`.
    pub fn undirected_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.is_directed || e.from_id < e.to_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_record_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
        self.adjacency.clear();
    }

    /// `E / (V·(V-1)/2)` with `E = records / 2`; 0 for fewer than two nodes.
    pub fn density(&self) -> f64 {
        let v = self.nodes.len();
        if v <= 1 {
            return 0.0;
        }
        let max_edges = (v as f64) * (v as f64 - 1.0) / 2.0;
        (self.edges.len() / 2) as f64 / max_edges
    }

    pub fn statistics(&self) -> GraphStats {
        let node_count = self.nodes.len();
        let average_degree = if node_count == 0 {
            0.0
        } else {
            self.nodes.iter().map(|n| n.degree()).sum::<usize>() as f64 / node_count as f64
        };

        GraphStats {
            node_count,
            edge_count: self.edges.len() / 2,
            density: self.density(),
            average_degree,
        }
    }
}
