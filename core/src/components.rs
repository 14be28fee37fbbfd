use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::algorithm::GraphAlgorithm;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId};

#[derive(Debug, Clone, Default)]
struct Partition {
    components: Vec<Vec<NodeId>>,
    component_of: HashMap<NodeId, usize>,
}

/// Partition of the graph into connected components (disjoint communities).
///
/// Components are discovered by BFS from each not-yet-assigned node in graph
/// insertion order, so component 0 always contains the first node.
#[derive(Debug, Default, Clone)]
pub struct ConnectedComponents {
    partition: Option<Partition>,
}

impl ConnectedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, query: &'static str) -> Result<&Partition> {
        self.partition.as_ref().ok_or(GraphError::InvalidState(query))
    }

    pub fn component_count(&self) -> Result<usize> {
        Ok(self.partition("component_count")?.components.len())
    }

    /// True iff the last run found exactly one component.
    pub fn is_graph_connected(&self) -> Result<bool> {
        Ok(self.partition("is_graph_connected")?.components.len() == 1)
    }

    /// Index of the component holding `id`.
    pub fn component_id(&self, id: NodeId) -> Result<usize> {
        self.partition("component_id")?
            .component_of
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Members of component `index` in BFS order; `None` when out of range.
    pub fn component(&self, index: usize) -> Result<Option<&[NodeId]>> {
        Ok(self
            .partition("component")?
            .components
            .get(index)
            .map(|c| c.as_slice()))
    }

    pub fn all_components(&self) -> Result<&[Vec<NodeId>]> {
        Ok(&self.partition("all_components")?.components)
    }

    /// Largest component; the earliest discovered wins ties. Empty for an
    /// empty graph.
    pub fn largest_component(&self) -> Result<&[NodeId]> {
        let partition = self.partition("largest_component")?;
        let mut largest: &[NodeId] = &[];
        for component in &partition.components {
            if component.len() > largest.len() {
                largest = component.as_slice();
            }
        }
        Ok(largest)
    }

    /// Whether both nodes fell in the same component. Unknown ids are never
    /// connected.
    pub fn are_connected(&self, a: NodeId, b: NodeId) -> Result<bool> {
        let partition = self.partition("are_connected")?;
        Ok(match (partition.component_of.get(&a), partition.component_of.get(&b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        })
    }
}

impl GraphAlgorithm for ConnectedComponents {
    fn name(&self) -> &'static str {
        "Connected Components (Disjoint Communities)"
    }

    /// Returns every node in discovery order, component by component.
    /// `start` is ignored.
    fn execute(&mut self, graph: &Graph, _start: NodeId) -> Result<Vec<NodeId>> {
        let mut partition = Partition::default();
        let mut order = Vec::with_capacity(graph.node_count());

        for node in graph.nodes() {
            if partition.component_of.contains_key(&node.id) {
                continue;
            }
            let index = partition.components.len();
            let mut members = Vec::new();
            let mut queue: VecDeque<NodeId> = VecDeque::new();

            // Assignment doubles as the visited set, so a node reachable from
            // two seeds (possible with directed edges) stays in the first one.
            partition.component_of.insert(node.id, index);
            queue.push_back(node.id);
            while let Some(current) = queue.pop_front() {
                members.push(current);
                for &neighbor in graph.neighbors(current) {
                    if !partition.component_of.contains_key(&neighbor) {
                        partition.component_of.insert(neighbor, index);
                        queue.push_back(neighbor);
                    }
                }
            }

            order.extend_from_slice(&members);
            partition.components.push(members);
        }

        debug!(
            nodes = order.len(),
            components = partition.components.len(),
            "connected components complete"
        );
        self.partition = Some(partition);
        Ok(order)
    }
}
