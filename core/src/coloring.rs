use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::algorithm::GraphAlgorithm;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId};

/// Color assignment produced by one Welsh-Powell run.
#[derive(Debug, Clone, Default)]
struct Coloring {
    colors: HashMap<NodeId, u32>,
    order: Vec<NodeId>,
    chromatic_number: u32,
}

/// Greedy Welsh-Powell vertex coloring.
///
/// Nodes are colored in descending degree order (stable, so equal degrees
/// keep graph insertion order), each taking the smallest positive color not
/// already used by a neighbor. The color count is an upper bound on the
/// chromatic number, not the minimum.
#[derive(Debug, Default, Clone)]
pub struct WelshPowell {
    result: Option<Coloring>,
}

impl WelshPowell {
    pub fn new() -> Self {
        Self::default()
    }

    fn result(&self, query: &'static str) -> Result<&Coloring> {
        self.result.as_ref().ok_or(GraphError::InvalidState(query))
    }

    pub fn node_color(&self, id: NodeId) -> Result<u32> {
        self.result("node_color")?
            .colors
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn all_colors(&self) -> Result<&HashMap<NodeId, u32>> {
        Ok(&self.result("all_colors")?.colors)
    }

    /// Number of distinct colors used; 0 for an empty graph.
    pub fn chromatic_number(&self) -> Result<u32> {
        Ok(self.result("chromatic_number")?.chromatic_number)
    }

    /// Nodes bucketed by color, each bucket in coloring order.
    pub fn color_groups(&self) -> Result<BTreeMap<u32, Vec<NodeId>>> {
        let coloring = self.result("color_groups")?;
        let mut groups: BTreeMap<u32, Vec<NodeId>> = BTreeMap::new();
        for id in &coloring.order {
            groups.entry(coloring.colors[id]).or_default().push(*id);
        }
        Ok(groups)
    }
}

impl GraphAlgorithm for WelshPowell {
    fn name(&self) -> &'static str {
        "Welsh-Powell Graph Coloring"
    }

    /// Colors every node; returns the coloring order. `start` is ignored.
    fn execute(&mut self, graph: &Graph, _start: NodeId) -> Result<Vec<NodeId>> {
        let mut by_degree: Vec<_> = graph.nodes().iter().collect();
        by_degree.sort_by(|a, b| b.degree().cmp(&a.degree()));

        let mut coloring = Coloring::default();
        for node in by_degree {
            let taken: HashSet<u32> = node
                .neighbors()
                .iter()
                .filter_map(|n| coloring.colors.get(n).copied())
                .collect();

            let color = (1..).find(|c| !taken.contains(c)).unwrap_or(1);
            coloring.colors.insert(node.id, color);
            coloring.order.push(node.id);
            coloring.chromatic_number = coloring.chromatic_number.max(color);
        }

        debug!(
            nodes = coloring.order.len(),
            colors = coloring.chromatic_number,
            "welsh-powell complete"
        );
        let order = coloring.order.clone();
        self.result = Some(coloring);
        Ok(order)
    }
}
