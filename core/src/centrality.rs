use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::algorithm::GraphAlgorithm;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId};

/// One row of a centrality ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralityEntry {
    pub node_id: NodeId,
    pub centrality: f64,
    pub degree: usize,
}

#[derive(Debug, Clone, Default)]
struct Ranking {
    entries: Vec<CentralityEntry>,
    position: HashMap<NodeId, usize>,
}

/// Degree centrality: `degree / (V - 1)`, identifying the most connected
/// people in the network.
#[derive(Debug, Default, Clone)]
pub struct DegreeCentrality {
    ranking: Option<Ranking>,
}

impl DegreeCentrality {
    pub fn new() -> Self {
        Self::default()
    }

    fn ranking(&self, query: &'static str) -> Result<&Ranking> {
        self.ranking.as_ref().ok_or(GraphError::InvalidState(query))
    }

    fn entry(&self, query: &'static str, id: NodeId) -> Result<&CentralityEntry> {
        let ranking = self.ranking(query)?;
        ranking
            .position
            .get(&id)
            .map(|&i| &ranking.entries[i])
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn centrality(&self, id: NodeId) -> Result<f64> {
        Ok(self.entry("centrality", id)?.centrality)
    }

    pub fn degree(&self, id: NodeId) -> Result<usize> {
        Ok(self.entry("degree", id)?.degree)
    }

    /// Full ranking, highest centrality first.
    pub fn all_centralities(&self) -> Result<&[CentralityEntry]> {
        Ok(&self.ranking("all_centralities")?.entries)
    }

    /// Mean centrality; 0 for an empty graph.
    pub fn average_centrality(&self) -> Result<f64> {
        let entries = &self.ranking("average_centrality")?.entries;
        if entries.is_empty() {
            return Ok(0.0);
        }
        Ok(entries.iter().map(|e| e.centrality).sum::<f64>() / entries.len() as f64)
    }

    pub fn top_nodes(&self, k: usize) -> Result<Vec<CentralityEntry>> {
        Ok(self.ranking("top_nodes")?.entries.iter().take(k).copied().collect())
    }

    /// The `k` least central nodes, least central first; ties keep
    /// ascending id.
    pub fn bottom_nodes(&self, k: usize) -> Result<Vec<CentralityEntry>> {
        let mut entries = self.ranking("bottom_nodes")?.entries.clone();
        entries.sort_by(|a, b| {
            a.centrality
                .total_cmp(&b.centrality)
                .then(a.node_id.cmp(&b.node_id))
        });
        entries.truncate(k);
        Ok(entries)
    }
}

/// Same value as [`Graph::density`].
pub fn graph_density(graph: &Graph) -> f64 {
    graph.density()
}

impl GraphAlgorithm for DegreeCentrality {
    fn name(&self) -> &'static str {
        "Degree Centrality (Most Influential Users)"
    }

    /// Ranks every node; `start` is ignored.
    fn execute(&mut self, graph: &Graph, _start: NodeId) -> Result<Vec<NodeId>> {
        let v = graph.node_count();
        let mut entries: Vec<CentralityEntry> = graph
            .nodes()
            .iter()
            .map(|node| {
                let degree = node.degree();
                let centrality = if v > 1 {
                    degree as f64 / (v - 1) as f64
                } else {
                    0.0
                };
                CentralityEntry {
                    node_id: node.id,
                    centrality,
                    degree,
                }
            })
            .collect();

        // Centrality descending, then node_id ascending so ties are deterministic
        entries.sort_by(|a, b| {
            b.centrality
                .total_cmp(&a.centrality)
                .then(a.node_id.cmp(&b.node_id))
        });

        let position = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.node_id, i))
            .collect();
        let order: Vec<NodeId> = entries.iter().map(|e| e.node_id).collect();

        debug!(nodes = order.len(), "degree centrality complete");
        self.ranking = Some(Ranking { entries, position });
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{graph_with, make_chain, make_star};
    use crate::sample::sample_graph;

    #[test]
    fn test_degree_sum_is_twice_edge_count() {
        let g = sample_graph().unwrap();
        let mut dc = DegreeCentrality::new();
        dc.execute(&g, 0).unwrap();
        let sum: usize = dc.all_centralities().unwrap().iter().map(|e| e.degree).sum();
        assert_eq!(sum, 2 * g.statistics().edge_count);
    }

    #[test]
    fn test_centrality_in_unit_range() {
        let g = sample_graph().unwrap();
        let mut dc = DegreeCentrality::new();
        dc.execute(&g, 0).unwrap();
        for entry in dc.all_centralities().unwrap() {
            assert!((0.0..=1.0).contains(&entry.centrality), "{:?}", entry);
        }
    }

    #[test]
    fn test_star_hub_ranks_first() {
        let g = make_star(0, 4);
        let mut dc = DegreeCentrality::new();
        let order = dc.execute(&g, 0).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert_eq!(dc.centrality(0).unwrap(), 1.0);
        assert_eq!(dc.centrality(3).unwrap(), 0.25);
        assert_eq!(dc.degree(0).unwrap(), 4);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let mut g = graph_with([5, 3, 9, 1]);
        g.add_edge(9, 1).unwrap();
        let mut dc = DegreeCentrality::new();
        let order = dc.execute(&g, 0).unwrap();
        assert_eq!(order, vec![1, 9, 3, 5]);
    }

    #[test]
    fn test_top_and_bottom_nodes() {
        let g = make_chain(5);
        let mut dc = DegreeCentrality::new();
        dc.execute(&g, 0).unwrap();

        let top: Vec<NodeId> = dc.top_nodes(3).unwrap().iter().map(|e| e.node_id).collect();
        assert_eq!(top, vec![1, 2, 3]);
        let bottom: Vec<NodeId> = dc.bottom_nodes(2).unwrap().iter().map(|e| e.node_id).collect();
        assert_eq!(bottom, vec![0, 4]);
        assert_eq!(dc.top_nodes(100).unwrap().len(), 5);
    }

    #[test]
    fn test_bottom_nodes_ties_ascending_id() {
        let mut g = graph_with([8, 2, 5, 1]);
        g.add_edge(1, 8).unwrap();
        let mut dc = DegreeCentrality::new();
        dc.execute(&g, 0).unwrap();

        let bottom: Vec<NodeId> = dc.bottom_nodes(3).unwrap().iter().map(|e| e.node_id).collect();
        assert_eq!(bottom, vec![2, 5, 1]);
        assert!(dc.bottom_nodes(0).unwrap().is_empty());
    }

    #[test]
    fn test_average_centrality() {
        let g = make_chain(3);
        let mut dc = DegreeCentrality::new();
        dc.execute(&g, 0).unwrap();
        // degrees 1,2,1 over V-1 = 2
        let avg = dc.average_centrality().unwrap();
        assert!((avg - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_node_has_zero_centrality() {
        let g = graph_with([7]);
        let mut dc = DegreeCentrality::new();
        assert_eq!(dc.execute(&g, 0).unwrap(), vec![7]);
        assert_eq!(dc.centrality(7).unwrap(), 0.0);
        assert_eq!(graph_density(&g), 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let mut dc = DegreeCentrality::new();
        assert!(dc.execute(&Graph::new(), 0).unwrap().is_empty());
        assert_eq!(dc.average_centrality().unwrap(), 0.0);
        assert!(dc.top_nodes(3).unwrap().is_empty());
    }

    #[test]
    fn test_graph_density_matches_graph() {
        let g = sample_graph().unwrap();
        assert_eq!(graph_density(&g), g.density());
        assert!((graph_density(&g) - 11.0 / 28.0).abs() < 1e-12);
    }

    #[test]
    fn test_queries_before_run() {
        let dc = DegreeCentrality::new();
        assert!(matches!(dc.centrality(1), Err(GraphError::InvalidState(_))));
        assert!(dc.top_nodes(1).is_err());
        assert!(dc.bottom_nodes(1).is_err());
        assert!(dc.average_centrality().is_err());
    }

    #[test]
    fn test_unknown_node_after_run() {
        let mut dc = DegreeCentrality::new();
        dc.execute(&make_chain(2), 0).unwrap();
        assert_eq!(dc.degree(99), Err(GraphError::UnknownNode(99)));
    }
}
