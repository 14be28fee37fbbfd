use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use sna_graph_core::{Graph, NodeId};
use tracing::info;

/// Dense weight matrix over node ids in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    pub ids: Vec<NodeId>,
    /// Row-major; `weights[i][j]` is the weight of `ids[i] -> ids[j]`, 0 when absent.
    pub weights: Vec<Vec<f64>>,
}

pub fn adjacency_matrix(graph: &Graph) -> AdjacencyMatrix {
    let mut ids: Vec<NodeId> = graph.nodes().iter().map(|n| n.id).collect();
    ids.sort_unstable();
    let position: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut weights = vec![vec![0.0; ids.len()]; ids.len()];
    for edge in graph.edges() {
        if let (Some(&i), Some(&j)) = (position.get(&edge.from_id), position.get(&edge.to_id)) {
            weights[i][j] = edge.weight;
        }
    }
    AdjacencyMatrix { ids, weights }
}

/// Matrix as CSV: a header row of ids, then one row per id with four-decimal weights.
pub fn adjacency_matrix_csv(graph: &Graph) -> String {
    let matrix = adjacency_matrix(graph);
    let header: Vec<String> = matrix.ids.iter().map(|id| id.to_string()).collect();

    let mut out = String::new();
    let _ = writeln!(out, ",{}", header.join(","));
    for (id, row) in matrix.ids.iter().zip(&matrix.weights) {
        let cells: Vec<String> = row.iter().map(|w| format!("{:.4}", w)).collect();
        let _ = writeln!(out, "{},{}", id, cells.join(","));
    }
    out
}

/// Human-readable adjacency list, one line per node in ascending id order:
/// `Name (ID:n) -> [Neighbor(w:0.1234), ...]`.
pub fn adjacency_list(graph: &Graph) -> String {
    let stats = graph.statistics();
    let mut out = String::new();
    out.push_str("=== ADJACENCY LIST ===\n");
    let _ = writeln!(out, "Nodes: {}, Edges: {}", stats.node_count, stats.edge_count);
    out.push('\n');

    let mut nodes: Vec<_> = graph.nodes().iter().collect();
    nodes.sort_by_key(|n| n.id);
    for node in nodes {
        let neighbors: Vec<String> = graph
            .edges_of(node.id)
            .iter()
            .map(|e| {
                let label = graph
                    .node(e.to_id)
                    .map(|n| n.name.clone())
                    .unwrap_or_else(|| e.to_id.to_string());
                format!("{}(w:{:.4})", label, e.weight)
            })
            .collect();
        let _ = writeln!(out, "{} (ID:{}) -> [{}]", node.name, node.id, neighbors.join(", "));
    }
    out
}

pub fn export_adjacency_list(graph: &Graph, path: impl AsRef<Path>) -> crate::Result<()> {
    let path = path.as_ref();
    fs::write(path, adjacency_list(graph))?;
    info!(path = %path.display(), "exported adjacency list");
    Ok(())
}

pub fn export_adjacency_matrix_csv(graph: &Graph, path: impl AsRef<Path>) -> crate::Result<()> {
    let path = path.as_ref();
    fs::write(path, adjacency_matrix_csv(graph))?;
    info!(path = %path.display(), size = graph.node_count(), "exported adjacency matrix");
    Ok(())
}
