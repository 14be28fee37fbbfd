//! sna-graph-io: file import and export for sna-graph-core graphs.
//!
//! Loads people from row-based CSV and writes graphs out as a JSON document,
//! node and edge CSVs, a text adjacency list and a CSV adjacency matrix.

use std::fs;
use std::path::{Path, PathBuf};

use sna_graph_core::Graph;
use tracing::info;

mod adjacency;
mod csv;
mod error;
mod json;

pub use adjacency::{
    adjacency_list, adjacency_matrix, adjacency_matrix_csv, export_adjacency_list,
    export_adjacency_matrix_csv, AdjacencyMatrix,
};
pub use csv::{
    edges_csv, escape, export_edges_csv, export_nodes_csv, load_graph_csv, load_nodes_csv,
    nodes_csv, parse_nodes_csv, CsvOptions,
};
pub use error::{IoError, Result};
pub use json::{export_json, import_json, to_json_string, DocumentMetadata, GraphDocument};

/// Write every export format into `dir`, creating it if needed. Returns the
/// files written.
pub fn export_all(graph: &Graph, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let json = dir.join("graph.json");
    let nodes = dir.join("nodes.csv");
    let edges = dir.join("edges.csv");
    let list = dir.join("adjacency_list.txt");
    let matrix = dir.join("adjacency_matrix.csv");

    export_json(graph, &json)?;
    export_nodes_csv(graph, &nodes)?;
    export_edges_csv(graph, &edges)?;
    export_adjacency_list(graph, &list)?;
    export_adjacency_matrix_csv(graph, &matrix)?;

    info!(dir = %dir.display(), "exported all formats");
    Ok(vec![json, nodes, edges, list, matrix])
}
