use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sna_graph_core::{Edge, Graph, Node};
use tracing::info;

use crate::error::Result;

/// Serialized form of a whole graph.
///
/// `edges` holds one record per connection (`fromId < toId` for undirected
/// pairs), so it can be replayed through [`Graph::insert_edge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub node_count: usize,
    pub edge_count: usize,
    /// UTC wall clock, `YYYY-MM-DD HH:MM:SS`.
    pub export_date: String,
}

const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl GraphDocument {
    pub fn from_graph(graph: &Graph) -> Self {
        let now: DateTime<Utc> = Utc::now();

        Self {
            nodes: graph.nodes().to_vec(),
            edges: graph.undirected_edges().copied().collect(),
            metadata: DocumentMetadata {
                node_count: graph.node_count(),
                edge_count: graph.statistics().edge_count,
                export_date: now.format(EXPORT_DATE_FORMAT).to_string(),
            },
        }
    }

    /// Rebuild a graph using the stored weights. Neighbor lists in the
    /// document are ignored and recomputed from `edges`.
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::with_capacity(self.nodes.len(), self.edges.len() * 2);
        for node in self.nodes {
            graph.add_node(node)?;
        }
        for edge in self.edges {
            graph.insert_edge(edge.from_id, edge.to_id, Some(edge.weight), edge.is_directed)?;
        }
        Ok(graph)
    }
}

/// Pretty-printed JSON document for `graph`.
pub fn to_json_string(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&GraphDocument::from_graph(graph))?)
}

pub fn export_json(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_json_string(graph)?)?;
    info!(path = %path.display(), nodes = graph.node_count(), "exported json");
    Ok(())
}

pub fn import_json(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let document: GraphDocument = serde_json::from_str(&fs::read_to_string(path)?)?;
    let graph = document.into_graph()?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.statistics().edge_count,
        "imported json"
    );
    Ok(graph)
}
