//! Row-based node import and node/edge CSV export.
//!
//! Node rows are `id,name,activity,interactionCount,connectionCount[,x,y]`.
//! Columns past the seventh are ignored, so a nodes file written by
//! [`export_nodes_csv`] loads back (its trailing `Degree` column is dropped).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use sna_graph_core::{Graph, Node};
use tracing::info;

use crate::error::{IoError, Result};

const NODE_HEADER: &str = "Id,Name,Activity,InteractionCount,ConnectionCount,X,Y,Degree";
const EDGE_HEADER: &str = "FromNodeId,ToNodeId,Weight,FromNodeName,ToNodeName";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Connect every pair of loaded nodes with an auto-weighted edge.
    pub fully_connected: bool,
    /// Skip the first record.
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            fully_connected: false,
            has_header: true,
        }
    }
}

/// Parse node rows from CSV text. Blank lines are skipped; line numbers in
/// errors are 1-based and count the header.
pub fn parse_nodes_csv(text: &str, options: &CsvOptions) -> Result<Vec<Node>> {
    if text.trim().is_empty() {
        return Err(IoError::EmptyFile);
    }

    let skip = usize::from(options.has_header);
    let mut nodes = Vec::new();
    for (line_no, record) in records(text)?.into_iter().skip(skip) {
        if record.trim().is_empty() {
            continue;
        }
        nodes.push(parse_node(&record, line_no)?);
    }
    Ok(nodes)
}

/// Group physical lines into records, joining lines while a quoted field is
/// still open. Each record carries the 1-based line it starts on.
fn records(text: &str) -> Result<Vec<(usize, String)>> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, line) in text.lines().enumerate() {
        let record = match pending.take() {
            Some((start, mut buf)) => {
                buf.push('\n');
                buf.push_str(line);
                (start, buf)
            }
            None => (i + 1, line.to_string()),
        };
        if record.1.matches('"').count() % 2 == 0 {
            out.push(record);
        } else {
            pending = Some(record);
        }
    }

    match pending {
        Some((start, _)) => Err(IoError::Parse {
            line: start,
            message: "unterminated quoted field".to_string(),
        }),
        None => Ok(out),
    }
}

fn parse_node(line: &str, line_no: usize) -> Result<Node> {
    let columns = split_fields(line);
    if columns.len() < 5 || columns.len() == 6 {
        return Err(IoError::Parse {
            line: line_no,
            message: format!("expected 5 or 7 columns, got {}", columns.len()),
        });
    }

    let mut node = Node::new(
        field(&columns, 0, "id", line_no)?,
        columns[1].trim(),
        field(&columns, 2, "activity", line_no)?,
        field(&columns, 3, "interactionCount", line_no)?,
        field(&columns, 4, "connectionCount", line_no)?,
    );
    if columns.len() >= 7 {
        node = node.with_position(
            field(&columns, 5, "x", line_no)?,
            field(&columns, 6, "y", line_no)?,
        );
    }
    Ok(node)
}

fn field<T: FromStr>(columns: &[String], index: usize, name: &str, line_no: usize) -> Result<T> {
    let raw = columns[index].trim();
    raw.parse().map_err(|_| IoError::Parse {
        line: line_no,
        message: format!("invalid {} '{}'", name, raw),
    })
}

/// Split one CSV line, honouring double-quoted fields with `""` escapes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Read node rows from a CSV file.
pub fn load_nodes_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Vec<Node>> {
    let path = path.as_ref();
    let start = Instant::now();
    let text = fs::read_to_string(path)?;
    let nodes = parse_nodes_csv(&text, options)?;
    info!(
        path = %path.display(),
        nodes = nodes.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "loaded nodes csv"
    );
    Ok(nodes)
}

/// Read a CSV file into a graph. With `fully_connected`, every pair of
/// nodes gets an undirected edge weighted from their features.
pub fn load_graph_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Graph> {
    let nodes = load_nodes_csv(path, options)?;
    let graph = build_graph(nodes, options.fully_connected)?;
    let stats = graph.statistics();
    info!(
        nodes = stats.node_count,
        edges = stats.edge_count,
        fully_connected = options.fully_connected,
        "built graph from csv"
    );
    Ok(graph)
}

pub(crate) fn build_graph(nodes: Vec<Node>, fully_connected: bool) -> Result<Graph> {
    let ids: Vec<_> = nodes.iter().map(|n| n.id).collect();
    let pairs = if fully_connected {
        ids.len() * ids.len().saturating_sub(1) / 2
    } else {
        0
    };

    let mut graph = Graph::with_capacity(nodes.len(), pairs * 2);
    for node in nodes {
        graph.add_node(node)?;
    }
    if fully_connected {
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                graph.add_edge(a, b)?;
            }
        }
    }
    Ok(graph)
}

/// Quote a field when it contains a comma, quote or newline.
pub fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Nodes CSV text, one row per node in insertion order plus a `Degree` column.
pub fn nodes_csv(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str(NODE_HEADER);
    out.push('\n');
    for node in graph.nodes() {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            node.id,
            escape(&node.name),
            node.activity,
            node.interaction_count,
            node.connection_count,
            node.x,
            node.y,
            node.degree()
        );
    }
    out
}

/// Edges CSV text: one row per undirected pair (`from < to`) and one per
/// directed record.
pub fn edges_csv(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str(EDGE_HEADER);
    out.push('\n');

    for edge in graph.undirected_edges() {
        let name = |id| graph.node(id).map(|n| escape(&n.name)).unwrap_or_default();
        let _ = writeln!(
            out,
            "{},{},{:.6},{},{}",
            edge.from_id,
            edge.to_id,
            edge.weight,
            name(edge.from_id),
            name(edge.to_id)
        );
    }
    out
}

pub fn export_nodes_csv(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, nodes_csv(graph))?;
    info!(path = %path.display(), nodes = graph.node_count(), "exported nodes csv");
    Ok(())
}

pub fn export_edges_csv(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, edges_csv(graph))?;
    info!(path = %path.display(), "exported edges csv");
    Ok(())
}
