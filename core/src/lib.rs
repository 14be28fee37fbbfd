//! sna-graph-core: In-memory social network graph and analysis algorithms.
//!
//! People are nodes carrying activity features; friendships are edges whose
//! weight is derived from how similar the two people are. On top of the
//! graph sit seven algorithms sharing the [`GraphAlgorithm`] contract:
//! BFS, DFS, Dijkstra, A*, Welsh-Powell coloring, connected components and
//! degree centrality.
//!
//! No file or network I/O happens here; see `sna-graph-io` for CSV/JSON.

mod algorithm;
mod centrality;
mod coloring;
mod components;
mod error;
mod graph;
mod sample;
mod shortest_path;
mod traversal;
mod weight;

#[cfg(test)]
mod fixtures;

pub use algorithm::{DistanceQuery, GraphAlgorithm, PathQuery};
pub use centrality::{graph_density, CentralityEntry, DegreeCentrality};
pub use coloring::WelshPowell;
pub use components::ConnectedComponents;
pub use error::{GraphError, Result};
pub use graph::{Edge, Graph, GraphStats, Node, NodeId};
pub use sample::sample_graph;
pub use shortest_path::{heuristic, AStar, Dijkstra, FeatureScale};
pub use traversal::{bfs_levels, Bfs, Dfs};
pub use weight::edge_weight;
