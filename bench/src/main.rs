use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use sna_graph_core::{
    AStar, Bfs, ConnectedComponents, DegreeCentrality, Dfs, Dijkstra, DistanceQuery, Graph,
    GraphAlgorithm, Node, NodeId, PathQuery, WelshPowell,
};
use sna_graph_io::CsvOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Build a social graph and run every analysis algorithm over it
#[derive(Parser, Debug)]
#[command(name = "sna-graph-bench")]
#[command(about = "Run social network graph algorithms and report timings", long_about = None)]
struct Args {
    /// Where the graph comes from
    #[arg(long, value_enum, default_value_t = Mode::Sample)]
    mode: Mode,

    /// Node CSV file for `--mode csv`
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Connect every pair of CSV nodes
    #[arg(long)]
    fully_connected: bool,

    /// Node count for `--mode synthetic`
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
    nodes: u64,

    /// Seed for the synthetic generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Traversal start node (defaults to the first node)
    #[arg(long)]
    start: Option<NodeId>,

    /// Path target node (defaults to the last node)
    #[arg(long)]
    target: Option<NodeId>,

    /// Write JSON/CSV/adjacency exports of the graph into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// The built-in eight-person network
    Sample,
    /// Nodes loaded from `--csv`
    Csv,
    /// Generated small-world social network
    Synthetic,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!("sna-graph-bench");
    println!("===============");
    println!();

    let t = Instant::now();
    let graph = match args.mode {
        Mode::Sample => sna_graph_core::sample_graph()?,
        Mode::Csv => {
            let Some(path) = args.csv.as_ref() else {
                bail!("--mode csv requires --csv <path>");
            };
            let options = CsvOptions {
                fully_connected: args.fully_connected,
                ..Default::default()
            };
            sna_graph_io::load_graph_csv(path, &options)
                .with_context(|| format!("loading {}", path.display()))?
        }
        Mode::Synthetic => gen_social(args.nodes, args.seed)?,
    };
    let stats = graph.statistics();
    println!(
        "Graph ready in {:.2}ms: {} nodes, {} edges, density {:.4}, avg degree {:.2}",
        t.elapsed().as_secs_f64() * 1000.0,
        stats.node_count,
        stats.edge_count,
        stats.density,
        stats.average_degree
    );

    if graph.is_empty() {
        println!("Nothing to analyse.");
        return Ok(());
    }

    let start = args.start.unwrap_or(graph.nodes()[0].id);
    let target = args.target.unwrap_or(graph.nodes()[graph.node_count() - 1].id);
    info!(start, target, "running algorithms");
    println!("Start {} / target {}", start, target);
    println!();

    run_algorithms(&graph, start, target)?;

    if let Some(dir) = args.export_dir {
        let files = sna_graph_io::export_all(&graph, &dir)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        println!();
        println!("Exported {} files to {}", files.len(), dir.display());
    }

    Ok(())
}

fn run_algorithms(graph: &Graph, start: NodeId, target: NodeId) -> anyhow::Result<()> {
    println!("{:<46} {:>10}  result", "algorithm", "time");
    println!("{:-<46} {:->10}  {:-<30}", "", "", "");

    let mut bfs = Bfs::new();
    let (order, ms) = timed(|| bfs.execute(graph, start));
    let order = order?;
    report(bfs.name(), ms, format!("visited {}: {}", order.len(), preview(&order)));

    let mut dfs = Dfs::new();
    let (order, ms) = timed(|| dfs.execute(graph, start));
    let order = order?;
    report(dfs.name(), ms, format!("visited {}: {}", order.len(), preview(&order)));

    let mut dijkstra = Dijkstra::new();
    let (run, ms) = timed(|| dijkstra.execute(graph, start));
    run?;
    report(
        dijkstra.name(),
        ms,
        describe_path(&dijkstra.shortest_path(target)?, dijkstra.distance(target)?),
    );

    let mut astar = AStar::new();
    let (path, ms) = timed(|| astar.find_path(graph, start, target));
    let path = path?;
    report(
        astar.name(),
        ms,
        format!(
            "{}, expanded {}",
            describe_path(&path, astar.cost(target)?),
            astar.visited_order()?.len()
        ),
    );

    let mut coloring = WelshPowell::new();
    let (run, ms) = timed(|| coloring.execute(graph, start));
    run?;
    report(
        coloring.name(),
        ms,
        format!("{} colors", coloring.chromatic_number()?),
    );

    let mut components = ConnectedComponents::new();
    let (run, ms) = timed(|| components.execute(graph, start));
    run?;
    report(
        components.name(),
        ms,
        format!(
            "{} components, largest {}",
            components.component_count()?,
            components.largest_component()?.len()
        ),
    );

    let mut centrality = DegreeCentrality::new();
    let (run, ms) = timed(|| centrality.execute(graph, start));
    run?;
    let top: Vec<String> = centrality
        .top_nodes(3)?
        .iter()
        .map(|e| format!("{}({:.3})", e.node_id, e.centrality))
        .collect();
    report(centrality.name(), ms, format!("top {}", top.join(" ")));

    Ok(())
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let t = Instant::now();
    let value = f();
    (value, t.elapsed().as_secs_f64() * 1000.0)
}

fn report(name: &str, ms: f64, result: String) {
    println!("{:<46} {:>8.3}ms  {}", name, ms, result);
}

fn describe_path(path: &[NodeId], cost: f64) -> String {
    if path.is_empty() {
        return "no path".to_string();
    }
    format!("{} hops, cost {:.4}: {}", path.len() - 1, cost, preview(path))
}

fn preview(ids: &[NodeId]) -> String {
    const SHOWN: usize = 10;
    let head: Vec<String> = ids.iter().take(SHOWN).map(|id| id.to_string()).collect();
    if ids.len() > SHOWN {
        format!("{} ...", head.join(" "))
    } else {
        head.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Generator: deterministic, single-threaded
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

const FIRST_NAMES: [&str; 8] = ["Ali", "Ayse", "Mehmet", "Fatma", "Ahmet", "Zeynep", "Mustafa", "Elif"];

/// Small-world social network (Watts-Strogatz style).
///
/// Every person gets random activity features, then is linked to `K`
/// ring neighbors on each side; each link is rewired to a random person
/// with probability `P`, giving short paths across the ring. Edge weights
/// come from the feature similarity of the two endpoints.
fn gen_social(node_count: u64, seed: u64) -> anyhow::Result<Graph> {
    const K: u64 = 3;
    const P: f64 = 0.1;

    let mut graph = Graph::with_capacity(node_count as usize, (node_count * K * 2) as usize);
    let mut rng = FastRng::new(seed);

    for id in 0..node_count {
        let name = format!("{}_{}", FIRST_NAMES[rng.next(FIRST_NAMES.len() as u64) as usize], id);
        let activity = (rng.next_f64() * 100.0).round() / 10.0;
        let interactions = rng.next(200) as i64;
        let connections = rng.next(25) as i64;
        graph.add_node(Node::new(id, name, activity, interactions, connections))?;
    }

    for i in 0..node_count {
        for j in 1..=K {
            let neighbor = if rng.next_f64() < P {
                rng.next(node_count)
            } else {
                (i + j) % node_count
            };
            if neighbor != i {
                graph.add_edge(i, neighbor)?;
            }
        }
    }

    Ok(graph)
}
