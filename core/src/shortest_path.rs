use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::algorithm::{DistanceQuery, GraphAlgorithm, PathQuery};
use crate::error::{GraphError, Result};
use crate::graph::{Graph, Node, NodeId};

/// Divisors used by the feature-difference A* heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureScale {
    pub interaction: f64,
    pub connection: f64,
    /// Number of averaged terms.
    pub terms: f64,
}

impl Default for FeatureScale {
    fn default() -> Self {
        Self {
            interaction: 100.0,
            connection: 10.0,
            terms: 3.0,
        }
    }
}

/// Estimated remaining cost from `from` to `to`.
///
/// Euclidean distance when both nodes carry coordinates, otherwise the
/// averaged, scaled feature differences. The feature estimate is not proven
/// admissible against the weight formula, so A* results without coordinates
/// are not guaranteed optimal.
pub fn heuristic(from: &Node, to: &Node, scale: &FeatureScale) -> f64 {
    if from.has_position() && to.has_position() {
        return from.distance_to(to);
    }

    let activity = (from.activity - to.activity).abs();
    let interaction = (from.interaction_count - to.interaction_count).abs() as f64;
    let connection = (from.connection_count - to.connection_count).abs() as f64;

    (activity + interaction / scale.interaction + connection / scale.connection) / scale.terms
}

/// Per-run result of a best-first search.
#[derive(Debug, Clone)]
struct SearchState {
    start: NodeId,
    target: Option<NodeId>,
    /// Accumulated cost `g` per node; +inf when not reached.
    costs: HashMap<NodeId, f64>,
    previous: HashMap<NodeId, Option<NodeId>>,
    order: Vec<NodeId>,
}

impl SearchState {
    fn cost(&self, id: NodeId) -> Result<f64> {
        self.costs.get(&id).copied().ok_or(GraphError::UnknownNode(id))
    }

    /// Walk predecessors back from `target`; empty when it was never reached.
    fn path_to(&self, target: NodeId) -> Result<Vec<NodeId>> {
        if self.cost(target)?.is_infinite() {
            return Ok(Vec::new());
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(&Some(parent)) = self.previous.get(&current) {
            path.push(parent);
            current = parent;
        }

        path.reverse();
        Ok(path)
    }
}

/// Shared relaxation loop for Dijkstra and A*.
///
/// The frontier is a min-heap on `(g + h, id)`, so equal scores resolve to the
/// smaller id. Superseded heap entries are skipped once their node is
/// settled. With a target, the search stops as soon as the target is popped.
fn best_first<H>(graph: &Graph, start: NodeId, target: Option<NodeId>, estimate: H) -> SearchState
where
    H: Fn(NodeId) -> f64,
{
    let mut costs: HashMap<NodeId, f64> =
        graph.nodes().iter().map(|n| (n.id, f64::INFINITY)).collect();
    let mut previous: HashMap<NodeId, Option<NodeId>> =
        graph.nodes().iter().map(|n| (n.id, None)).collect();
    let mut settled: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());
    let mut order = Vec::new();
    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();

    costs.insert(start, 0.0);
    frontier.push(Reverse((OrderedFloat(estimate(start)), start)));

    while let Some(Reverse((_, current))) = frontier.pop() {
        if target == Some(current) {
            order.push(current);
            break;
        }
        if !settled.insert(current) {
            continue;
        }
        order.push(current);

        let base = costs[&current];
        for edge in graph.edges_of(current) {
            let next = edge.to_id;
            if settled.contains(&next) {
                continue;
            }
            let tentative = base + edge.weight;
            if tentative < costs[&next] {
                costs.insert(next, tentative);
                previous.insert(next, Some(current));
                frontier.push(Reverse((OrderedFloat(tentative + estimate(next)), next)));
            }
        }
    }

    SearchState {
        start,
        target,
        costs,
        previous,
        order,
    }
}

/// Single-source shortest paths over non-negative edge weights.
#[derive(Debug, Default, Clone)]
pub struct Dijkstra {
    state: Option<SearchState>,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, query: &'static str) -> Result<&SearchState> {
        self.state.as_ref().ok_or(GraphError::InvalidState(query))
    }

    /// Start node of the last run.
    pub fn start(&self) -> Option<NodeId> {
        self.state.as_ref().map(|s| s.start)
    }

    pub fn all_distances(&self) -> Result<&HashMap<NodeId, f64>> {
        Ok(&self.state("all_distances")?.costs)
    }
}

impl GraphAlgorithm for Dijkstra {
    fn name(&self) -> &'static str {
        "Dijkstra's Shortest Path"
    }

    /// Settle every node reachable from `start`; returns settle order.
    fn execute(&mut self, graph: &Graph, start: NodeId) -> Result<Vec<NodeId>> {
        if !graph.contains(start) {
            return Err(GraphError::UnknownNode(start));
        }

        let state = best_first(graph, start, None, |_| 0.0);
        debug!(start, settled = state.order.len(), "dijkstra complete");
        let order = state.order.clone();
        self.state = Some(state);
        Ok(order)
    }
}

impl DistanceQuery for Dijkstra {
    fn distance(&self, id: NodeId) -> Result<f64> {
        self.state("distance")?.cost(id)
    }
}

impl PathQuery for Dijkstra {
    fn shortest_path(&self, target: NodeId) -> Result<Vec<NodeId>> {
        self.state("shortest_path")?.path_to(target)
    }
}

/// Heuristic best-first search toward a single target.
///
/// Without a target (`execute`) the heuristic is zero and the search is
/// exactly Dijkstra.
#[derive(Debug, Default, Clone)]
pub struct AStar {
    scale: FeatureScale,
    state: Option<SearchState>,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(scale: FeatureScale) -> Self {
        Self { scale, state: None }
    }

    fn state(&self, query: &'static str) -> Result<&SearchState> {
        self.state.as_ref().ok_or(GraphError::InvalidState(query))
    }

    /// Path from `start` to `target`, stopping once the target leaves the
    /// frontier. Empty when the target is unreachable.
    pub fn find_path(&mut self, graph: &Graph, start: NodeId, target: NodeId) -> Result<Vec<NodeId>> {
        if !graph.contains(start) {
            return Err(GraphError::UnknownNode(start));
        }
        let goal = graph.node(target).ok_or(GraphError::UnknownNode(target))?;

        let scale = self.scale;
        let state = best_first(graph, start, Some(target), |id| {
            graph.node(id).map(|n| heuristic(n, goal, &scale)).unwrap_or(0.0)
        });
        debug!(start, target, expanded = state.order.len(), "a* search complete");

        let path = state.path_to(target)?;
        self.state = Some(state);
        Ok(path)
    }

    /// Accumulated cost `g` of the last run; +inf for nodes not reached.
    pub fn cost(&self, id: NodeId) -> Result<f64> {
        self.state("cost")?.cost(id)
    }

    pub fn all_costs(&self) -> Result<&HashMap<NodeId, f64>> {
        Ok(&self.state("all_costs")?.costs)
    }

    /// Nodes in the order they were taken off the frontier during the last run.
    pub fn visited_order(&self) -> Result<&[NodeId]> {
        Ok(&self.state("visited_order")?.order)
    }

    /// Target of the last run, `None` for a full traversal.
    pub fn target(&self) -> Option<NodeId> {
        self.state.as_ref().and_then(|s| s.target)
    }
}

impl GraphAlgorithm for AStar {
    fn name(&self) -> &'static str {
        "A* Pathfinding"
    }

    fn execute(&mut self, graph: &Graph, start: NodeId) -> Result<Vec<NodeId>> {
        if !graph.contains(start) {
            return Err(GraphError::UnknownNode(start));
        }

        let state = best_first(graph, start, None, |_| 0.0);
        debug!(start, settled = state.order.len(), "a* traversal complete");
        let order = state.order.clone();
        self.state = Some(state);
        Ok(order)
    }
}

impl DistanceQuery for AStar {
    fn distance(&self, id: NodeId) -> Result<f64> {
        self.cost(id)
    }
}

impl PathQuery for AStar {
    fn shortest_path(&self, target: NodeId) -> Result<Vec<NodeId>> {
        self.state("shortest_path")?.path_to(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{graph_with, make_chain, make_diamond, make_weighted, person};
    use crate::sample::sample_graph;

    fn path_cost(g: &Graph, path: &[NodeId]) -> f64 {
        path.windows(2).map(|w| g.edge_weight(w[0], w[1]).unwrap()).sum()
    }

    /// Cheapest simple-path cost from `from` to every node, by exhaustive DFS.
    fn brute_force(g: &Graph, from: NodeId) -> HashMap<NodeId, f64> {
        fn walk(
            g: &Graph,
            node: NodeId,
            cost: f64,
            on_path: &mut Vec<NodeId>,
            best: &mut HashMap<NodeId, f64>,
        ) {
            let entry = best.entry(node).or_insert(f64::INFINITY);
            if cost < *entry {
                *entry = cost;
            }
            for edge in g.edges_of(node) {
                if !on_path.contains(&edge.to_id) {
                    on_path.push(edge.to_id);
                    walk(g, edge.to_id, cost + edge.weight, on_path, best);
                    on_path.pop();
                }
            }
        }

        let mut best = HashMap::new();
        walk(g, from, 0.0, &mut vec![from], &mut best);
        best
    }

    fn weighted_fixture() -> Graph {
        make_weighted(&[
            (1, 2, 0.7),
            (1, 3, 0.2),
            (3, 2, 0.3),
            (2, 4, 0.9),
            (3, 5, 1.5),
            (4, 5, 0.1),
            (5, 6, 0.4),
            (4, 6, 0.8),
        ])
    }

    // --- Dijkstra ---

    #[test]
    fn test_dijkstra_diamond_scenario() {
        let g = make_diamond();
        let mut d = Dijkstra::new();
        d.execute(&g, 1).unwrap();

        let path = d.shortest_path(4).unwrap();
        assert_eq!(path.len(), 3);

        let via_2 = g.edge_weight(1, 2).unwrap() + g.edge_weight(2, 4).unwrap();
        let via_3 = g.edge_weight(1, 3).unwrap() + g.edge_weight(3, 4).unwrap();
        let expected = via_2.min(via_3);
        assert!((d.distance(4).unwrap() - expected).abs() < 1e-12);
        assert_eq!(path, if via_3 < via_2 { vec![1, 3, 4] } else { vec![1, 2, 4] });
    }

    #[test]
    fn test_dijkstra_matches_brute_force() {
        let g = weighted_fixture();
        for start in 1..=6 {
            let mut d = Dijkstra::new();
            d.execute(&g, start).unwrap();
            let best = brute_force(&g, start);
            for id in 1..=6 {
                let dist = d.distance(id).unwrap();
                assert!(
                    (dist - best[&id]).abs() < 1e-9,
                    "start {} node {}: dijkstra {} brute force {}",
                    start,
                    id,
                    dist,
                    best[&id]
                );
            }
        }
    }

    #[test]
    fn test_dijkstra_distance_equals_path_sum() {
        let g = weighted_fixture();
        let mut d = Dijkstra::new();
        d.execute(&g, 1).unwrap();
        for id in 1..=6 {
            let path = d.shortest_path(id).unwrap();
            assert_eq!(path.first(), Some(&1));
            assert_eq!(path.last(), Some(&id));
            assert!((path_cost(&g, &path) - d.distance(id).unwrap()).abs() < 1e-12);
        }
        assert_eq!(d.shortest_path(6).unwrap(), vec![1, 3, 2, 4, 5, 6]);
    }

    #[test]
    fn test_dijkstra_tie_break_smaller_id() {
        let g = make_weighted(&[(1, 3, 1.0), (1, 2, 1.0), (2, 4, 1.0), (3, 4, 1.0)]);
        let mut d = Dijkstra::new();
        let order = d.execute(&g, 1).unwrap();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(d.shortest_path(4).unwrap(), vec![1, 2, 4]);
    }

    #[test]
    fn test_dijkstra_unreachable() {
        let mut g = make_chain(3);
        g.add_node(person(9)).unwrap();
        let mut d = Dijkstra::new();
        let order = d.execute(&g, 0).unwrap();
        assert!(!order.contains(&9));
        assert!(d.distance(9).unwrap().is_infinite());
        assert!(d.shortest_path(9).unwrap().is_empty());
    }

    #[test]
    fn test_dijkstra_path_to_start() {
        let g = make_chain(3);
        let mut d = Dijkstra::new();
        d.execute(&g, 1).unwrap();
        assert_eq!(d.shortest_path(1).unwrap(), vec![1]);
        assert_eq!(d.distance(1).unwrap(), 0.0);
    }

    #[test]
    fn test_dijkstra_queries_before_run() {
        let d = Dijkstra::new();
        assert!(matches!(d.distance(1), Err(GraphError::InvalidState(_))));
        assert!(matches!(d.shortest_path(1), Err(GraphError::InvalidState(_))));
        assert!(d.all_distances().is_err());
        assert_eq!(d.start(), None);
    }

    #[test]
    fn test_dijkstra_unknown_ids() {
        let g = make_chain(3);
        let mut d = Dijkstra::new();
        assert_eq!(d.execute(&g, 50), Err(GraphError::UnknownNode(50)));
        d.execute(&g, 0).unwrap();
        assert_eq!(d.distance(50), Err(GraphError::UnknownNode(50)));
        assert_eq!(d.shortest_path(50), Err(GraphError::UnknownNode(50)));
    }

    #[test]
    fn test_dijkstra_rerun_replaces_state() {
        let g = make_chain(4);
        let mut d = Dijkstra::new();
        d.execute(&g, 0).unwrap();
        assert_eq!(d.distance(3).unwrap(), 3.0);
        d.execute(&g, 3).unwrap();
        assert_eq!(d.start(), Some(3));
        assert_eq!(d.distance(3).unwrap(), 0.0);
        assert_eq!(d.distance(0).unwrap(), 3.0);
        assert_eq!(d.shortest_path(0).unwrap(), vec![3, 2, 1, 0]);
    }

    // --- A* ---

    /// Nodes on a line with edge weights equal to their distance, a long
    /// shortcut 1-5 and a detour node 6 behind the start.
    fn positioned_fixture() -> Graph {
        let mut g = Graph::new();
        for id in 1..=5u64 {
            g.add_node(person(id).with_position(id as f64, 0.0)).unwrap();
        }
        g.add_node(person(6).with_position(-5.0, 0.0)).unwrap();
        for id in 1..5u64 {
            g.add_weighted_edge(id, id + 1, 1.0).unwrap();
        }
        g.add_weighted_edge(1, 5, 10.0).unwrap();
        g.add_weighted_edge(1, 6, 6.0).unwrap();
        g
    }

    #[test]
    fn test_astar_find_path_with_positions() {
        let g = positioned_fixture();
        let mut a = AStar::new();
        let path = a.find_path(&g, 1, 5).unwrap();
        assert_eq!(path, vec![1, 2, 3, 4, 5]);
        assert_eq!(a.cost(5).unwrap(), 4.0);
        assert_eq!(a.target(), Some(5));

        // The detour behind the start is never expanded
        let expanded = a.visited_order().unwrap();
        assert_eq!(expanded, &[1, 2, 3, 4, 5]);
        assert!(!expanded.contains(&6));
    }

    #[test]
    fn test_astar_without_target_matches_dijkstra() {
        let g = sample_graph().unwrap();
        for start in [1, 4, 8] {
            let mut d = Dijkstra::new();
            let mut a = AStar::new();
            let d_order = d.execute(&g, start).unwrap();
            let a_order = a.execute(&g, start).unwrap();
            assert_eq!(d_order, a_order);
            for node in g.nodes() {
                assert_eq!(d.distance(node.id).unwrap(), a.distance(node.id).unwrap());
            }
            assert_eq!(a.target(), None);
        }
    }

    #[test]
    fn test_astar_path_cost_consistent() {
        let g = sample_graph().unwrap();
        let mut a = AStar::new();
        let path = a.find_path(&g, 1, 8).unwrap();
        assert_eq!(path.first(), Some(&1));
        assert_eq!(path.last(), Some(&8));
        assert!((path_cost(&g, &path) - a.cost(8).unwrap()).abs() < 1e-12);
        assert_eq!(a.shortest_path(8).unwrap(), path);
    }

    #[test]
    fn test_astar_unreachable_target() {
        let mut g = make_chain(3);
        g.add_node(person(7)).unwrap();
        let mut a = AStar::new();
        assert!(a.find_path(&g, 0, 7).unwrap().is_empty());
        assert!(a.cost(7).unwrap().is_infinite());
    }

    #[test]
    fn test_astar_start_is_target() {
        let g = make_chain(3);
        let mut a = AStar::new();
        assert_eq!(a.find_path(&g, 2, 2).unwrap(), vec![2]);
        assert_eq!(a.visited_order().unwrap(), &[2]);
    }

    #[test]
    fn test_astar_unknown_nodes() {
        let g = make_chain(3);
        let mut a = AStar::new();
        assert_eq!(a.find_path(&g, 9, 0), Err(GraphError::UnknownNode(9)));
        assert_eq!(a.find_path(&g, 0, 9), Err(GraphError::UnknownNode(9)));
        assert_eq!(a.execute(&g, 9), Err(GraphError::UnknownNode(9)));
    }

    #[test]
    fn test_astar_cost_before_run() {
        let a = AStar::new();
        assert!(matches!(a.cost(1), Err(GraphError::InvalidState("cost"))));
        assert!(a.visited_order().is_err());
        assert!(a.all_costs().is_err());
    }

    // --- Heuristic ---

    #[test]
    fn test_heuristic_euclidean_when_positioned() {
        let a = person(1).with_position(1.0, 1.0);
        let b = person(2).with_position(4.0, 5.0);
        assert_eq!(heuristic(&a, &b, &FeatureScale::default()), 5.0);
    }

    #[test]
    fn test_heuristic_features_when_unpositioned() {
        let a = Node::new(1, "a", 8.5, 120, 15);
        let b = Node::new(2, "b", 7.5, 20, 5).with_position(3.0, 4.0);
        // (1.0 + 100/100 + 10/10) / 3
        let h = heuristic(&a, &b, &FeatureScale::default());
        assert!((h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_heuristic_custom_scale() {
        let a = Node::new(1, "a", 0.0, 50, 0);
        let b = Node::new(2, "b", 0.0, 0, 0);
        let scale = FeatureScale {
            interaction: 50.0,
            connection: 10.0,
            terms: 1.0,
        };
        assert_eq!(heuristic(&a, &b, &scale), 1.0);
        assert_eq!(heuristic(&a, &a, &scale), 0.0);
    }

    #[test]
    fn test_astar_with_scale_still_finds_path() {
        let mut g = graph_with([1, 2, 3]);
        g.add_weighted_edge(1, 2, 0.5).unwrap();
        g.add_weighted_edge(2, 3, 0.5).unwrap();
        let mut a = AStar::with_scale(FeatureScale {
            interaction: 1.0,
            connection: 1.0,
            terms: 1.0,
        });
        assert_eq!(a.find_path(&g, 1, 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(a.cost(3).unwrap(), 1.0);
    }
}
