/*!
# K Shortest Paths

Yen's algorithm enumerating simple `s-t` paths by non-decreasing cost.

The first path is the Dijkstra path. Afterwards, every vertex of the most recently accepted
path acts as a *spur vertex*. On a fresh copy of the graph
- every accepted path sharing the root prefix up to the spur vertex loses the edge it takes
  out of the spur vertex,
- all other root vertices lose their incident edges,

and a shortest path from the spur vertex to the target is spliced behind the root prefix.
Candidates already known (by exact vertex sequence) are discarded; the cheapest remaining
candidate is promoted. Without a limit, every simple path is eventually enumerated.

```
use lgraphs::{algo::*, prelude::*};

// a fan 0 -> {1, 2, 3} -> 4
let graph = Graph::from_edges(GraphKind::Directed, 5, [(0, 1), (0, 2), (0, 3), (1, 4), (2, 4), (3, 4)]);
let paths = graph.k_shortest_paths(&UnitWeights, 0, 4).unwrap();
assert_eq!(paths.len(), 3);
assert!(paths.iter().all(|p| p.cost == 2.0));
```
*/

use itertools::Itertools;
use tracing::debug;

use super::*;

/// Configurable Yen search
#[derive(Debug, Clone, Copy, Default)]
pub struct KShortestPaths {
    max_paths: Option<usize>,
}

impl KShortestPaths {
    /// Creates a search enumerating all paths it can find
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after `k` paths have been accepted. `None` removes the limit.
    pub fn set_max_paths(&mut self, k: Option<usize>) {
        self.max_paths = k;
    }

    /// Chainable version of [`KShortestPaths::set_max_paths`]
    pub fn max_paths(mut self, k: usize) -> Self {
        self.set_max_paths(Some(k));
        self
    }

    fn is_saturated(&self, num_paths: usize) -> bool {
        self.max_paths.is_some_and(|k| num_paths >= k)
    }

    /// Returns the accepted paths from `start` to `end` ordered by cost.
    /// The result is empty if `end` cannot be reached from `start`.
    pub fn run<G, W>(&self, graph: &G, weights: &W, start: Node, end: Node) -> Result<Vec<Path>>
    where
        G: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone,
        W: EdgeWeights + ?Sized,
    {
        graph.check_node(start)?;
        graph.check_node(end)?;
        graph.check_non_negative_weights(weights)?;

        if self.is_saturated(0) {
            return Ok(Vec::new());
        }

        let Some(first) = graph.shortest_path(weights, start, end)? else {
            return Ok(Vec::new());
        };

        let mut accepted = vec![first];
        let mut candidates: Vec<Path> = Vec::new();

        while !self.is_saturated(accepted.len()) {
            let Some(last) = accepted.last() else {
                break;
            };

            for i in 0..last.nodes.len().saturating_sub(1) {
                let root = &last.nodes[..=i];
                let spur = last.nodes[i];

                let mut working = graph.clone();
                for path in &accepted {
                    if path.nodes.len() > i + 1 && path.nodes[..=i] == *root {
                        working.try_remove_edge(spur, path.nodes[i + 1]);
                    }
                }
                for &u in &root[..i] {
                    working.remove_edges_at_node(u);
                }

                let Some(spur_path) = working.shortest_path(weights, spur, end)? else {
                    continue;
                };

                let nodes: Vec<Node> = last.nodes[..i]
                    .iter()
                    .copied()
                    .chain(spur_path.nodes)
                    .collect();

                let Some(cost) = graph.path_cost(weights, &nodes) else {
                    continue;
                };

                let candidate = Path { nodes, cost };
                if !candidate.is_simple()
                    || accepted.iter().any(|p| p.nodes == candidate.nodes)
                    || candidates.iter().any(|p| p.nodes == candidate.nodes)
                {
                    continue;
                }

                candidates.push(candidate);
            }

            let Some(best) = candidates
                .iter()
                .position_min_by(|a, b| a.cost.total_cmp(&b.cost))
            else {
                break;
            };

            let path = candidates.remove(best);
            debug!(
                rank = accepted.len() + 1,
                cost = path.cost,
                pending = candidates.len(),
                "promoted candidate path"
            );
            accepted.push(path);
        }

        Ok(accepted)
    }
}

/// Yen's k shortest paths as a method on the graph
pub trait AllPaths: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone {
    /// Enumerates simple paths from `start` to `end` by non-decreasing cost.
    /// See [`KShortestPaths`] to limit the number of paths.
    fn k_shortest_paths<W>(&self, weights: &W, start: Node, end: Node) -> Result<Vec<Path>>
    where
        W: EdgeWeights + ?Sized,
    {
        KShortestPaths::new().run(self, weights, start, end)
    }

    /// As [`AllPaths::k_shortest_paths`] with vertices given by name
    fn k_shortest_paths_by_name<W>(&self, weights: &W, start: &str, end: &str) -> Result<Vec<Path>>
    where
        W: EdgeWeights + ?Sized,
        Self: NamedVertices,
    {
        match (self.find_vertex(start), self.find_vertex(end)) {
            (Some(s), Some(t)) => self.k_shortest_paths(weights, s, t),
            _ => Ok(Vec::new()),
        }
    }
}

impl<G> AllPaths for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};
    use rand_pcg::Pcg64Mcg;

    /// The classic example with vertices C, D, E, F, G, H
    fn yen_example() -> (Graph, Vec<f64>) {
        let mut graph = Graph::directed();
        for name in ["C", "D", "E", "F", "G", "H"] {
            graph.add_vertex(name).unwrap();
        }

        let mut weights = Vec::new();
        for (u, v, w) in [
            ("C", "D", 3.0),
            ("C", "E", 2.0),
            ("D", "F", 4.0),
            ("E", "D", 1.0),
            ("E", "F", 2.0),
            ("E", "G", 3.0),
            ("F", "G", 2.0),
            ("F", "H", 1.0),
            ("G", "H", 2.0),
        ] {
            let u = graph.find_vertex(u).unwrap();
            let v = graph.find_vertex(v).unwrap();
            graph.add_weighted_edge(&mut weights, u, v, w);
        }
        (graph, weights)
    }

    #[test]
    fn three_shortest() {
        let (graph, weights) = yen_example();
        let paths = KShortestPaths::new()
            .max_paths(3)
            .run(&graph, &weights, 0, 5)
            .unwrap();

        let named = paths
            .iter()
            .map(|p| (graph.names_of(p.nodes.iter().copied()).join(""), p.cost))
            .collect_vec();
        assert_eq!(
            named,
            vec![
                ("CEFH".to_string(), 5.0),
                ("CEGH".to_string(), 7.0),
                ("CDFH".to_string(), 8.0),
            ]
        );
    }

    #[test]
    fn enumeration_terminates() {
        let (graph, weights) = yen_example();
        let paths = graph.k_shortest_paths_by_name(&weights, "C", "H").unwrap();

        assert!(paths.len() >= 3);
        assert_eq!(
            paths[0],
            graph.shortest_path(&weights, 0, 5).unwrap().unwrap()
        );
        assert!(paths.iter().map(|p| &p.nodes).all_unique());
        assert!(paths.iter().all(|p| p.is_simple()));
    }

    #[test]
    fn degenerate_inputs() {
        let (graph, weights) = yen_example();
        assert!(graph.k_shortest_paths(&weights, 5, 0).unwrap().is_empty());
        assert_eq!(
            graph.k_shortest_paths(&weights, 2, 2).unwrap(),
            vec![Path::trivial(2)]
        );
        assert!(graph.k_shortest_paths_by_name(&weights, "C", "X").unwrap().is_empty());
        assert!(KShortestPaths::new()
            .max_paths(0)
            .run(&graph, &weights, 0, 5)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn undirected_cycle_has_two_paths() {
        let mut graph = Graph::undirected();
        graph.connect_cycle(0..6);
        let paths = graph.k_shortest_paths(&UnitWeights, 0, 2).unwrap();

        assert_eq!(
            paths.iter().map(|p| p.nodes.clone()).collect_vec(),
            vec![vec![0, 1, 2], vec![0, 5, 4, 3, 2]]
        );
        assert_eq!(paths[1].cost, 4.0);
    }

    fn simple_paths_by_dfs<G: AdjacencyList>(graph: &G, start: Node, end: Node) -> Vec<Vec<Node>> {
        fn extend<G: AdjacencyList>(
            graph: &G,
            end: Node,
            path: &mut Vec<Node>,
            result: &mut Vec<Vec<Node>>,
        ) {
            let Some(&u) = path.last() else {
                return;
            };
            if u == end {
                result.push(path.clone());
                return;
            }
            for v in graph.neighbors_of(u).unique().collect_vec() {
                if !path.contains(&v) {
                    path.push(v);
                    extend(graph, end, path, result);
                    path.pop();
                }
            }
        }

        let mut result = Vec::new();
        extend(graph, end, &mut vec![start], &mut result);
        result.sort();
        result
    }

    #[test]
    fn fan_yields_every_branch() {
        let graph = Graph::from_edges(
            GraphKind::Directed,
            6,
            [(0, 1), (0, 2), (0, 3), (1, 4), (2, 4), (3, 4), (3, 5), (4, 5)],
        );

        let paths = graph.k_shortest_paths(&UnitWeights, 0, 4).unwrap();
        assert_eq!(
            paths.iter().map(|p| p.nodes.clone()).sorted().collect_vec(),
            vec![vec![0, 1, 4], vec![0, 2, 4], vec![0, 3, 4]]
        );

        let paths = graph.k_shortest_paths(&UnitWeights, 0, 5).unwrap();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0].nodes, vec![0, 3, 5]);
    }

    #[test]
    fn unlimited_search_matches_dfs_enumeration() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        let distr = Uniform::new(0.5, 4.0).unwrap();

        for kind in [GraphKind::Directed, GraphKind::Undirected] {
            for _ in 0..15 {
                let graph = Gnp::new().nodes(8).avg_deg(2.5).graph(kind, rng);
                let weights: Vec<f64> = (0..graph.number_of_edge_slots())
                    .map(|_| distr.sample(rng))
                    .collect();

                let paths = graph.k_shortest_paths(&weights, 0, 7).unwrap();
                for (a, b) in paths.iter().tuple_windows() {
                    assert!(a.cost <= b.cost);
                }
                assert_eq!(
                    paths.iter().map(|p| p.nodes.clone()).sorted().collect_vec(),
                    simple_paths_by_dfs(&graph, 0, 7)
                );
            }
        }
    }

    #[test]
    fn costs_are_non_decreasing() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);
        let distr = Uniform::new(0.0, 10.0).unwrap();

        for _ in 0..20 {
            let graph = Gnp::new().nodes(12).avg_deg(3.0).graph(GraphKind::Directed, rng);
            let weights: Vec<f64> = (0..graph.number_of_edge_slots())
                .map(|_| distr.sample(rng))
                .collect();

            let paths = KShortestPaths::new()
                .max_paths(8)
                .run(&graph, &weights, 0, 11)
                .unwrap();

            assert!(paths.iter().map(|p| &p.nodes).all_unique());
            for (a, b) in paths.iter().tuple_windows() {
                assert!(a.cost <= b.cost);
            }
            for p in &paths {
                assert_eq!(graph.path_cost(&weights, &p.nodes), Some(p.cost));
            }
        }
    }
}
