/*!
# Travelling Salesperson

Exact branch-and-bound search for a cheapest closed tour through all vertices, starting and
ending at vertex `0`.

Every vertex contributes `(cheapest + second cheapest incident edge) / 2` to a lower bound on
the cost of any tour. When the tour is extended by an edge `(u, v)`, the bound is tightened
per level: `u` gives up its remaining half estimate and `v` keeps only its cheapest half for the
edge that will leave it. A partial tour is dropped as soon as its cost plus the bound is at
least the cost of the best tour found so far.

Missing edges cannot be used. A vertex with fewer than two neighbors therefore makes the bound
infinite and no tour is found, except for the single-vertex graph whose tour `[0, 0]` uses no
edge at all. Two vertices only form a tour if both directed edges exist; one undirected edge
would have to be used twice. The search recurses once per tour position, so its stack depth
grows with the number of vertices.
*/

use tracing::{debug, trace};

use super::*;

struct TspSearch {
    costs: Vec<Vec<Option<f64>>>,
    first_min: Vec<f64>,
    second_min: Vec<f64>,
    visited: NodeBitSet,
    path: Vec<Node>,
    best_cost: f64,
    best_path: Vec<Node>,
}

impl TspSearch {
    fn new<G, W>(graph: &G, weights: &W) -> Self
    where
        G: AdjacencyList,
        W: EdgeWeights + ?Sized,
    {
        let n = graph.len();
        let mut costs = vec![vec![None; n]; n];
        for u in graph.vertices() {
            for (e, v) in graph.out_edges_of(u) {
                if u != v {
                    costs[u as usize][v as usize] = Some(weights.weight(e));
                }
            }
        }

        // cheapest and second cheapest incident edge; a directed edge is incident to both ends
        let mut first_min = vec![f64::INFINITY; n];
        let mut second_min = vec![f64::INFINITY; n];
        let mut record = |u: usize, w: f64| {
            if w <= first_min[u] {
                second_min[u] = first_min[u];
                first_min[u] = w;
            } else if w < second_min[u] {
                second_min[u] = w;
            }
        };
        for (u, row) in costs.iter().enumerate() {
            for (v, w) in row.iter().enumerate() {
                if let Some(w) = *w {
                    record(u, w);
                    if graph.is_directed() {
                        record(v, w);
                    }
                }
            }
        }

        Self {
            costs,
            first_min,
            second_min,
            visited: graph.vertex_bitset_unset(),
            path: Vec::with_capacity(n + 1),
            best_cost: f64::INFINITY,
            best_path: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.costs.len()
    }

    fn run(mut self) -> Option<Path> {
        match self.len() {
            0 => return None,
            1 => return Some(Path { nodes: vec![0, 0], cost: 0.0 }),
            _ => {}
        }

        let bound: f64 = self
            .first_min
            .iter()
            .zip(&self.second_min)
            .map(|(a, b)| a + b)
            .sum::<f64>()
            / 2.0;

        self.visited.set_bit(0);
        self.path.push(0);
        self.branch(bound, 0.0);

        (!self.best_path.is_empty()).then(|| Path {
            nodes: self.best_path,
            cost: self.best_cost,
        })
    }

    fn branch(&mut self, bound: f64, cost: f64) {
        let level = self.path.len();
        let Some(&last) = self.path.last() else {
            return;
        };

        if level == self.len() {
            if let Some(w) = self.costs[last as usize][0] {
                if cost + w < self.best_cost {
                    self.best_cost = cost + w;
                    self.best_path = self.path.clone();
                    self.best_path.push(0);
                    trace!(cost = self.best_cost, "improved tour");
                }
            }
            return;
        }

        for v in 0..self.len() as Node {
            let Some(w) = self.costs[last as usize][v as usize] else {
                continue;
            };
            if self.visited.get_bit(v) {
                continue;
            }

            // the start keeps its cheapest half for the closing edge
            let leaving = if level == 1 {
                self.second_min[last as usize]
            } else {
                self.first_min[last as usize]
            };
            let tightened = bound - (leaving + self.second_min[v as usize]) / 2.0;

            if tightened + cost + w < self.best_cost {
                self.visited.set_bit(v);
                self.path.push(v);
                self.branch(tightened, cost + w);
                self.path.pop();
                self.visited.clear_bit(v);
            }
        }
    }
}

/// Travelling salesperson as a method on the graph
pub trait TravellingSalesperson: AdjacencyList + EdgeLookup + GraphEdgeOrder {
    /// Computes a cheapest closed tour visiting every vertex exactly once, starting and ending
    /// at vertex `0`. Returns `None` if the search finds no tour.
    fn tsp<W>(&self, weights: &W) -> Result<Option<Path>>
    where
        W: EdgeWeights + ?Sized,
    {
        self.check_non_negative_weights(weights)?;

        let tour = TspSearch::new(self, weights).run();
        debug!(n = self.len(), cost = tour.as_ref().map(|t| t.cost), "tsp");
        Ok(tour)
    }
}

impl<G> TravellingSalesperson for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};
    use rand_pcg::Pcg64Mcg;

    fn complete_graph(matrix: &[Vec<f64>]) -> (Graph, Vec<f64>) {
        let mut graph = Graph::undirected();
        let mut weights = Vec::new();
        for (u, row) in matrix.iter().enumerate() {
            for (v, &w) in row.iter().enumerate().skip(u + 1) {
                graph.add_weighted_edge(&mut weights, u as Node, v as Node, w);
            }
        }
        (graph, weights)
    }

    #[test]
    fn four_cities() {
        let (graph, weights) = complete_graph(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ]);

        let tour = graph.tsp(&weights).unwrap().unwrap();
        assert_eq!(tour.nodes, vec![0, 1, 3, 2, 0]);
        assert_eq!(tour.cost, 80.0);
    }

    #[test]
    fn sparse_graphs_have_no_tour() {
        let mut graph = Graph::undirected();
        graph.connect_path(0..4);
        assert_eq!(graph.tsp(&UnitWeights).unwrap(), None);
        assert_eq!(Graph::undirected().tsp(&UnitWeights).unwrap(), None);
    }

    #[test]
    fn one_and_two_vertices() {
        let single = Graph::new(GraphKind::Undirected, 1);
        let tour = single.tsp(&UnitWeights).unwrap().unwrap();
        assert_eq!(tour.nodes, vec![0, 0]);
        assert_eq!(tour.cost, 0.0);

        let pair = Graph::from_edges(GraphKind::Undirected, 2, [(0, 1)]);
        assert_eq!(pair.tsp(&UnitWeights).unwrap(), None);

        let (pair, weights) = {
            let mut graph = Graph::directed();
            let mut weights = Vec::new();
            graph.add_weighted_edge(&mut weights, 0, 1, 2.0);
            graph.add_weighted_edge(&mut weights, 1, 0, 3.0);
            (graph, weights)
        };
        let tour = pair.tsp(&weights).unwrap().unwrap();
        assert_eq!(tour.nodes, vec![0, 1, 0]);
        assert_eq!(tour.cost, 5.0);
    }

    #[test]
    fn directed_cycle_is_the_only_tour() {
        let mut graph = Graph::directed();
        graph.connect_cycle([0, 2, 1, 3]);
        graph.add_edge(0, 1);
        graph.add_edge(3, 2);

        let tour = graph.tsp(&UnitWeights).unwrap().unwrap();
        assert_eq!(tour.nodes, vec![0, 2, 1, 3, 0]);
        assert_eq!(tour.cost, 4.0);
    }

    #[test]
    fn agrees_with_brute_force() {
        let rng = &mut Pcg64Mcg::seed_from_u64(37);
        let distr = Uniform::new(1.0, 20.0).unwrap();

        for n in [3, 5, 7] {
            let matrix = (0..n)
                .map(|_| (0..n).map(|_| distr.sample(rng)).collect_vec())
                .collect_vec();
            let (graph, weights) = complete_graph(&matrix);

            let expected = (1..n as Node)
                .permutations(n - 1)
                .filter_map(|perm| {
                    let nodes = std::iter::once(0).chain(perm).chain(std::iter::once(0)).collect_vec();
                    graph.path_cost(&weights, &nodes)
                })
                .min_by(f64::total_cmp)
                .unwrap();

            let tour = graph.tsp(&weights).unwrap().unwrap();
            assert!((tour.cost - expected).abs() < 1e-9);
            assert_eq!(tour.nodes.len(), n + 1);
            assert!(tour.nodes[..n].iter().all_unique());
        }
    }
}
