/*!
# Shortest Paths

Single-source shortest paths with non-negative edge weights.

[`ShortestPath::dijkstra`] uses the classic `O(n^2)` vertex selection without a priority queue:
each round picks the unsettled vertex with the smallest tentative distance, ties going to the
vertex with the smallest index. The resulting [`ShortestPathTree`] stores
- `dist[v] = f64::INFINITY` and `pred[v] = INVALID_NODE` for unreachable vertices,
- `pred[start] = start`, so that path reconstruction can tell "reached the start" apart from
  "unreachable".
*/

use itertools::Itertools;
use tracing::debug;

use super::*;

/// A walk through the graph given by its vertices (both endpoints included) and its total cost
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<Node>,
    pub cost: f64,
}

impl Path {
    /// A path consisting of a single vertex
    pub fn trivial(u: Node) -> Self {
        Self {
            nodes: vec![u],
            cost: 0.0,
        }
    }

    /// Returns the number of vertices on the path
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over the consecutive vertex pairs of the path
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().tuple_windows().map(|(&u, &v)| Edge(u, v))
    }

    /// Returns *true* if no vertex occurs twice on the path
    pub fn is_simple(&self) -> bool {
        self.nodes.iter().all_unique()
    }
}

/// Distances and predecessors of a single-source shortest path computation
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    pub start: Node,
    pub dist: Vec<f64>,
    pub pred: Vec<Node>,
}

impl ShortestPathTree {
    /// Returns *true* if `v` can be reached from the start vertex
    pub fn is_reachable(&self, v: Node) -> bool {
        self.pred[v as usize] != INVALID_NODE
    }

    /// Returns the shortest path from the start vertex to `v` or `None` if `v` is unreachable
    /// ** Panics if `v >= n` **
    pub fn path_to(&self, v: Node) -> Option<Path> {
        if !self.is_reachable(v) {
            return None;
        }

        let mut nodes = vec![v];
        let mut u = v;
        while u != self.start {
            u = self.pred[u as usize];
            nodes.push(u);
        }
        nodes.reverse();

        Some(Path {
            nodes,
            cost: self.dist[v as usize],
        })
    }
}

/// Dijkstra-based shortest paths
pub trait ShortestPath: AdjacencyList + EdgeLookup + GraphEdgeOrder {
    /// Computes shortest distances from `start` to all vertices.
    ///
    /// Fails if `start` is not a vertex or if `weights` is too short or contains negative values.
    fn dijkstra<W>(&self, weights: &W, start: Node) -> Result<ShortestPathTree>
    where
        W: EdgeWeights + ?Sized,
    {
        self.check_node(start)?;
        self.check_non_negative_weights(weights)?;

        let mut dist = vec![f64::INFINITY; self.len()];
        let mut pred = vec![INVALID_NODE; self.len()];
        let mut settled = self.vertex_bitset_unset();
        dist[start as usize] = 0.0;
        pred[start as usize] = start;

        while let Some(u) = self
            .vertices()
            .filter(|&u| !settled.get_bit(u) && dist[u as usize].is_finite())
            .min_by(|&a, &b| dist[a as usize].total_cmp(&dist[b as usize]))
        {
            settled.set_bit(u);
            for (e, v) in self.out_edges_of(u) {
                let alt = dist[u as usize] + weights.weight(e);
                if alt < dist[v as usize] {
                    dist[v as usize] = alt;
                    pred[v as usize] = u;
                }
            }
        }

        Ok(ShortestPathTree { start, dist, pred })
    }

    /// Returns a cheapest path from `start` to `end` or `None` if `end` is unreachable.
    /// If `start == end`, the single-vertex path of cost `0` is returned without a search.
    fn shortest_path<W>(&self, weights: &W, start: Node, end: Node) -> Result<Option<Path>>
    where
        W: EdgeWeights + ?Sized,
    {
        self.check_node(end)?;
        if start == end {
            self.check_node(start)?;
            return Ok(Some(Path::trivial(start)));
        }

        let path = self.dijkstra(weights, start)?.path_to(end);
        debug!(start, end, cost = path.as_ref().map(|p| p.cost), "shortest path");
        Ok(path)
    }

    /// As [`ShortestPath::shortest_path`] with vertices given by name.
    /// Unknown names yield `None`, just like unreachable targets.
    fn shortest_path_by_name<W>(&self, weights: &W, start: &str, end: &str) -> Result<Option<Path>>
    where
        W: EdgeWeights + ?Sized,
        Self: NamedVertices,
    {
        match (self.find_vertex(start), self.find_vertex(end)) {
            (Some(s), Some(t)) => self.shortest_path(weights, s, t),
            _ => Ok(None),
        }
    }
}

impl<G> ShortestPath for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};
    use rand_pcg::Pcg64Mcg;

    fn weighted_example() -> (Graph, Vec<f64>) {
        let mut graph = Graph::directed();
        let mut weights = Vec::new();
        for (u, v, w) in [
            (0, 1, 4.0),
            (0, 2, 1.0),
            (2, 1, 2.0),
            (1, 3, 1.0),
            (2, 3, 5.0),
            (3, 4, 3.0),
        ] {
            graph.add_weighted_edge(&mut weights, u, v, w);
        }
        graph.add_vertex("isolated").unwrap();
        (graph, weights)
    }

    #[test]
    fn dijkstra_distances() {
        let (graph, weights) = weighted_example();
        let tree = graph.dijkstra(&weights, 0).unwrap();

        assert_eq!(&tree.dist[..5], &[0.0, 3.0, 1.0, 4.0, 7.0]);
        assert_eq!(tree.dist[5], f64::INFINITY);
        assert_eq!(tree.pred, vec![0, 2, 0, 1, 3, INVALID_NODE]);
    }

    #[test]
    fn shortest_path_and_sentinels() {
        let (graph, weights) = weighted_example();

        let path = graph.shortest_path(&weights, 0, 4).unwrap().unwrap();
        assert_eq!(path.nodes, vec![0, 2, 1, 3, 4]);
        assert_eq!(path.cost, 7.0);
        assert_eq!(graph.path_cost(&weights, &path.nodes), Some(7.0));

        assert_eq!(graph.shortest_path(&weights, 0, 5).unwrap(), None);
        assert_eq!(
            graph.shortest_path(&weights, 3, 3).unwrap(),
            Some(Path::trivial(3))
        );

        let by_name = graph.shortest_path_by_name(&weights, "0", "4").unwrap();
        assert_eq!(by_name, Some(path.clone()));
        assert_eq!(graph.shortest_path_by_name(&weights, "0", "nope").unwrap(), None);

        // no hidden state carried between calls
        assert_eq!(graph.shortest_path(&weights, 0, 4).unwrap(), Some(path));
    }

    #[test]
    fn invalid_inputs() {
        let (graph, weights) = weighted_example();
        assert_eq!(
            graph.dijkstra(&weights[..3], 0),
            Err(GraphError::WeightLength {
                expected: 6,
                got: 3
            })
        );
        assert_eq!(
            graph.dijkstra(&weights, 10),
            Err(GraphError::BadIndex { index: 10, len: 6 })
        );

        let mut negative = weights.clone();
        negative[4] = -1.0;
        assert!(matches!(
            graph.dijkstra(&negative, 0),
            Err(GraphError::NegativeWeight { edge: 4, .. })
        ));
    }

    #[test]
    fn ties_go_to_lower_index() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3 have equal cost; 1 is settled first
        let graph = Graph::from_edges(GraphKind::Undirected, 4, [(0, 2), (0, 1), (2, 3), (1, 3)]);
        let path = graph.shortest_path(&UnitWeights, 0, 3).unwrap().unwrap();
        assert_eq!(path.nodes, vec![0, 1, 3]);
    }

    #[test]
    fn dijkstra_tree_is_consistent() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let distr = Uniform::new(0.0, 10.0).unwrap();

        for kind in [GraphKind::Directed, GraphKind::Undirected] {
            for n in [5, 20, 50] {
                let graph = Graph::from_edges(kind, n, Gnp::new().nodes(n).avg_deg(3.0).stream(rng));
                let weights: Vec<f64> = (0..graph.number_of_edge_slots())
                    .map(|_| distr.sample(rng))
                    .collect();

                let tree = graph.dijkstra(&weights, 0).unwrap();
                assert_eq!(tree.dist[0], 0.0);
                assert_eq!(tree.pred[0], 0);

                for v in graph.vertices().filter(|&v| v != 0 && tree.is_reachable(v)) {
                    let p = tree.pred[v as usize];
                    let e = graph.find_edge(p, v).unwrap();
                    assert_eq!(tree.dist[v as usize], tree.dist[p as usize] + weights[e as usize]);

                    for (e, w) in graph.out_edges_of(v) {
                        assert!(tree.dist[w as usize] <= tree.dist[v as usize] + weights[e as usize]);
                    }
                }
            }
        }
    }
}
