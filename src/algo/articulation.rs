/*!
# Articulation Points and Bridges

Tarjan's low-link search on undirected graphs. A single iterative DFS fills the discovery
times and low-links of all vertices; articulation points and bridges are read off the same
search:
- a non-root vertex `p` with a DFS child `u` and `low[u] >= disc[p]` is an articulation point,
- the root is an articulation point iff it has at least two DFS children,
- the tree edge `{p, u}` is a bridge iff `low[u] > disc[p]`.
*/

use super::*;

/// Result of a low-link search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LowLinks {
    /// Articulation points in ascending order
    pub articulation_points: Vec<Node>,
    /// Bridges as normalized edges in ascending order
    pub bridges: Vec<Edge>,
}

struct LowLinkSearch<'a, G> {
    graph: &'a G,
    /// Discovery time, `0` for undiscovered vertices
    disc: Vec<Node>,
    low: Vec<Node>,
    time: Node,
    points: NodeBitSet,
    bridges: Vec<Edge>,
}

impl<'a, G> LowLinkSearch<'a, G>
where
    G: AdjacencyList,
{
    fn new(graph: &'a G) -> Self {
        Self {
            graph,
            disc: vec![0; graph.len()],
            low: vec![0; graph.len()],
            time: 0,
            points: graph.vertex_bitset_unset(),
            bridges: Vec::new(),
        }
    }

    fn discover(&mut self, u: Node) {
        self.time += 1;
        self.disc[u as usize] = self.time;
        self.low[u as usize] = self.time;
    }

    fn compute(mut self) -> LowLinks {
        for root in self.graph.vertices() {
            if self.disc[root as usize] == 0 {
                self.search_from(root);
            }
        }

        let mut bridges = self.bridges;
        bridges.sort_unstable();
        LowLinks {
            articulation_points: self.points.iter_set_bits().collect(),
            bridges,
        }
    }

    fn search_from(&mut self, root: Node) {
        let graph = self.graph;
        self.discover(root);
        let mut root_children = 0;

        // frames are (parent, vertex, remaining neighbors)
        let mut stack = vec![(INVALID_NODE, root, graph.neighbors_of(root))];
        while let Some((parent, u, neighbors)) = stack.last_mut() {
            let (parent, u) = (*parent, *u);

            if let Some(v) = neighbors.next() {
                if v == parent {
                    continue;
                }

                if self.disc[v as usize] == 0 {
                    self.discover(v);
                    stack.push((u, v, graph.neighbors_of(v)));
                } else {
                    self.low[u as usize] = self.low[u as usize].min(self.disc[v as usize]);
                }
                continue;
            }

            stack.pop();
            if parent == INVALID_NODE {
                continue;
            }

            self.low[parent as usize] = self.low[parent as usize].min(self.low[u as usize]);
            if self.low[u as usize] > self.disc[parent as usize] {
                self.bridges.push(Edge(parent, u).normalized());
            }

            if parent == root {
                root_children += 1;
            } else if self.low[u as usize] >= self.disc[parent as usize] {
                self.points.set_bit(parent);
            }
        }

        if root_children > 1 {
            self.points.set_bit(root);
        }
    }
}

/// Articulation points and bridges of undirected graphs
pub trait ArticulationPoints: AdjacencyList {
    /// Runs the low-link search once and returns both articulation points and bridges.
    /// Fails with [`GraphError::WrongGraphKind`] on directed graphs.
    fn low_links(&self) -> Result<LowLinks> {
        self.require_kind("articulation_points", GraphKind::Undirected)?;
        Ok(LowLinkSearch::new(self).compute())
    }

    /// Returns all vertices whose removal increases the number of connected components
    fn articulation_points(&self) -> Result<Vec<Node>> {
        Ok(self.low_links()?.articulation_points)
    }

    /// Returns all edges whose removal increases the number of connected components
    fn bridges(&self) -> Result<Vec<Edge>> {
        Ok(self.low_links()?.bridges)
    }
}

impl<G> ArticulationPoints for G where G: AdjacencyList {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn bridges_in_path() {
        for n in [2, 5, 10, 15] {
            let mut graph = Graph::undirected();
            graph.connect_path(0..n);

            assert_eq!(graph.bridges().unwrap(), graph.ordered_edges(true));
            assert_eq!(graph.articulation_points().unwrap(), (1..n - 1).collect_vec());
        }
    }

    #[test]
    fn bridge_in_example() {
        let graph = Graph::from_edges(
            GraphKind::Undirected,
            6,
            [(0, 1), (0, 2), (2, 1), (1, 3), (3, 4), (4, 5), (5, 3)],
        );

        let links = graph.low_links().unwrap();
        assert_eq!(links.bridges, vec![Edge(1, 3)]);
        assert_eq!(links.articulation_points, vec![1, 3]);
    }

    #[test]
    fn cycles_and_directed_graphs() {
        let mut ring = Graph::undirected();
        ring.connect_cycle(0..6);
        assert!(ring.articulation_points().unwrap().is_empty());
        assert!(ring.bridges().unwrap().is_empty());

        let directed = Graph::from_edges(GraphKind::Directed, 3, [(0, 1), (1, 2)]);
        assert_eq!(
            directed.articulation_points(),
            Err(GraphError::WrongGraphKind {
                algorithm: "articulation_points",
                expected: GraphKind::Undirected
            })
        );
    }

    /// `u` is an articulation point iff its neighbors are not connected without `u`
    fn is_articulation_point(graph: &Graph, u: Node) -> bool {
        let neighbors = graph.neighbors_of(u).filter(|&w| w != u).collect_vec();
        let Some(&first) = neighbors.first() else {
            return false;
        };

        let mut bfs = graph.bfs(first).with_node_excluded(u);
        bfs.by_ref().for_each(drop);
        !neighbors.iter().all(|&w| bfs.did_visit_node(w))
    }

    #[test]
    fn agrees_with_brute_force() {
        let rng = &mut Pcg64Mcg::seed_from_u64(23);

        for n in [5, 20, 60] {
            for _ in 0..5 {
                let graph = Gnp::new().nodes(n).avg_deg(2.5).graph(GraphKind::Undirected, rng);
                let expected = graph
                    .vertices()
                    .filter(|&u| is_articulation_point(&graph, u))
                    .collect_vec();
                assert_eq!(graph.articulation_points().unwrap(), expected);

                for Edge(u, v) in graph.bridges().unwrap() {
                    let mut without = graph.clone();
                    without.remove_edge(u, v);
                    assert_eq!(without.bfs_path(u, v).unwrap(), None);
                }
            }
        }
    }
}
