/*!
# Cycle Enumeration

DFS-based cycle detection. Whenever the search meets an already visited vertex `v` from the
current vertex `u` (other than through the edge it arrived by), the fewest-hop path `v -> u`
is computed and closed into the cycle `v, .., u, v`. For undirected graphs the path search
runs on a copy without the edge `{u, v}`, forcing it the long way around.

Each cycle is reported once: cycles with the same vertex set (rotations and reflections)
are considered equal. This is not a complete enumeration of all simple cycles; it reports
at most one cycle per non-tree edge of the search.
*/

use fxhash::FxHashSet;
use tracing::debug;

use super::*;

/// Configurable cycle search
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleSearch {
    through: Option<Node>,
}

impl CycleSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report cycles containing `u`
    pub fn set_through(&mut self, u: Option<Node>) {
        self.through = u;
    }

    /// Only report cycles containing `u`
    pub fn through(mut self, u: Node) -> Self {
        self.set_through(Some(u));
        self
    }

    /// Returns all cycles found, each closed (first vertex == last vertex)
    pub fn run<G>(&self, graph: &G) -> Result<Vec<Vec<Node>>>
    where
        G: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone,
    {
        if let Some(u) = self.through {
            graph.check_node(u)?;
        }

        let mut visited = graph.vertex_bitset_unset();
        let mut signatures: FxHashSet<Vec<Node>> = FxHashSet::default();
        let mut cycles = Vec::new();

        for root in graph.vertices() {
            if visited.get_bit(root) {
                continue;
            }

            let mut stack: Vec<(Node, Node)> = vec![(root, INVALID_NODE)];
            while let Some((u, parent)) = stack.pop() {
                if visited.set_bit(u) {
                    continue;
                }

                for v in graph.neighbors_of(u) {
                    if graph.is_undirected() && v == parent {
                        continue;
                    }
                    if !visited.get_bit(v) {
                        stack.push((v, u));
                        continue;
                    }

                    let Some(cycle) = close_cycle(graph, v, u)? else {
                        continue;
                    };

                    let mut signature = cycle[1..].to_vec();
                    signature.sort_unstable();
                    if signatures.insert(signature) {
                        cycles.push(cycle);
                    }
                }
            }
        }

        if let Some(u) = self.through {
            cycles.retain(|c| c.contains(&u));
        }

        debug!(cycles = cycles.len(), "cycle search");
        Ok(cycles)
    }
}

/// Computes the cycle `v, .., u, v` closed by the edge `(u, v)`, if any
fn close_cycle<G>(graph: &G, v: Node, u: Node) -> Result<Option<Vec<Node>>>
where
    G: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone,
{
    let path = if graph.is_undirected() {
        let mut working = graph.clone();
        working.try_remove_edge(u, v);
        working.shortest_path(&UnitWeights, v, u)?
    } else {
        graph.shortest_path(&UnitWeights, v, u)?
    };

    Ok(path.filter(|p| p.len() >= 2).map(|p| {
        let mut nodes = p.nodes;
        nodes.push(v);
        nodes
    }))
}

/// Cycle enumeration as a method on the graph
pub trait Cycles: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone {
    /// Returns the cycles found by a [`CycleSearch`], optionally only those through the vertex
    /// named `start`. Fails with [`GraphError::UnknownVertex`] if that name is absent.
    fn find_cycles(&self, start: Option<&str>) -> Result<Vec<Vec<Node>>>
    where
        Self: NamedVertices,
    {
        let mut search = CycleSearch::new();
        search.set_through(start.map(|name| self.resolve(name)).transpose()?);
        search.run(self)
    }
}

impl<G> Cycles for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder + GraphEdgeEditing + Clone {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;
    use itertools::Itertools;

    #[test]
    fn ring_of_four() {
        let graph = Graph::from_named_edges(
            GraphKind::Undirected,
            [("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")],
        );

        for start in [None, Some("a"), Some("b"), Some("c"), Some("d")] {
            let cycles = graph.find_cycles(start).unwrap();
            assert_eq!(cycles.len(), 1);
            assert_eq!(cycles[0].len(), 5);
            assert_eq!(cycles[0].first(), cycles[0].last());
            assert_eq!(cycles[0].iter().unique().count(), 4);
        }
    }

    #[test]
    fn directed_cycles() {
        let graph = Graph::from_edges(GraphKind::Directed, 5, [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        assert_eq!(graph.find_cycles(None).unwrap(), vec![vec![0, 1, 2, 0]]);
        assert!(graph.find_cycles(Some("4")).unwrap().is_empty());
        assert_eq!(
            graph.find_cycles(Some("x")),
            Err(GraphError::UnknownVertex("x".into()))
        );

        let dag = Graph::from_edges(GraphKind::Directed, 4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert!(dag.find_cycles(None).unwrap().is_empty());
    }

    #[test]
    fn trees_and_forests_have_no_cycles() {
        let mut graph = Graph::undirected();
        graph.connect_path(0..5);
        graph.connect_path([5, 6, 7]);
        assert!(graph.find_cycles(None).unwrap().is_empty());
    }

    #[test]
    fn disconnected_cycles_are_all_found() {
        let mut graph = Graph::undirected();
        graph.connect_cycle(0..3);
        graph.connect_cycle(3..7);

        let cycles = CycleSearch::new().run(&graph).unwrap();
        assert_eq!(cycles.len(), 2);
        assert_eq!(CycleSearch::new().through(5).run(&graph).unwrap().len(), 1);
    }

    #[test]
    fn cycles_are_closed_walks() {
        let mut graph = Graph::undirected();
        graph.connect_clique(&[0, 1, 2, 3, 4], false);

        let cycles = graph.find_cycles(None).unwrap();
        assert!(!cycles.is_empty());
        for cycle in &cycles {
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.len() >= 4);
            assert!(cycle.iter().tuple_windows().all(|(&u, &v)| graph.has_edge(u, v)));
        }
    }
}
