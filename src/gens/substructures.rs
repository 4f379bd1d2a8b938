/*!
# Substructure Generators

Utility methods to add **paths**, **cycles** and **cliques** to an already existing graph.
These are useful to build test instances with known structure.
*/

use itertools::Itertools;

use super::*;

/// Known structures inserted into an existing graph
pub trait GeneratorSubstructures {
    /// Adds an edge between every two consecutive nodes
    fn connect_path<P>(&mut self, nodes_on_path: P)
    where
        P: IntoIterator<Item = Node>;

    /// As [`GeneratorSubstructures::connect_path`], closed by an edge from the last node to the first
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C)
    where
        C: IntoIterator<Item = Node>;

    /// Connects every pair of distinct nodes; with `with_loops` every node also gets a self-loop.
    /// Undirected graphs receive one edge per pair.
    fn connect_clique(&mut self, nodes: &[Node], with_loops: bool);
}

impl<G> GeneratorSubstructures for G
where
    G: GraphEdgeEditing + GraphType,
{
    fn connect_path<P>(&mut self, nodes_on_path: P)
    where
        P: IntoIterator<Item = Node>,
    {
        for (u, v) in nodes_on_path.into_iter().tuple_windows() {
            self.add_edge(u, v);
        }
    }

    fn connect_cycle<C>(&mut self, nodes_in_cycle: C)
    where
        C: IntoIterator<Item = Node>,
    {
        let nodes = nodes_in_cycle.into_iter().collect_vec();
        let Some(&first) = nodes.first() else {
            return;
        };

        for (&u, &v) in nodes.iter().chain(std::iter::once(&first)).tuple_windows() {
            self.add_edge(u, v);
        }
    }

    fn connect_clique(&mut self, nodes: &[Node], with_loops: bool) {
        for &u in nodes {
            for &v in nodes {
                let e = Edge(u, v);
                if (!with_loops && e.is_loop()) || (self.is_undirected() && !e.is_normalized()) {
                    continue;
                }

                self.add_edge(u, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_path() {
        let mut g = Graph::new(GraphKind::Directed, 6);
        g.connect_path([]);
        g.connect_path([1]);
        assert_eq!(g.number_of_edges(), 0);

        g.connect_path([0, 3, 1, 4]);
        assert_eq!(g.edge_list(), vec![Edge(0, 3), Edge(1, 4), Edge(3, 1)]);
    }

    #[test]
    fn test_connect_cycle() {
        let mut g = Graph::new(GraphKind::Directed, 6);
        g.connect_cycle([1]);
        assert!(g.has_self_loop(1));

        let mut g = Graph::new(GraphKind::Undirected, 6);
        g.connect_cycle([0, 3, 1, 4]);
        assert_eq!(g.number_of_edges(), 4);
        assert_eq!(g.neighbors_of(0).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_connect_clique() {
        let mut g = Graph::new(GraphKind::Undirected, 6);
        g.connect_clique(&[1, 2, 4], false);
        assert_eq!(g.number_of_edges(), 3);

        let mut g = Graph::new(GraphKind::Directed, 6);
        g.connect_clique(&[1, 2, 4], true);
        assert_eq!(g.number_of_edges(), 9);
    }
}
