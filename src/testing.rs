/// Exercises the basic graph traits against a bitset adjacency matrix on random inputs.
/// Instantiated once per graph kind.
macro_rules! test_graph_ops {
    ($env:ident, $kind:ident, $undirected:literal, ($($trait:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{edge::*, node::*, ops::*, repr::*, testing::test_graph_ops};
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;
            use itertools::Itertools;
            use stream_bitset::prelude::*;

            /// Creates a list of at most `m_ub` random edges for nodes `0..n`
            fn random_edges<R: Rng>(rng: &mut R, n: NumNodes, m_ub: NumEdges) -> Vec<Edge> {
                let mut edges: Vec<Edge> = (0..m_ub).map(|_| {
                    let u = rng.random_range(0..n);
                    let v = rng.random_range(0..n);

                    if $undirected {
                        Edge(u, v).normalized()
                    } else {
                        Edge(u, v)
                    }
                }).collect_vec();
                edges.sort_unstable();
                edges.dedup();

                edges
            }

            $(
                test_graph_ops!($kind<$undirected>: $trait);
            )*
        }
    };
    ($kind:ident<$undirected:literal>: GraphNew) => {
        #[test]
        fn graph_new() {
            for n in 1..50 {
                let graph = Graph::new(GraphKind::$kind, n);

                assert_eq!(graph.number_of_edges(), 0);
                assert_eq!(graph.number_of_edge_slots(), 0);
                assert_eq!(graph.number_of_nodes(), n);
                assert_eq!(graph.kind(), GraphKind::$kind);

                assert_eq!(graph.vertices_range().len(), n as usize);
                assert_eq!(graph.vertices().collect_vec(), (0..n).collect_vec());
                assert_eq!(graph.names_of(0..n), (0..n).map(|u| u.to_string()).collect_vec());
            }
        }
    };
    ($kind:ident<$undirected:literal>: AdjacencyList) => {
        #[test]
        fn test_adjacency_list() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..10 {
                        let mut edges = random_edges(rng, n, m_ub as NumEdges);

                        let mut adj_matrix: Vec<NodeBitSet> = vec![NodeBitSet::new(n); n as usize];
                        for &Edge(u, v) in &edges {
                            adj_matrix[u as usize].set_bit(v);
                            if $undirected {
                                adj_matrix[v as usize].set_bit(u);
                            }
                        }

                        let graph = Graph::from_edges(GraphKind::$kind, n, edges.iter());

                        edges.sort_unstable();
                        let m = edges.len() as NumEdges;

                        assert_eq!(graph.number_of_nodes(), n);
                        assert_eq!(graph.number_of_edges(), m);
                        assert_eq!(graph.ordered_edges($undirected), edges);

                        let mut edge_list = graph.edge_list();
                        edge_list.sort_unstable();
                        assert_eq!(edge_list, edges);

                        for u in 0..n {
                            assert_eq!(graph.neighbors_of_as_bitset(u), adj_matrix[u as usize]);
                            assert_eq!(graph.degree_of(u), adj_matrix[u as usize].cardinality());
                            for v in graph.neighbors_of(u) {
                                let e = graph.find_edge(u, v).unwrap();
                                assert_eq!(graph.endpoints(e), Some(Edge(u, v)));
                            }
                        }
                    }
                }
            }
        }
    };
    ($kind:ident<$undirected:literal>: DirectedAdjacencyList) => {
        #[test]
        fn test_directed_adjacency_list() {
            assert!(!$undirected);

            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..10 {
                        let edges = random_edges(rng, n, m_ub as NumEdges);

                        let mut adj_matrix_in: Vec<NodeBitSet> = vec![NodeBitSet::new(n); n as usize];
                        for &Edge(u, v) in &edges {
                            adj_matrix_in[v as usize].set_bit(u);
                        }

                        let graph = Graph::from_edges(GraphKind::$kind, n, edges.iter());

                        for u in 0..n {
                            let in_nbs = NodeBitSet::new_with_bits_set(n, graph.in_neighbors_of(u));
                            assert_eq!(in_nbs, adj_matrix_in[u as usize]);
                            assert_eq!(graph.in_degree_of(u), adj_matrix_in[u as usize].cardinality());
                        }
                    }
                }
            }
        }
    };
    ($kind:ident<$undirected:literal>: GraphEdgeEditing) => {
        #[test]
        fn test_graph_edge_editing() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..10 {
                        let edges = random_edges(rng, n, m_ub as NumEdges);

                        let mut graph = Graph::new(GraphKind::$kind, n);

                        let mut adj_matrix: Vec<NodeBitSet> = vec![NodeBitSet::new(n); n as usize];

                        for Edge(u, v) in edges {
                            adj_matrix[u as usize].set_bit(v);
                            graph.add_edge(u, v);

                            if $undirected {
                                adj_matrix[v as usize].set_bit(u);
                            }
                        }

                        let rng = &mut Pcg64Mcg::seed_from_u64(4);

                        let slots = graph.number_of_edge_slots();
                        let mut m = graph.number_of_edges();
                        for _ in 0..(m / 2) {
                            let u = rng.random_range(0..n);
                            let v = rng.random_range(0..n);

                            if adj_matrix[u as usize].clear_bit(v) {
                                assert!(graph.try_remove_edge(u, v));
                                m -= 1;

                                if $undirected && u != v {
                                    assert!(adj_matrix[v as usize].clear_bit(u));
                                }
                            } else {
                                assert!(!graph.try_remove_edge(u, v));
                            }

                            assert_eq!(m, graph.number_of_edges());
                        }
                        assert_eq!(slots, graph.number_of_edge_slots());
                        assert_eq!(graph.edge_ids().count() as NumEdges, graph.edges(false).count() as NumEdges);

                        for u in 0..n {
                            graph.remove_edges_at_node(u);
                        }
                        assert!(graph.is_singleton());
                    }
                }
            }
        }
    };
}

pub(crate) use test_graph_ops;
