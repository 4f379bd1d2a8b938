/*!
# Probability Propagation

Every edge carries the probability that a signal at its source reaches its target. The
probability of reaching a vertex is evaluated on the union of all simple `s-t` paths (as
enumerated by [`KShortestPaths`]), processed in topological order:
- the source is reached with probability `1`,
- a vertex with one incoming path edge `(p, u)` is reached with `P(p) * p(p, u)`,
- a vertex with two incoming path edges combines both arrivals `a` and `b` as `a + b - a * b`.

More than two incoming path edges are not supported. If the paths overlap in opposite
directions, the union is not acyclic and no order exists.

Computed values are written to a vertex attribute slot so that reporting layers (e.g. the DOT
writer) can read them back. Before evaluation, the slot of every vertex on a path is reset to
`"-1"`; both `"-1"` and `""` mean *not computed*.
*/

use itertools::Itertools;
use tracing::debug;

use super::*;
use crate::utils::Probability;

/// Marker written to the attribute slot of vertices not computed yet
pub const NOT_COMPUTED: &str = "-1";

/// Configurable probability propagation
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbabilityPropagation {
    slot: usize,
}

impl ProbabilityPropagation {
    /// Creates a propagation writing to vertex attribute slot `0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vertex attribute slot receiving the computed probabilities
    pub fn set_slot(&mut self, slot: usize) {
        self.slot = slot;
    }

    /// Chainable version of [`ProbabilityPropagation::set_slot`]
    pub fn slot(mut self, slot: usize) -> Self {
        self.set_slot(slot);
        self
    }

    /// Reads the probability memoized for `u`, if any
    pub fn memoized<G: AttributeOverlay>(&self, graph: &G, u: Node) -> Option<f64> {
        let value = graph.vertex_attribute(u, self.slot);
        if value.is_empty() || value == NOT_COMPUTED {
            return None;
        }
        value.parse().ok()
    }

    /// Returns the probability that a signal starting at `source` reaches `target`.
    ///
    /// Fails with
    /// - [`GraphError::WrongGraphKind`] on undirected graphs,
    /// - [`GraphError::InvalidProbability`] if a live edge carries a value outside `[0, 1]`,
    /// - [`GraphError::NotAcyclic`] if the `source-target` paths form a cycle,
    /// - [`GraphError::UnsupportedInput`] if a vertex has more than two incoming path edges.
    pub fn reach_probability<G, W>(
        &self,
        graph: &mut G,
        probs: &W,
        source: Node,
        target: Node,
    ) -> Result<f64>
    where
        G: DirectedAdjacencyList
            + EdgeLookup
            + GraphEdgeOrder
            + GraphEdgeEditing
            + AttributeOverlay
            + Clone,
        W: EdgeWeights + ?Sized,
    {
        graph.require_kind("reach_probability", GraphKind::Directed)?;
        graph.check_node(source)?;
        graph.check_node(target)?;
        graph.check_weights(probs)?;
        for edge in graph.edge_ids() {
            let value = probs.weight(edge);
            if !value.is_valid_probability() {
                return Err(GraphError::InvalidProbability { edge, value });
            }
        }

        if source == target {
            graph.set_vertex_attribute(source, self.slot, "1");
            return Ok(1.0);
        }

        let paths = KShortestPaths::new().run(&*graph, &UnitWeights, source, target)?;
        if paths.is_empty() {
            graph.set_vertex_attribute(target, self.slot, "0");
            return Ok(0.0);
        }

        // union of all path edges, as a subgraph on the same vertex indices
        let mut union = Graph::new(GraphKind::Directed, graph.number_of_nodes());
        let mut origin = Vec::new();
        let mut on_path = graph.vertex_bitset_unset();
        for path in &paths {
            for Edge(u, v) in path.edges() {
                on_path.set_bit(u);
                on_path.set_bit(v);
                if !union.has_edge(u, v) {
                    let id = union.add_edge(u, v) as usize;
                    if origin.len() <= id {
                        origin.resize(id + 1, None);
                    }
                    origin[id] = graph.find_edge(u, v);
                }
            }
        }

        let order = union.topo_search().collect_vec();
        if order.len() < union.len() {
            let mut ordered = union.vertex_bitset_unset();
            order.iter().for_each(|&u| {
                ordered.set_bit(u);
            });
            let vertex = on_path
                .iter_set_bits()
                .find(|&u| !ordered.get_bit(u))
                .unwrap_or(source);
            return Err(GraphError::NotAcyclic(vertex));
        }

        for u in on_path.iter_set_bits() {
            graph.set_vertex_attribute(u, self.slot, NOT_COMPUTED);
        }

        let mut reached = vec![0.0; union.len()];
        for u in order.into_iter().filter(|&u| on_path.get_bit(u)) {
            let arrivals = union
                .in_edges_of(u)
                .map(|(e, p)| {
                    let p_edge = origin[e as usize].map_or(0.0, |orig| probs.weight(orig));
                    reached[p as usize] * p_edge
                })
                .collect_vec();

            reached[u as usize] = match arrivals.as_slice() {
                [] => 1.0,
                [a] => *a,
                [a, b] => a + b - a * b,
                _ => {
                    return Err(GraphError::UnsupportedInput(format!(
                        "vertex {u} has {} incoming path edges, at most 2 can be combined",
                        arrivals.len()
                    )));
                }
            };
            graph.set_vertex_attribute(u, self.slot, reached[u as usize].to_string());
        }

        debug!(
            source,
            target,
            paths = paths.len(),
            probability = reached[target as usize],
            "reach probability"
        );
        Ok(reached[target as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(edges: &[(Node, Node, f64)]) -> (Graph, Vec<f64>) {
        let mut graph = Graph::directed();
        let mut probs = Vec::new();
        for &(u, v, p) in edges {
            graph.add_weighted_edge(&mut probs, u, v, p);
        }
        (graph, probs)
    }

    #[test]
    fn chain_multiplies() {
        let (mut graph, probs) = weighted(&[(0, 1, 0.9), (1, 2, 0.5)]);
        let p = ProbabilityPropagation::new()
            .reach_probability(&mut graph, &probs, 0, 2)
            .unwrap();
        assert!((p - 0.45).abs() < 1e-12);
    }

    #[test]
    fn diamond_combines_two_arrivals() {
        let (mut graph, probs) =
            weighted(&[(0, 1, 0.5), (0, 2, 0.5), (1, 3, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);
        let propagation = ProbabilityPropagation::new().slot(2);

        let p = propagation
            .reach_probability(&mut graph, &probs, 0, 3)
            .unwrap();
        assert_eq!(p, 0.75);

        assert_eq!(graph.vertex_attribute(3, 2), "0.75");
        assert_eq!(graph.vertex_attribute(0, 2), "1");
        assert_eq!(propagation.memoized(&graph, 1), Some(0.5));
        assert_eq!(propagation.memoized(&graph, 4), None);
        assert_eq!(graph.vertex_attribute(3, 0), "");
    }

    #[test]
    fn branch_off_the_shortest_path() {
        // 0-3-5 is the shortest path; 0-1-4-5 and 0-2-4-5 join at 4 first
        let (mut graph, probs) = weighted(&[
            (0, 1, 0.5),
            (0, 2, 0.5),
            (0, 3, 0.5),
            (1, 4, 1.0),
            (2, 4, 1.0),
            (3, 5, 1.0),
            (4, 5, 1.0),
        ]);
        let propagation = ProbabilityPropagation::new();

        let p = propagation
            .reach_probability(&mut graph, &probs, 0, 5)
            .unwrap();
        assert!((p - 0.875).abs() < 1e-12);
        assert_eq!(propagation.memoized(&graph, 4), Some(0.75));
        assert_eq!(propagation.memoized(&graph, 3), Some(0.5));
    }

    #[test]
    fn unreachable_and_trivial() {
        let (mut graph, probs) = weighted(&[(0, 1, 0.3), (2, 1, 0.3)]);
        let propagation = ProbabilityPropagation::new();

        assert_eq!(
            propagation.reach_probability(&mut graph, &probs, 0, 2),
            Ok(0.0)
        );
        assert_eq!(
            propagation.reach_probability(&mut graph, &probs, 1, 1),
            Ok(1.0)
        );
    }

    #[test]
    fn rejected_inputs() {
        let (mut graph, probs) = weighted(&[(0, 1, 1.5)]);
        assert_eq!(
            ProbabilityPropagation::new().reach_probability(&mut graph, &probs, 0, 1),
            Err(GraphError::InvalidProbability {
                edge: 0,
                value: 1.5
            })
        );

        let (mut graph, probs) =
            weighted(&[(0, 1, 0.5), (0, 2, 0.5), (0, 3, 0.5), (1, 4, 0.5), (2, 4, 0.5), (3, 4, 0.5)]);
        assert!(matches!(
            ProbabilityPropagation::new().reach_probability(&mut graph, &probs, 0, 4),
            Err(GraphError::UnsupportedInput(_))
        ));

        let (mut graph, probs) = weighted(&[
            (0, 1, 0.5),
            (0, 2, 0.5),
            (1, 2, 0.5),
            (2, 1, 0.5),
            (1, 3, 0.5),
            (2, 3, 0.5),
        ]);
        assert_eq!(
            ProbabilityPropagation::new().reach_probability(&mut graph, &probs, 0, 3),
            Err(GraphError::NotAcyclic(1))
        );

        let mut undirected = Graph::undirected();
        undirected.add_edge(0, 1);
        assert!(matches!(
            ProbabilityPropagation::new().reach_probability(&mut undirected, &UnitWeights, 0, 1),
            Err(GraphError::WrongGraphKind { .. })
        ));
    }
}
