/*!
# A* Search

Heuristic-guided shortest paths. The fringe is a plain `Vec` kept sorted by f-score
(`g + h`) in ascending order; a pending vertex whose distance improves is taken out and
reinserted at its new position. Among equal f-scores the vertex inserted first is expanded first.

[`AStar::astar_dynamic`] lets the cost of an edge depend on the path that leads to it,
e.g. to penalize turns.
*/

use tracing::debug;

use super::*;

/// Reconstructs `start..=u` from a predecessor array with `pred[start] = start`
fn walk_back(pred: &[Node], start: Node, u: Node) -> Vec<Node> {
    let mut nodes = vec![u];
    let mut v = u;
    while v != start {
        v = pred[v as usize];
        nodes.push(v);
    }
    nodes.reverse();
    nodes
}

/// Inserts `u` with score `f` behind all entries with score `<= f`
fn enqueue(fringe: &mut Vec<(f64, Node)>, f: f64, u: Node) {
    if let Some(pos) = fringe.iter().position(|&(_, w)| w == u) {
        fringe.remove(pos);
    }
    let at = fringe.partition_point(|&(g, _)| g <= f);
    fringe.insert(at, (f, u));
}

fn search<G, C, H>(
    graph: &G,
    mut cost: C,
    start: Node,
    goal: Node,
    mut heuristic: H,
    track_prefix: bool,
) -> Result<Option<Path>>
where
    G: AdjacencyList,
    C: FnMut(&[Node], EdgeId, Node) -> f64,
    H: FnMut(Node) -> f64,
{
    graph.check_node(start)?;
    graph.check_node(goal)?;

    let mut dist = vec![f64::INFINITY; graph.len()];
    let mut pred = vec![INVALID_NODE; graph.len()];
    let mut closed = graph.vertex_bitset_unset();
    dist[start as usize] = 0.0;
    pred[start as usize] = start;

    let mut fringe = vec![(heuristic(start), start)];
    let mut prefix = Vec::new();

    while !fringe.is_empty() {
        let (_, u) = fringe.remove(0);
        if u == goal {
            let path = Path {
                nodes: walk_back(&pred, start, goal),
                cost: dist[goal as usize],
            };
            debug!(start, goal, cost = path.cost, hops = path.len() - 1, "A* reached goal");
            return Ok(Some(path));
        }

        closed.set_bit(u);
        if track_prefix {
            prefix = walk_back(&pred, start, u);
        }

        for (e, v) in graph.out_edges_of(u) {
            if closed.get_bit(v) {
                continue;
            }

            let weight = cost(&prefix, e, v);
            if weight.is_nan() || weight < 0.0 {
                return Err(GraphError::NegativeWeight { edge: e, weight });
            }

            let alt = dist[u as usize] + weight;
            if alt < dist[v as usize] {
                dist[v as usize] = alt;
                pred[v as usize] = u;
                enqueue(&mut fringe, alt + heuristic(v), v);
            }
        }
    }

    debug!(start, goal, "A* exhausted the fringe");
    Ok(None)
}

/// A* search as a method on the graph
pub trait AStar: AdjacencyList + EdgeLookup + GraphEdgeOrder {
    /// Computes a path from `start` to `goal` guided by `heuristic`, an estimate of the
    /// remaining cost from a vertex to `goal`. The result is a cheapest path if the heuristic
    /// never overestimates and is consistent.
    fn astar<W, H>(&self, weights: &W, start: Node, goal: Node, heuristic: H) -> Result<Option<Path>>
    where
        W: EdgeWeights + ?Sized,
        H: FnMut(Node) -> f64,
    {
        self.check_non_negative_weights(weights)?;
        search(self, |_, e, _| weights.weight(e), start, goal, heuristic, false)
    }

    /// As [`AStar::astar`], but edge costs are computed by `cost(prefix, e, v)` where `prefix`
    /// is the path from `start` to the source of `e` (both included) and `v` the target of `e`.
    /// Fails with [`GraphError::NegativeWeight`] if `cost` returns a negative value.
    fn astar_dynamic<C, H>(&self, cost: C, start: Node, goal: Node, heuristic: H) -> Result<Option<Path>>
    where
        C: FnMut(&[Node], EdgeId, Node) -> f64,
        H: FnMut(Node) -> f64,
    {
        search(self, cost, start, goal, heuristic, true)
    }
}

impl<G> AStar for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};
    use rand_pcg::Pcg64Mcg;

    fn diamond() -> Graph {
        Graph::from_edges(GraphKind::Directed, 4, [(0, 1), (0, 2), (1, 3), (2, 3)])
    }

    #[test]
    fn static_weights() {
        let graph = diamond();
        let path = graph.astar(&UnitWeights, 0, 3, |_| 0.0).unwrap().unwrap();
        assert_eq!(path.nodes, vec![0, 1, 3]);
        assert_eq!(path.cost, 2.0);

        assert_eq!(graph.astar(&UnitWeights, 3, 0, |_| 0.0).unwrap(), None);
        assert_eq!(
            graph.astar(&UnitWeights, 2, 2, |_| 0.0).unwrap(),
            Some(Path::trivial(2))
        );
    }

    #[test]
    fn dynamic_costs_see_the_prefix() {
        let graph = diamond();
        let path = graph
            .astar_dynamic(
                |prefix, _, _| if prefix.contains(&1) { 10.0 } else { 1.0 },
                0,
                3,
                |_| 0.0,
            )
            .unwrap()
            .unwrap();
        assert_eq!(path.nodes, vec![0, 2, 3]);
        assert_eq!(path.cost, 2.0);

        assert!(matches!(
            graph.astar_dynamic(|_, _, _| -1.0, 0, 3, |_| 0.0),
            Err(GraphError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn fringe_stays_sorted() {
        let mut fringe = Vec::new();
        enqueue(&mut fringe, 3.0, 0);
        enqueue(&mut fringe, 1.0, 1);
        enqueue(&mut fringe, 3.0, 2);
        enqueue(&mut fringe, 0.5, 0);
        assert_eq!(fringe, vec![(0.5, 0), (1.0, 1), (3.0, 2)]);
    }

    #[test]
    fn grid_agrees_with_dijkstra() {
        const SIDE: Node = 6;
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        let distr = Uniform::new(1.0, 5.0).unwrap();

        let mut graph = Graph::undirected();
        let mut weights = Vec::new();
        for x in 0..SIDE {
            for y in 0..SIDE {
                let u = x * SIDE + y;
                if x + 1 < SIDE {
                    graph.add_weighted_edge(&mut weights, u, u + SIDE, distr.sample(rng));
                }
                if y + 1 < SIDE {
                    graph.add_weighted_edge(&mut weights, u, u + 1, distr.sample(rng));
                }
            }
        }

        let goal = SIDE * SIDE - 1;
        let manhattan = |u: Node| ((SIDE - 1 - u / SIDE) + (SIDE - 1 - u % SIDE)) as f64;

        for start in [0, 7, 20] {
            let astar = graph.astar(&weights, start, goal, manhattan).unwrap().unwrap();
            let dijkstra = graph.shortest_path(&weights, start, goal).unwrap().unwrap();
            assert!((astar.cost - dijkstra.cost).abs() < 1e-9);
            assert_eq!(graph.path_cost(&weights, &astar.nodes), Some(astar.cost));
        }
    }
}
