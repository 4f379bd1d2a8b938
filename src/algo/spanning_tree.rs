/*!
# Spanning Trees and Tours

[`SpanningTrees::spanning_tree`] grows a tree Prim-style from a root: in every step all edges
leaving the tree are scanned and the globally cheapest one is added (ties go to the first
edge found when scanning tree vertices by index). No priority queue is involved.

[`SpanningTrees::tour_nodes`] builds a walk visiting every vertex on top of such trees.
It is a heuristic: the walk follows the tree depth-first and, when it gets stuck, jumps to
the next unvisited leaf along a fewest-hop path of the original graph. Every root is tried
until one yields a walk without revisits.
*/

use tracing::{debug, trace};

use super::*;

/// A tree spanning all vertices of a graph
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningTree {
    pub root: Node,
    /// Tree edges oriented away from the root, in order of insertion
    pub edges: Vec<Edge>,
    /// Ids of the tree edges in the original graph
    pub edge_ids: Vec<EdgeId>,
    pub cost: f64,
}

impl SpanningTree {
    /// Materializes the tree as graph on the vertex set of `graph`
    pub fn to_graph(&self, graph: &Graph) -> Graph {
        graph.with_edges_of(self.edges.iter())
    }

    /// Returns the children of every vertex in the order they were attached
    fn children(&self, n: NumNodes) -> Vec<Vec<Node>> {
        let mut children = vec![Vec::new(); n as usize];
        for &Edge(u, v) in &self.edges {
            children[u as usize].push(v);
        }
        children
    }
}

/// A walk through all vertices found by [`SpanningTrees::tour_nodes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    pub nodes: Vec<Node>,
    /// Number of steps entering an already visited vertex
    pub revisits: usize,
    /// Number of vertices the walk never reached
    pub unvisited: usize,
}

impl Tour {
    /// Returns *true* if the tour visits every vertex exactly once
    pub fn is_perfect(&self) -> bool {
        self.revisits == 0 && self.unvisited == 0
    }
}

/// Builds one tour on top of `tree`, starting at its root
fn walk_tree<G>(graph: &G, tree: &SpanningTree) -> Result<Tour>
where
    G: AdjacencyList,
{
    let children = tree.children(graph.number_of_nodes());
    let leaves: Vec<Node> = graph
        .vertices()
        .filter(|&u| u != tree.root && children[u as usize].is_empty())
        .collect();

    let mut visited = graph.vertex_bitset_unset();
    visited.set_bit(tree.root);
    let mut nodes = vec![tree.root];
    let mut revisits = 0;
    let mut current = tree.root;

    loop {
        if let Some(&v) = children[current as usize]
            .iter()
            .find(|&&v| !visited.get_bit(v))
        {
            visited.set_bit(v);
            nodes.push(v);
            current = v;
            continue;
        }

        // stuck: jump to the first unvisited leaf, or any unvisited vertex if all leaves are done
        let Some(target) = leaves
            .iter()
            .copied()
            .find(|&u| !visited.get_bit(u))
            .or_else(|| graph.vertices().find(|&u| !visited.get_bit(u)))
        else {
            break;
        };

        let Some(hop) = graph.bfs_path(current, target)? else {
            trace!(from = current, to = target, "jump target unreachable");
            break;
        };
        for &w in &hop[1..] {
            revisits += usize::from(visited.set_bit(w));
            nodes.push(w);
        }
        current = target;
    }

    Ok(Tour {
        nodes,
        revisits,
        unvisited: graph.len() - visited.cardinality() as usize,
    })
}

/// Spanning tree algorithms as methods on the graph
pub trait SpanningTrees: AdjacencyList + EdgeLookup + GraphEdgeOrder {
    /// Computes a minimum spanning tree rooted at `root`.
    /// Returns `None` if some vertex cannot be reached from `root`.
    fn spanning_tree<W>(&self, weights: &W, root: Node) -> Result<Option<SpanningTree>>
    where
        W: EdgeWeights + ?Sized,
    {
        self.check_node(root)?;
        self.check_weights(weights)?;

        let mut in_tree = self.vertex_bitset_unset();
        in_tree.set_bit(root);

        let mut tree = SpanningTree {
            root,
            edges: Vec::with_capacity(self.len().saturating_sub(1)),
            edge_ids: Vec::with_capacity(self.len().saturating_sub(1)),
            cost: 0.0,
        };

        while (in_tree.cardinality() as usize) < self.len() {
            let cheapest = in_tree
                .iter_set_bits()
                .flat_map(|u| self.out_edges_of(u).map(move |(e, v)| (u, e, v)))
                .filter(|&(_, _, v)| !in_tree.get_bit(v))
                .min_by(|a, b| weights.weight(a.1).total_cmp(&weights.weight(b.1)));

            let Some((u, e, v)) = cheapest else {
                debug!(root, spanned = in_tree.cardinality(), "root does not span the graph");
                return Ok(None);
            };

            in_tree.set_bit(v);
            tree.edges.push(Edge(u, v));
            tree.edge_ids.push(e);
            tree.cost += weights.weight(e);
        }

        Ok(Some(tree))
    }

    /// As [`SpanningTrees::spanning_tree`] with the root given by name; `None` if it is unknown
    fn spanning_tree_by_name<W>(&self, weights: &W, root: &str) -> Result<Option<SpanningTree>>
    where
        W: EdgeWeights + ?Sized,
        Self: NamedVertices,
    {
        match self.find_vertex(root) {
            Some(r) => self.spanning_tree(weights, r),
            None => Ok(None),
        }
    }

    /// Computes a walk visiting every vertex, trying to revisit as few vertices as possible.
    /// Every vertex is tried as root in index order; the first perfect walk is returned,
    /// otherwise the walk with the fewest unvisited vertices and then the fewest revisits.
    /// Returns `None` if no vertex spans the graph.
    fn tour_nodes<W>(&self, weights: &W) -> Result<Option<Tour>>
    where
        W: EdgeWeights + ?Sized,
    {
        self.check_weights(weights)?;

        let mut best: Option<Tour> = None;
        for root in self.vertices() {
            let Some(tree) = self.spanning_tree(weights, root)? else {
                continue;
            };

            let tour = walk_tree(self, &tree)?;
            debug!(root, revisits = tour.revisits, unvisited = tour.unvisited, "tour attempt");
            if tour.is_perfect() {
                return Ok(Some(tour));
            }

            if best
                .as_ref()
                .is_none_or(|b| (tour.unvisited, tour.revisits) < (b.unvisited, b.revisits))
            {
                best = Some(tour);
            }
        }

        Ok(best)
    }
}

impl<G> SpanningTrees for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn prim_on_example() {
        let mut graph = Graph::undirected();
        let mut weights = Vec::new();
        for (u, v, w) in [
            (0, 1, 4.0),
            (0, 2, 1.0),
            (1, 2, 2.0),
            (1, 3, 5.0),
            (2, 3, 8.0),
        ] {
            graph.add_weighted_edge(&mut weights, u, v, w);
        }

        let tree = graph.spanning_tree(&weights, 0).unwrap().unwrap();
        assert_eq!(tree.edges, vec![Edge(0, 2), Edge(2, 1), Edge(1, 3)]);
        assert_eq!(tree.cost, 8.0);

        let as_graph = tree.to_graph(&graph);
        assert_eq!(as_graph.number_of_edges(), 3);
        assert_eq!(as_graph.name_of(3), "3");
    }

    #[test]
    fn disconnected_root() {
        let mut graph = Graph::from_edges(GraphKind::Undirected, 3, [(0, 1)]);
        assert_eq!(graph.spanning_tree(&UnitWeights, 0).unwrap(), None);

        graph.add_vertex("far").unwrap();
        assert_eq!(graph.spanning_tree_by_name(&UnitWeights, "far").unwrap(), None);
        assert_eq!(graph.spanning_tree_by_name(&UnitWeights, "none").unwrap(), None);

        let directed = Graph::from_edges(GraphKind::Directed, 3, [(0, 1), (1, 2)]);
        assert!(directed.spanning_tree(&UnitWeights, 0).unwrap().is_some());
        assert_eq!(directed.spanning_tree(&UnitWeights, 1).unwrap(), None);
    }

    #[test]
    fn random_trees_have_n_minus_one_edges() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let distr = Uniform::new(0.0, 1.0).unwrap();

        for n in [2, 5, 30] {
            let mut graph = Gnp::new().nodes(n).avg_deg(2.0).graph(GraphKind::Undirected, rng);
            graph.connect_path(0..n);
            let weights: Vec<f64> = (0..graph.number_of_edge_slots())
                .map(|_| distr.sample(rng))
                .collect();

            let tree = graph.spanning_tree(&weights, 0).unwrap().unwrap();
            assert_eq!(tree.edges.len(), n as usize - 1);
            assert!(tree.edges.iter().map(|e| e.1).all_unique());
            assert_eq!(tree.to_graph(&graph).number_of_edges(), n - 1);
        }
    }

    #[test]
    fn tour_on_path_is_perfect() {
        let mut graph = Graph::undirected();
        graph.connect_path(0..5);

        let tour = graph.tour_nodes(&UnitWeights).unwrap().unwrap();
        assert!(tour.is_perfect());
        assert_eq!(tour.nodes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn tour_on_star_revisits_center() {
        let graph = Graph::from_edges(GraphKind::Undirected, 4, [(0, 1), (0, 2), (0, 3)]);

        let tour = graph.tour_nodes(&UnitWeights).unwrap().unwrap();
        assert_eq!(tour.nodes, vec![1, 0, 2, 0, 3]);
        assert_eq!(tour.revisits, 1);
        assert_eq!(tour.unvisited, 0);
    }

    #[test]
    fn tour_without_spanning_root() {
        let graph = Graph::from_edges(GraphKind::Undirected, 4, [(0, 1), (2, 3)]);
        assert_eq!(graph.tour_nodes(&UnitWeights).unwrap(), None);
    }
}
