/*!
# Components

Greedy grouping of vertices. A group is seeded with the smallest vertex not grouped yet and
grows by every vertex that is adjacent to it:
- in the default mode a vertex joins if it is adjacent to *some* member, which yields the
  (weakly) connected components,
- in clique mode a vertex joins only if it is adjacent to *all* members, so every group is a
  clique. This is a greedy partition into cliques, not a maximum clique search.

Edge orientation is ignored in both modes.
*/

use std::collections::VecDeque;

use super::*;

/// Iterator over the groups of a graph, each sorted ascending
pub struct Components<'a, G> {
    graph: &'a G,
    grouped: NodeBitSet,
    full_clique: bool,
}

impl<'a, G> Components<'a, G>
where
    G: DirectedAdjacencyList + AdjacencyTest,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            grouped: graph.vertex_bitset_unset(),
            full_clique: false,
        }
    }

    /// Only group vertices that are pairwise adjacent
    pub fn set_full_clique(&mut self, full_clique: bool) {
        self.full_clique = full_clique;
    }

    /// Only group vertices that are pairwise adjacent
    pub fn full_clique(mut self, full_clique: bool) -> Self {
        self.set_full_clique(full_clique);
        self
    }

    fn adjacent(&self, u: Node, v: Node) -> bool {
        self.graph.has_edge(u, v) || self.graph.has_edge(v, u)
    }

    fn grow_connected(&mut self, seed: Node) -> Vec<Node> {
        let mut group = vec![seed];
        let mut queue = VecDeque::from([seed]);
        while let Some(u) = queue.pop_front() {
            for v in self.graph.neighbors_of(u).chain(self.graph.in_neighbors_of(u)) {
                if !self.grouped.set_bit(v) {
                    group.push(v);
                    queue.push_back(v);
                }
            }
        }
        group
    }

    fn grow_clique(&mut self, seed: Node) -> Vec<Node> {
        let mut group = vec![seed];
        // members only get added, so a vertex rejected once stays rejected
        for v in self.graph.vertices() {
            if self.grouped.get_bit(v) || !group.iter().all(|&m| self.adjacent(m, v)) {
                continue;
            }
            self.grouped.set_bit(v);
            group.push(v);
        }
        group
    }
}

impl<G> Iterator for Components<'_, G>
where
    G: DirectedAdjacencyList + AdjacencyTest,
{
    type Item = Vec<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let seed = self.graph.vertices().find(|&u| !self.grouped.get_bit(u))?;
        self.grouped.set_bit(seed);

        let mut group = if self.full_clique {
            self.grow_clique(seed)
        } else {
            self.grow_connected(seed)
        };
        group.sort_unstable();
        Some(group)
    }
}

/// Greedy grouping as a method on the graph
pub trait Connectivity: DirectedAdjacencyList + AdjacencyTest {
    /// Partitions the vertices into groups; see [`Components`]
    fn components(&self, full_clique: bool) -> Vec<Vec<Node>> {
        Components::new(self).full_clique(full_clique).collect()
    }

    /// Returns *true* if every vertex is reachable from every other, ignoring edge orientation
    fn is_connected(&self) -> bool {
        Components::new(self).nth(1).is_none()
    }
}

impl<G> Connectivity for G where G: DirectedAdjacencyList + AdjacencyTest {}
