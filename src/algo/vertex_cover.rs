/*!
# Vertex Cover

Greedy vertex cover approximation.

1. Every vertex with a self-loop must be in the cover.
2. For every leaf (exactly one incident edge) the other endpoint is taken, unless the edge is
   covered already. Leaves are processed in index order.
3. Every edge still uncovered is covered by the endpoint with the higher *current* degree, i.e.
   the number of incident edges not covered yet. Ties go to the first endpoint.

The result is a cover, but not necessarily a minimum one.
*/

use super::*;

struct CoverState {
    edges: Vec<Edge>,
    incident: Vec<Vec<usize>>,
    covered: Vec<bool>,
    degree: Vec<NumNodes>,
    cover: NodeBitSet,
}

impl CoverState {
    fn new<G: AdjacencyList>(graph: &G) -> Self {
        let edges = graph.edge_list();
        let mut incident = vec![Vec::new(); graph.len()];
        let mut degree = vec![0; graph.len()];
        for (i, &Edge(u, v)) in edges.iter().enumerate() {
            incident[u as usize].push(i);
            degree[u as usize] += 1;
            if u != v {
                incident[v as usize].push(i);
                degree[v as usize] += 1;
            }
        }

        Self {
            covered: vec![false; edges.len()],
            edges,
            incident,
            degree,
            cover: graph.vertex_bitset_unset(),
        }
    }

    fn is_covered(&self, i: usize) -> bool {
        self.covered[i]
    }

    /// Adds `u` to the cover and updates the current degrees
    fn take(&mut self, u: Node) {
        if self.cover.set_bit(u) {
            return;
        }

        for &i in &self.incident[u as usize] {
            if self.covered[i] {
                continue;
            }
            self.covered[i] = true;

            let Edge(a, b) = self.edges[i];
            self.degree[a as usize] -= 1;
            if a != b {
                self.degree[b as usize] -= 1;
            }
        }
    }
}

/// Vertex cover approximation as a method on the graph
pub trait VertexCover: AdjacencyList {
    /// Returns a vertex cover in ascending order of vertices.
    /// For directed graphs the orientation of edges is ignored.
    fn vertex_cover(&self) -> Vec<Node> {
        let mut state = CoverState::new(self);

        for i in 0..state.edges.len() {
            let Edge(u, v) = state.edges[i];
            if u == v {
                state.take(u);
            }
        }

        for leaf in self.vertices() {
            if state.incident[leaf as usize].len() != 1 {
                continue;
            }

            let i = state.incident[leaf as usize][0];
            if !state.is_covered(i) {
                let Edge(u, v) = state.edges[i];
                state.take(if u == leaf { v } else { u });
            }
        }

        for i in 0..state.edges.len() {
            if state.is_covered(i) {
                continue;
            }

            let Edge(u, v) = state.edges[i];
            if state.degree[v as usize] > state.degree[u as usize] {
                state.take(v);
            } else {
                state.take(u);
            }
        }

        state.cover.iter_set_bits().collect()
    }
}

impl<G> VertexCover for G where G: AdjacencyList {}
