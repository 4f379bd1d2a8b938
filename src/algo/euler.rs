/*!
# Euler Circuits

Hierholzer's algorithm on directed graphs. From the current vertex the first-listed unused
outgoing edge is followed until the walk gets stuck; the walk then backtracks and splices
in sub-circuits starting at vertices with unused edges. Used edges are consumed on a
per-vertex cursor, the graph itself is not modified.

Only edges reachable from the start vertex are covered. If the edges of the graph do not form
a single connected component, the returned circuit misses some of them.
*/

use tracing::debug;

use super::*;

/// Euler circuits as a method on the graph
pub trait EulerCircuit: DirectedAdjacencyList {
    /// Returns a closed walk from `start` using every edge reachable from `start` exactly once.
    ///
    /// Fails with [`GraphError::WrongGraphKind`] on undirected graphs and with
    /// [`GraphError::NotEulerian`] if some vertex has different in- and out-degree.
    fn euler_circuit(&self, start: Node) -> Result<Vec<Node>> {
        self.require_kind("euler_circuit", GraphKind::Directed)?;
        self.check_node(start)?;

        if let Some(vertex) = self
            .vertices()
            .find(|&u| self.in_degree_of(u) != self.out_degree_of(u))
        {
            return Err(GraphError::NotEulerian {
                vertex,
                in_degree: self.in_degree_of(vertex),
                out_degree: self.out_degree_of(vertex),
            });
        }

        let successors: Vec<Vec<Node>> = self
            .vertices()
            .map(|u| self.neighbors_of(u).collect())
            .collect();
        let mut cursor = vec![0usize; self.len()];

        let mut stack = vec![start];
        let mut circuit = Vec::with_capacity(self.len() + 1);
        while let Some(&u) = stack.last() {
            if let Some(&v) = successors[u as usize].get(cursor[u as usize]) {
                cursor[u as usize] += 1;
                stack.push(v);
            } else {
                circuit.push(u);
                stack.pop();
            }
        }
        circuit.reverse();

        debug!(start, edges = circuit.len() - 1, "euler circuit");
        Ok(circuit)
    }
}

impl<G> EulerCircuit for G where G: DirectedAdjacencyList {}
