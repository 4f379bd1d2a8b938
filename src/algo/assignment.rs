/*!
# Bipartite Assignment

Maximum-cardinality assignment of agents to tasks via flow reduction.

The input is a directed graph whose edges point from agents to tasks: every vertex with
outgoing edges is an agent, every vertex with incoming edges is a task. A vertex that is both
cannot be handled. The flow network adds a super source `s` with an edge to every agent and a
super sink `t` with an edge from every task; all capacities are `1`.
*/

use tracing::debug;

use super::*;

/// Result of [`BipartiteAssignment::bipartite_assignment`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Pairs `(agent, task)` ordered by the id of the edge connecting them
    pub pairs: Vec<(Node, Node)>,
    /// Ids of the assigned edges in the input graph
    pub edges: Vec<EdgeId>,
}

impl Assignment {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Flow-based assignment as a method on the graph
pub trait BipartiteAssignment: DirectedAdjacencyList + EdgeLookup + GraphEdgeOrder {
    /// Computes a maximum assignment of agents (vertices with outgoing edges) to tasks
    /// (vertices with incoming edges).
    ///
    /// Fails with [`GraphError::WrongGraphKind`] on undirected graphs and with
    /// [`GraphError::UnsupportedInput`] if a vertex has both incoming and outgoing edges.
    fn bipartite_assignment(&self) -> Result<Assignment> {
        self.require_kind("bipartite_assignment", GraphKind::Directed)?;

        if let Some(u) = self
            .vertices()
            .find(|&u| self.out_degree_of(u) > 0 && self.in_degree_of(u) > 0)
        {
            return Err(GraphError::UnsupportedInput(format!(
                "vertex {u} is both agent and task"
            )));
        }

        let n = self.number_of_nodes();
        let (s, t) = (n, n + 1);
        let mut network = Graph::new(GraphKind::Directed, n + 2);

        // original edges come first, so network edge `i` corresponds to `original[i]`
        let original: Vec<EdgeId> = self.edge_ids().collect();
        for &e in &original {
            if let Some(Edge(u, v)) = self.endpoints(e) {
                network.add_edge(u, v);
            }
        }
        for u in self.vertices() {
            if self.out_degree_of(u) > 0 {
                network.add_edge(s, u);
            }
            if self.in_degree_of(u) > 0 {
                network.add_edge(u, t);
            }
        }

        let flow = network.max_flow(&UnitWeights, s, t)?;

        let mut assignment = Assignment::default();
        for (i, &e) in original.iter().enumerate() {
            if flow.per_edge[i] > 0.5 {
                if let Some(Edge(u, v)) = self.endpoints(e) {
                    assignment.pairs.push((u, v));
                    assignment.edges.push(e);
                }
            }
        }

        debug!(assigned = assignment.len(), "bipartite assignment");
        Ok(assignment)
    }
}

impl<G> BipartiteAssignment for G where G: DirectedAdjacencyList + EdgeLookup + GraphEdgeOrder {}
