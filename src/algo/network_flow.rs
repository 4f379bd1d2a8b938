/*!
# Maximum Flow

Edmonds–Karp maximum flow on directed graphs with real-valued capacities.

## Core concepts
- The **residual network** contains two arcs per edge `e = (u, v)`: the forward arc `2e`
  `u -> v` carrying the remaining capacity and the backward arc `2e + 1` `v -> u` carrying the
  flow that can be pushed back. The flow on `e` is the residual capacity of its backward arc.
- Arcs with zero residual capacity are invisible to the search, so every augmenting path is a
  fewest-hop path over arcs that can still carry flow.
- [`EdmondsKarp`] is an iterator over augmenting paths; each item is a path together with the
  amount of flow pushed along it.

## Implementations
- [`NetworkFlow::max_flow`] computes a maximum `s-t` flow.
- [`NetworkFlow::multi_flow`] routes several sources into one sink one after another, each
  source using only the capacity left over by its predecessors. This is an approximation of a
  multi-commodity flow, not an exact one.

The caller's graph is never modified; all state lives in the residual network.
*/

use tracing::{debug, trace};

use super::*;

/// Residual network of a directed graph with two arcs per edge slot.
///
/// Implements [`AdjacencyList`] yielding only arcs with positive residual capacity,
/// so all traversal algorithms run directly on it.
#[derive(Debug, Clone)]
pub struct ResidualNetwork {
    heads: Vec<Node>,
    residual: Vec<f64>,
    out_arcs: Vec<Vec<EdgeId>>,
}

impl ResidualNetwork {
    /// Builds the residual network of `graph` with edge capacities `capacities`.
    /// Self-loops never carry flow and are left out.
    pub fn new<G, W>(graph: &G, capacities: &W) -> Self
    where
        G: AdjacencyList + EdgeLookup + GraphEdgeOrder,
        W: EdgeWeights + ?Sized,
    {
        let num_arcs = 2 * graph.number_of_edge_slots() as usize;
        let mut network = Self {
            heads: vec![INVALID_NODE; num_arcs],
            residual: vec![0.0; num_arcs],
            out_arcs: vec![Vec::new(); graph.len()],
        };

        for e in graph.edge_ids() {
            let Some(Edge(u, v)) = graph.endpoints(e) else {
                continue;
            };
            if u == v {
                continue;
            }

            let forward = 2 * e;
            network.heads[forward as usize] = v;
            network.residual[forward as usize] = capacities.weight(e);
            network.out_arcs[u as usize].push(forward);

            network.heads[forward as usize + 1] = u;
            network.out_arcs[v as usize].push(forward + 1);
        }

        network
    }

    /// Returns the remaining capacity of arc `a`
    pub fn residual_capacity(&self, a: EdgeId) -> f64 {
        self.residual[a as usize]
    }

    /// Returns the flow currently routed over edge `e` of the original graph
    pub fn flow_on_edge(&self, e: EdgeId) -> f64 {
        self.residual[2 * e as usize + 1]
    }

    /// Returns the flow on all edge slots of the original graph
    pub fn edge_flows(&self) -> Vec<f64> {
        (0..(self.residual.len() / 2) as EdgeId)
            .map(|e| self.flow_on_edge(e))
            .collect()
    }

    /// Returns some arc `u -> v` that can still carry flow
    fn usable_arc(&self, u: Node, v: Node) -> Option<EdgeId> {
        self.out_edges_of(u).find(|&(_, w)| w == v).map(|(a, _)| a)
    }

    /// Pushes `amount` units of flow over arc `a`
    fn push(&mut self, a: EdgeId, amount: f64) {
        self.residual[a as usize] -= amount;
        self.residual[(a ^ 1) as usize] += amount;
    }
}

impl GraphType for ResidualNetwork {
    fn kind(&self) -> GraphKind {
        GraphKind::Directed
    }
}

impl GraphNodeOrder for ResidualNetwork {
    fn number_of_nodes(&self) -> NumNodes {
        self.out_arcs.len() as NumNodes
    }
}

impl AdjacencyList for ResidualNetwork {
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = (EdgeId, Node)> + '_ {
        self.out_arcs[u as usize]
            .iter()
            .filter(|&&a| self.residual[a as usize] > 0.0)
            .map(|&a| (a, self.heads[a as usize]))
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.out_edges_of(u).count() as NumNodes
    }
}

/// Implementation of the Edmonds–Karp algorithm on a [`ResidualNetwork`].
///
/// Every iteration finds a fewest-hop augmenting path via BFS, pushes its bottleneck capacity
/// and returns the path (as vertices) together with the pushed amount.
/// The iterator terminates when the target is no longer reachable.
pub struct EdmondsKarp {
    network: ResidualNetwork,
    source: Node,
    target: Node,
    predecessor: Vec<Node>,
}

impl EdmondsKarp {
    /// Creates a new Edmonds–Karp solver from a given residual network
    pub fn new(network: ResidualNetwork, source: Node, target: Node) -> Self {
        let n = network.len();
        Self {
            network,
            source,
            target,
            predecessor: vec![INVALID_NODE; n],
        }
    }

    /// Performs BFS to find an augmenting path from source to target.
    /// Updates the predecessor array and returns whether the target was reached.
    fn bfs(&mut self) -> bool {
        let mut bfs = self.network.bfs_with_predecessor(self.source);
        bfs.set_stop_at(self.target);
        bfs.parent_array_into(self.predecessor.as_mut_slice());
        bfs.did_visit_node(self.target)
    }

    /// Runs the algorithm to completion and returns the total flow
    pub fn total_flow(&mut self) -> f64 {
        self.map(|(_, amount)| amount).sum()
    }

    /// Gives back the residual network, e.g. to read the flow on every edge
    pub fn into_network(self) -> ResidualNetwork {
        self.network
    }
}

impl Iterator for EdmondsKarp {
    type Item = (Vec<Node>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.bfs() {
            return None;
        }

        let mut path = vec![self.target];
        let mut arcs = Vec::new();
        let mut v = self.target;
        while v != self.source {
            let u = self.predecessor[v as usize];
            arcs.push(self.network.usable_arc(u, v)?);
            path.push(u);
            v = u;
        }
        path.reverse();

        let bottleneck = arcs
            .iter()
            .map(|&a| self.network.residual_capacity(a))
            .fold(f64::INFINITY, f64::min);
        for a in arcs {
            self.network.push(a, bottleneck);
        }

        trace!(hops = path.len() - 1, bottleneck, "augmenting path");
        Some((path, bottleneck))
    }
}

/// Result of a single-commodity flow computation
#[derive(Debug, Clone, PartialEq)]
pub struct MaxFlow {
    pub total: f64,
    /// Flow per edge slot of the original graph
    pub per_edge: Vec<f64>,
}

/// Result of [`NetworkFlow::multi_flow`]
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFlow {
    /// Flow contributed by each source, in the order the sources were given
    pub per_source: Vec<f64>,
    /// Summed flow per edge slot of the original graph
    pub per_edge: Vec<f64>,
    pub total: f64,
}

fn check_flow_input<G: GraphType + GraphNodeOrder>(graph: &G, algorithm: &'static str, s: Node, t: Node) -> Result<()> {
    graph.require_kind(algorithm, GraphKind::Directed)?;
    graph.check_node(s)?;
    graph.check_node(t)?;
    if s == t {
        return Err(GraphError::IdenticalEndpoints(s));
    }
    Ok(())
}

/// Flow algorithms as methods on the graph
pub trait NetworkFlow: AdjacencyList + EdgeLookup + GraphEdgeOrder {
    /// Computes a maximum flow from `source` to `target` where edge `e` can carry at most
    /// `capacities.weight(e)` units.
    ///
    /// Fails if the graph is undirected, if `source == target`, if a capacity is negative or if
    /// an augmenting path of infinite capacity exists.
    fn max_flow<W>(&self, capacities: &W, source: Node, target: Node) -> Result<MaxFlow>
    where
        W: EdgeWeights + ?Sized,
    {
        check_flow_input(self, "max_flow", source, target)?;
        self.check_non_negative_weights(capacities)?;

        let mut solver = EdmondsKarp::new(ResidualNetwork::new(self, capacities), source, target);
        let mut total = 0.0;
        let mut rounds = 0;
        for (_, amount) in solver.by_ref() {
            if amount.is_infinite() {
                return Err(GraphError::UnsupportedInput(format!(
                    "unbounded flow from {source} to {target}"
                )));
            }
            total += amount;
            rounds += 1;
        }

        debug!(source, target, total, rounds, "max flow");
        Ok(MaxFlow {
            total,
            per_edge: solver.into_network().edge_flows(),
        })
    }

    /// Routes flow from every source to `sink`, one source after another.
    /// Each source may only use the capacity the previous sources left over.
    fn multi_flow<W>(&self, capacities: &W, sources: &[Node], sink: Node) -> Result<MultiFlow>
    where
        W: EdgeWeights + ?Sized,
    {
        self.check_non_negative_weights(capacities)?;
        for &s in sources {
            check_flow_input(self, "multi_flow", s, sink)?;
        }

        let slots = self.number_of_edge_slots();
        let mut remaining: Vec<f64> = (0..slots).map(|e| capacities.weight(e)).collect();
        let mut result = MultiFlow {
            per_source: Vec::with_capacity(sources.len()),
            per_edge: vec![0.0; slots as usize],
            total: 0.0,
        };

        for &s in sources {
            let flow = self.max_flow(&remaining, s, sink)?;
            for (e, &f) in flow.per_edge.iter().enumerate() {
                remaining[e] = (remaining[e] - f).max(0.0);
                result.per_edge[e] += f;
            }
            result.per_source.push(flow.total);
            result.total += flow.total;
        }

        debug!(sources = sources.len(), sink, total = result.total, "multi flow");
        Ok(result)
    }
}

impl<G> NetworkFlow for G where G: AdjacencyList + EdgeLookup + GraphEdgeOrder {}
