/*!
`lgraphs` is a graph data structure & algorithms library designed for graphs that are
- **l**abelled : every vertex carries a unique name next to its dense index
- **l**ayered : vertices and edges carry an ordered list of string attributes on top of the graph
- **weighted on demand** : weights, capacities and probabilities are plain vectors indexed by edge id

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of vertices in the graph.
Every edge record receives an [`EdgeId`](crate::edge::EdgeId) that is never reused, even after
the edge is removed. This allows callers to keep a `Vec<f64>` of weights next to the graph.

### Directed vs Undirected

A [`Graph`](crate::repr::Graph) is either **directed** or **undirected**, fixed at construction:

- In a **directed** graph, every edge is stored as a single record `u -> v`.
- In an **undirected** graph, every edge `{u, v}` is stored as two records: the forward record `e`
  and the reverse record `e + 1`. A self-loop is stored only once.

# Design

All algorithms are provided as configurable structs that one can alter to their needs using either the *Builder* / *Setter* pattern before calling the configured algorithm on a provided graph.
Alternatively, the commonly used functionality is implemented via traits on the graph itself, making them usable without configuring the algorithm beforehand.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations and the graph representation,
- [`algo`] includes algorithm traits that are implemented on graphs itself such as BFS (`graph.bfs(start_node)`), Dijkstra, Yen, A*, max-flow, TSP, ...
- [`gens`] includes random graph generators (and deterministic substructures such as paths/cycles/cliques),
- [`io`] includes handlers for reading named edge lists and writing graphs to DOT for visualization.

For name-based workflows, [`session::Session`] bundles a graph with its edge weights.

In most use-cases, `use lgraphs::{prelude::*, algo::*};` suffices for your needs.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod io;
pub mod node;
pub mod ops;
pub mod repr;
pub mod session;
pub(crate) mod testing;
pub mod utils;

/// `lgraphs::prelude` includes definitions for nodes and edges, errors, all basic graph operation traits as well as the graph representation.
pub mod prelude {
    pub use super::{edge::*, error::GraphError, node::*, ops::*, repr::*};
}
