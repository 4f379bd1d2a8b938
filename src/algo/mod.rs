/*!
# Graph Algorithms

This module provides a suite of **graph algorithms** built on top of [`Graph`](crate::repr::Graph).
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use lgraphs::algo::*;
```
and gain access to traversal, shortest paths, flows, cycle analysis, TSP and more.

Most algorithms are provided as extension traits implemented for every graph satisfying the
required basic operations. Those with options are configurable structs following the
*Builder* / *Setter* pattern (e.g. [`KShortestPaths`], [`CycleSearch`]).

Algorithms that need to destroy edges (Yen spurs, flows, Euler circuits, the cycle finder)
work on copies; the graph passed in is never modified unless documented otherwise.
*/

mod articulation;
mod assignment;
mod astar;
mod components;
mod cycles;
mod euler;
mod k_shortest_paths;
mod network_flow;
mod probability;
mod shortest_path;
mod spanning_tree;
mod traversal;
mod tsp;
mod vertex_cover;

use crate::{error::*, prelude::*};
use stream_bitset::prelude::*;

pub use articulation::*;
pub use assignment::*;
pub use astar::*;
pub use components::*;
pub use cycles::*;
pub use euler::*;
pub use k_shortest_paths::*;
pub use network_flow::*;
pub use probability::*;
pub use shortest_path::*;
pub use spanning_tree::*;
pub use traversal::*;
pub use tsp::*;
pub use vertex_cover::*;
