/*!
# Node Representation

We choose `Node = u32` as almost all use-cases involve less than `2^32` vertices.
This allows us to (1) save space by not using `usize` or `u64` and (2) use node values
directly as indices into per-vertex arrays such as distances and predecessors.
*/

use stream_bitset::bitset::BitSetImpl;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid, e.g. the predecessor of an unreachable vertex
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes
pub type NodeBitSet = BitSetImpl<Node>;
