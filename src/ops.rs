use std::{fmt::Display, ops::Range};

use itertools::Itertools;
use stream_bitset::prelude::*;

use crate::{edge::*, error::*, node::*};

/// Whether the edges of a graph have an orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    Directed,
    Undirected,
}

impl Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphKind::Directed => write!(f, "directed"),
            GraphKind::Undirected => write!(f, "undirected"),
        }
    }
}

/// Provides the kind of a graph
pub trait GraphType {
    /// Returns whether the graph is directed or undirected
    fn kind(&self) -> GraphKind;

    /// Returns *true* if the graph is directed
    fn is_directed(&self) -> bool {
        self.kind() == GraphKind::Directed
    }

    /// Returns *true* if the graph is undirected
    fn is_undirected(&self) -> bool {
        self.kind() == GraphKind::Undirected
    }

    /// Fails with [`GraphError::WrongGraphKind`] unless the graph is of the `expected` kind
    fn require_kind(&self, algorithm: &'static str, expected: GraphKind) -> Result<()> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(GraphError::WrongGraphKind {
                algorithm,
                expected,
            })
        }
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns a range over all vertices.
    /// In contrast to borrowing iterators, the range does not borrow self and hence may be used
    /// where additional mutable references of self are needed.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns empty bitset with one entry per node
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }

    /// Returns full bitset with one entry per node
    fn vertex_bitset_set(&self) -> NodeBitSet {
        NodeBitSet::new_all_set(self.number_of_nodes())
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails with [`GraphError::BadIndex`] if `u` is not a vertex of the graph
    fn check_node(&self, u: Node) -> Result<()> {
        if u < self.number_of_nodes() {
            Ok(())
        } else {
            Err(GraphError::BadIndex {
                index: u,
                len: self.number_of_nodes(),
            })
        }
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of logical edges of the graph.
    /// An undirected edge counts once even though it is stored as two records.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns the number of edge ids handed out so far, including removed ones.
    /// Weight vectors must have at least this many entries.
    fn number_of_edge_slots(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + GraphType + Sized {
    /// Returns an iterator over the outgoing edge records of a given vertex as pairs
    /// `(edge id, target)` in insertion order.
    /// ** Panics if `u >= n` **
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = (EdgeId, Node)> + '_;

    /// Returns an iterator over the (open) neighborhood of a given vertex in insertion order.
    /// ** Panics if `u >= n` **
    ///
    /// Note that for directed graphs, these are the out-neighbors
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.out_edges_of(u).map(|(_, v)| v)
    }

    /// Returns an iterator over the closed neighborhood of a given vertex.
    /// ** Panics if `u >= n` **
    fn closed_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        std::iter::once(u).chain(self.neighbors_of(u))
    }

    /// Returns the number of (outgoing) neighbors of `u`
    /// ** Panics if `u >= n` **
    fn degree_of(&self, u: Node) -> NumNodes;

    /// Returns an iterator over the degrees of all vertices
    fn degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(|u| self.degree_of(u))
    }

    /// Returns an iterator to all vertices with non-zero degree
    fn vertices_with_neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices().filter(|&u| self.degree_of(u) > 0)
    }

    /// Returns the maximum degree in the graph
    fn max_degree(&self) -> NumNodes {
        self.degrees().max().unwrap_or(0)
    }

    /// Returns a NodeBitSet with all neighbors of `u` set.
    /// ** Panics if `u >= n` **
    fn neighbors_of_as_bitset(&self, u: Node) -> NodeBitSet {
        NodeBitSet::new_with_bits_set(self.number_of_nodes(), self.neighbors_of(u))
    }

    /// Returns an iterator over outgoing edges of a given vertex.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    /// ** Panics if `u >= n` **
    fn edges_of(&self, u: Node, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.neighbors_of(u)
            .map(move |v| Edge(u, v))
            .filter(move |e| !only_normalized || e.is_normalized())
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.vertices_range()
            .flat_map(move |u| self.edges_of(u, only_normalized))
    }

    /// Returns all edges in sorted order.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn ordered_edges(&self, only_normalized: bool) -> Vec<Edge> {
        self.edges(only_normalized).sorted().collect_vec()
    }

    /// Returns every logical edge once: for undirected graphs only the normalized record is reported
    fn edge_list(&self) -> Vec<Edge> {
        self.edges(self.is_undirected()).collect_vec()
    }
}

/// Incoming adjacency. For undirected graphs the incoming neighborhood equals the outgoing one.
pub trait DirectedAdjacencyList: AdjacencyList {
    /// Returns an iterator over the incoming edge records of a given vertex as pairs
    /// `(edge id, source)` in insertion order.
    /// ** Panics if `u >= n` **
    fn in_edges_of(&self, u: Node) -> impl Iterator<Item = (EdgeId, Node)> + '_;

    /// Returns an iterator over nodes `v` with edges `(v, u)`
    /// ** Panics if `u >= n` **
    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.in_edges_of(u).map(|(_, v)| v)
    }

    /// Returns the number of incoming neighbors of a given vertex
    /// ** Panics if `u >= n` **
    fn in_degree_of(&self, u: Node) -> NumNodes;

    /// Returns the number of outgoing neighbors of a given vertex
    /// ** Panics if `u >= n` **
    #[inline]
    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.degree_of(u)
    }

    /// Returns the out-degree and in-degree of a given vertex
    /// ** Panics if `u >= n` **
    #[inline]
    fn total_degree_of(&self, u: Node) -> NumNodes {
        self.out_degree_of(u) + self.in_degree_of(u)
    }

    /// Returns an iterator over the in-degrees of all vertices
    fn in_degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(|u| self.in_degree_of(u))
    }
}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns *true* if the egde (u,v) exists in the graph.
    fn has_edge(&self, u: Node, v: Node) -> bool;

    /// Returns *true* if a self-loop (u,u) exists.
    fn has_self_loop(&self, u: Node) -> bool {
        self.has_edge(u, u)
    }

    /// Returns *true* if there exists an edge (u,v) as well as (v,u) in the graph.
    /// Note that for undirected graphs with edge {u,v} this function always returns *true*.
    fn has_bidirected_edge(&self, u: Node, v: Node) -> bool {
        self.has_edge(u, v) && self.has_edge(v, u)
    }
}

/// Access to edge records by id
pub trait EdgeLookup {
    /// Returns the id of the live record `u -> v` if present
    fn find_edge(&self, u: Node, v: Node) -> Option<EdgeId>;

    /// Returns the endpoints of a live edge record and `None` for removed or unknown ids
    fn endpoints(&self, e: EdgeId) -> Option<Edge>;

    /// Returns an iterator over the ids of all live edge records in increasing order
    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_;
}

/// Trait for creating a new empty graph
pub trait GraphNew {
    /// Creates an empty graph of the given kind with n singleton nodes
    fn new(kind: GraphKind, n: NumNodes) -> Self;
}

/// Provides functions to insert/delete edges
pub trait GraphEdgeEditing {
    /// Adds the edge `(u, v)` and returns its id.
    /// If the edge is already present, the id of the existing record is returned.
    /// Vertices `>= n` are created on the fly.
    fn add_edge(&mut self, u: Node, v: Node) -> EdgeId;

    /// Adds all edges in the collection
    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>) {
        for Edge(u, v) in edges.into_iter().map(|d| d.into()) {
            self.add_edge(u, v);
        }
    }

    /// Removes the edge *(u,v)* from the graph. I.e., the edge FROM u TO v.
    /// For undirected graphs, both records are removed.
    /// ** Panics if the edge is not present **
    fn remove_edge(&mut self, u: Node, v: Node) {
        assert!(self.try_remove_edge(u, v));
    }

    /// Removes the edge *(u,v)* from the graph.
    /// If the edge was removed, returns *true* and *false* otherwise.
    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool;

    /// Removes all edges adjacent to node u in the graph.
    /// ** Panics if `u >= n` **
    fn remove_edges_at_node(&mut self, u: Node);
}

/// A super trait for creating a graph from scratch from a set of edges and a number of nodes
pub trait GraphFromScratch {
    /// Create a graph from a number of nodes and an iterator over Edges
    fn from_edges(
        kind: GraphKind,
        n: NumNodes,
        edges: impl IntoIterator<Item = impl Into<Edge>>,
    ) -> Self;
}

impl<G: GraphNew + GraphEdgeEditing> GraphFromScratch for G {
    fn from_edges(
        kind: GraphKind,
        n: NumNodes,
        edges: impl IntoIterator<Item = impl Into<Edge>>,
    ) -> Self {
        let mut graph = Self::new(kind, n);
        graph.add_edges(edges);
        graph
    }
}

/// Every vertex carries a unique name
pub trait NamedVertices: GraphNodeOrder {
    /// Returns the vertex with the given name if present
    fn find_vertex(&self, name: &str) -> Option<Node>;

    /// Returns the name of a vertex
    /// ** Panics if `u >= n` **
    fn name_of(&self, u: Node) -> &str;

    /// Returns the names of the given vertices in the same order
    /// ** Panics if any node is `>= n` **
    fn names_of(&self, nodes: impl IntoIterator<Item = Node>) -> Vec<&str> {
        nodes.into_iter().map(|u| self.name_of(u)).collect()
    }

    /// Returns the vertex with the given name or [`GraphError::UnknownVertex`]
    fn resolve(&self, name: &str) -> Result<Node> {
        self.find_vertex(name)
            .ok_or_else(|| GraphError::UnknownVertex(name.to_string()))
    }
}

/// Name-based graph construction
pub trait NamedGraphEditing: NamedVertices + GraphEdgeEditing {
    /// Adds a new isolated vertex. Fails with [`GraphError::DuplicateName`] if the name is taken.
    fn add_vertex(&mut self, name: impl Into<String>) -> Result<Node>;

    /// Returns the vertex with the given name, adding it if not yet present
    fn vertex_or_insert(&mut self, name: &str) -> Node {
        match self.find_vertex(name) {
            Some(u) => u,
            None => self
                .add_vertex(name)
                .unwrap_or_else(|_| unreachable!("name {name} was checked to be free")),
        }
    }

    /// Adds the edge between two named vertices.
    /// Fails with [`GraphError::UnknownVertex`] if either name is absent.
    fn add_edge_by_name(&mut self, src: &str, dst: &str) -> Result<EdgeId> {
        let u = self.resolve(src)?;
        let v = self.resolve(dst)?;
        Ok(self.add_edge(u, v))
    }
}
