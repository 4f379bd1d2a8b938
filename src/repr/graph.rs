use fxhash::FxHashMap;
use smallvec::SmallVec;
use tracing::warn;

use super::*;

/// Adjacency of a single vertex: edge ids in insertion order
type Incidence = SmallVec<[EdgeId; 4]>;

#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    src: Node,
    dst: Node,
    /// Reverse record of an undirected edge; the record itself for directed edges and self-loops
    twin: EdgeId,
    removed: bool,
}

/// A named, directed or undirected graph with tombstone-based edge removal.
///
/// Vertices are dense indices `0..n` with a unique name each. Every edge record gets an id that
/// is never reused, so weights, capacities or probabilities can be stored in plain vectors
/// indexed by [`EdgeId`]. Undirected edges are stored as two records `e` (as inserted) and
/// `e + 1` (reversed).
///
/// # Examples
/// ```
/// use lgraphs::prelude::*;
///
/// let mut g = Graph::undirected();
/// let a = g.add_vertex("a").unwrap();
/// let b = g.add_vertex("b").unwrap();
/// let e = g.add_edge(a, b);
///
/// assert_eq!(g.find_edge(a, b), Some(e));
/// assert_eq!(g.find_edge(b, a), Some(e + 1));
/// assert_eq!(g.number_of_edges(), 1);
/// assert_eq!(g.number_of_edge_slots(), 2);
///
/// // vertices created through indices are named after them
/// g.add_edge(b, 3);
/// assert_eq!(g.names_of(g.vertices()), vec!["a", "b", "2", "3"]);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    kind: GraphKind,
    names: Vec<String>,
    name_index: FxHashMap<String, Node>,
    records: Vec<EdgeRecord>,
    out_edges: Vec<Incidence>,
    in_edges: Vec<Incidence>,
    num_edges: NumEdges,
    attributes: Attributes,
}

impl Graph {
    /// Creates an empty directed graph
    pub fn directed() -> Self {
        Self::new(GraphKind::Directed, 0)
    }

    /// Creates an empty undirected graph
    pub fn undirected() -> Self {
        Self::new(GraphKind::Undirected, 0)
    }

    /// Builds a graph from pairs of vertex names; vertices are created in order of first appearance
    ///
    /// # Examples
    /// ```
    /// use lgraphs::prelude::*;
    ///
    /// let g = Graph::from_named_edges(GraphKind::Directed, [("x", "y"), ("y", "z")]);
    /// assert_eq!(g.names_of(g.vertices()), vec!["x", "y", "z"]);
    /// assert!(g.has_edge(0, 1) && !g.has_edge(1, 0));
    /// ```
    pub fn from_named_edges<S: AsRef<str>>(
        kind: GraphKind,
        pairs: impl IntoIterator<Item = (S, S)>,
    ) -> Self {
        let mut graph = Self::new(kind, 0);
        for (a, b) in pairs {
            let u = graph.vertex_or_insert(a.as_ref());
            let v = graph.vertex_or_insert(b.as_ref());
            graph.add_edge(u, v);
        }
        graph
    }

    /// Returns a graph of the same kind and vertex names without any edges or attributes
    pub fn without_edges(&self) -> Self {
        Self {
            kind: self.kind,
            names: self.names.clone(),
            name_index: self.name_index.clone(),
            records: Vec::new(),
            out_edges: vec![Incidence::new(); self.names.len()],
            in_edges: vec![Incidence::new(); self.names.len()],
            num_edges: 0,
            attributes: Attributes::default(),
        }
    }

    /// Returns a graph of the same kind and vertex set containing the given edges
    pub fn with_edges_of(&self, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self {
        let mut graph = self.without_edges();
        graph.add_edges(edges);
        graph
    }

    /// Removes all vertices, edges and attributes. The kind of the graph is kept.
    pub fn clear(&mut self) {
        *self = Self::new(self.kind, 0);
    }

    /// Removes vertex `u` together with all incident edges.
    /// Vertices with larger index move down by one and edge ids are compacted.
    ///
    /// Returns the mapping from old edge ids to new edge ids (`None` for removed records)
    /// so that weight vectors can be carried over with [`remap_edge_values`].
    ///
    /// # Examples
    /// ```
    /// use lgraphs::prelude::*;
    ///
    /// let mut g = Graph::from_named_edges(GraphKind::Directed, [("a", "b"), ("b", "c"), ("a", "c")]);
    /// let weights = vec![1.0, 2.0, 3.0];
    ///
    /// let mapping = g.remove_vertex(1).unwrap();
    /// let weights = remap_edge_values(&weights, &mapping);
    ///
    /// assert_eq!(g.names_of(g.vertices()), vec!["a", "c"]);
    /// assert_eq!(g.find_edge(0, 1), Some(0));
    /// assert_eq!(weights, vec![3.0]);
    /// ```
    pub fn remove_vertex(&mut self, u: Node) -> Result<Vec<Option<EdgeId>>> {
        self.check_node(u)?;

        let shift = |w: Node| if w > u { w - 1 } else { w };
        let mut compacted = self.without_edges();
        compacted.names.remove(u as usize);
        compacted.out_edges.pop();
        compacted.in_edges.pop();
        compacted.name_index.retain(|_, w| *w != u);
        compacted.name_index.values_mut().for_each(|w| *w = shift(*w));
        for w in self.vertices().filter(|&w| w != u) {
            compacted
                .attributes
                .set_vertex_attributes(shift(w), self.attributes.vertex_attributes(w).to_vec());
        }

        let mut mapping = vec![None; self.records.len()];
        for (e, rec) in self.records.iter().enumerate() {
            let e = e as EdgeId;
            if rec.removed || rec.src == u || rec.dst == u || rec.twin < e {
                continue;
            }

            let new_e = compacted.add_edge(shift(rec.src), shift(rec.dst));
            mapping[e as usize] = Some(new_e);
            compacted
                .attributes
                .set_edge_attributes(new_e, self.attributes.edge_attributes(e).to_vec());

            if rec.twin != e {
                let new_twin = compacted.records[new_e as usize].twin;
                mapping[rec.twin as usize] = Some(new_twin);
                compacted
                    .attributes
                    .set_edge_attributes(new_twin, self.attributes.edge_attributes(rec.twin).to_vec());
            }
        }

        *self = compacted;
        Ok(mapping)
    }

    /// Read access to the attribute overlay
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Write access to the attribute overlay
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    fn push_vertex(&mut self, name: String) -> Node {
        let u = self.names.len() as Node;
        self.name_index.insert(name.clone(), u);
        self.names.push(name);
        self.out_edges.push(Incidence::new());
        self.in_edges.push(Incidence::new());
        u
    }

    /// Creates vertices until `n` vertices exist, naming each by its decimal index
    fn grow_to(&mut self, n: NumNodes) {
        while self.number_of_nodes() < n {
            let u = self.number_of_nodes();
            let name = u.to_string();
            if self.name_index.contains_key(&name) {
                warn!(vertex = u, name = %name, "auto-generated vertex name already in use; vertex is reachable by index only");
                self.names.push(name);
                self.out_edges.push(Incidence::new());
                self.in_edges.push(Incidence::new());
            } else {
                self.push_vertex(name);
            }
        }
    }

    fn push_record(&mut self, src: Node, dst: Node) -> EdgeId {
        let e = self.records.len() as EdgeId;
        self.records.push(EdgeRecord {
            src,
            dst,
            twin: e,
            removed: false,
        });
        self.out_edges[src as usize].push(e);
        self.in_edges[dst as usize].push(e);
        e
    }

    fn unlink_record(&mut self, e: EdgeId) {
        let rec = &mut self.records[e as usize];
        rec.removed = true;
        let (src, dst) = (rec.src, rec.dst);
        self.out_edges[src as usize].retain(|f| *f != e);
        self.in_edges[dst as usize].retain(|f| *f != e);
    }
}

impl GraphType for Graph {
    fn kind(&self) -> GraphKind {
        self.kind
    }
}

impl GraphNodeOrder for Graph {
    fn number_of_nodes(&self) -> NumNodes {
        self.names.len() as NumNodes
    }
}

impl GraphEdgeOrder for Graph {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }

    fn number_of_edge_slots(&self) -> NumEdges {
        self.records.len() as NumEdges
    }
}

impl GraphNew for Graph {
    fn new(kind: GraphKind, n: NumNodes) -> Self {
        let mut graph = Self {
            kind,
            names: Vec::with_capacity(n as usize),
            name_index: FxHashMap::default(),
            records: Vec::new(),
            out_edges: Vec::with_capacity(n as usize),
            in_edges: Vec::with_capacity(n as usize),
            num_edges: 0,
            attributes: Attributes::default(),
        };
        graph.grow_to(n);
        graph
    }
}

impl AdjacencyList for Graph {
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = (EdgeId, Node)> + '_ {
        self.out_edges[u as usize]
            .iter()
            .map(|&e| (e, self.records[e as usize].dst))
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.out_edges[u as usize].len() as NumNodes
    }
}

impl DirectedAdjacencyList for Graph {
    fn in_edges_of(&self, u: Node) -> impl Iterator<Item = (EdgeId, Node)> + '_ {
        self.in_edges[u as usize]
            .iter()
            .map(|&e| (e, self.records[e as usize].src))
    }

    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.in_edges[u as usize].len() as NumNodes
    }
}

impl AdjacencyTest for Graph {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.find_edge(u, v).is_some()
    }
}

impl EdgeLookup for Graph {
    fn find_edge(&self, u: Node, v: Node) -> Option<EdgeId> {
        self.out_edges
            .get(u as usize)?
            .iter()
            .copied()
            .find(|&e| self.records[e as usize].dst == v)
    }

    fn endpoints(&self, e: EdgeId) -> Option<Edge> {
        self.records
            .get(e as usize)
            .filter(|rec| !rec.removed)
            .map(|rec| Edge(rec.src, rec.dst))
    }

    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, rec)| !rec.removed)
            .map(|(e, _)| e as EdgeId)
    }
}

impl GraphEdgeEditing for Graph {
    fn add_edge(&mut self, u: Node, v: Node) -> EdgeId {
        self.grow_to(u.max(v) + 1);
        if let Some(e) = self.find_edge(u, v) {
            return e;
        }

        let e = self.push_record(u, v);
        if self.is_undirected() && u != v {
            let r = self.push_record(v, u);
            self.records[e as usize].twin = r;
            self.records[r as usize].twin = e;
        }
        self.num_edges += 1;
        e
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool {
        let Some(e) = self.find_edge(u, v) else {
            return false;
        };

        let twin = self.records[e as usize].twin;
        self.unlink_record(e);
        if twin != e {
            self.unlink_record(twin);
        }
        self.num_edges -= 1;
        true
    }

    fn remove_edges_at_node(&mut self, u: Node) {
        let incident: Vec<Edge> = self
            .edges_of(u, false)
            .chain(self.in_neighbors_of(u).map(|w| Edge(w, u)))
            .collect();
        for Edge(a, b) in incident {
            self.try_remove_edge(a, b);
        }
    }
}

impl NamedVertices for Graph {
    fn find_vertex(&self, name: &str) -> Option<Node> {
        self.name_index.get(name).copied()
    }

    fn name_of(&self, u: Node) -> &str {
        &self.names[u as usize]
    }
}

impl NamedGraphEditing for Graph {
    fn add_vertex(&mut self, name: impl Into<String>) -> Result<Node> {
        let name = name.into();
        if self.name_index.contains_key(&name) {
            return Err(GraphError::DuplicateName(name));
        }
        Ok(self.push_vertex(name))
    }
}

/// Carries per-edge values over a [`Graph::remove_vertex`] call.
/// Values of removed records are dropped.
pub fn remap_edge_values<T: Clone>(values: &[T], mapping: &[Option<EdgeId>]) -> Vec<T> {
    let mut remapped: Vec<(EdgeId, T)> = mapping
        .iter()
        .zip(values)
        .filter_map(|(new, value)| new.map(|e| (e, value.clone())))
        .collect();
    remapped.sort_by_key(|(e, _)| *e);
    remapped.into_iter().map(|(_, value)| value).collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn diamond() -> Graph {
        Graph::from_named_edges(
            GraphKind::Undirected,
            [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        )
    }

    #[test]
    fn undirected_edges_are_two_records() {
        let g = diamond();
        assert_eq!(g.number_of_nodes(), 4);
        assert_eq!(g.number_of_edges(), 4);
        assert_eq!(g.number_of_edge_slots(), 8);

        let e = g.find_edge(0, 1).unwrap();
        assert_eq!(g.find_edge(1, 0), Some(e + 1));
        assert_eq!(g.endpoints(e + 1), Some(Edge(1, 0)));
        assert_eq!(
            g.edge_list(),
            vec![Edge(0, 1), Edge(0, 2), Edge(1, 3), Edge(2, 3)]
        );
    }

    #[test]
    fn readding_returns_existing_id() {
        let mut g = Graph::directed();
        let e = g.add_edge(0, 1);
        assert_eq!(g.add_edge(0, 1), e);
        assert_ne!(g.add_edge(1, 0), e);
        assert_eq!(g.number_of_edges(), 2);

        let mut g = Graph::undirected();
        let e = g.add_edge(0, 1);
        assert_eq!(g.add_edge(1, 0), e + 1);
        assert_eq!(g.number_of_edges(), 1);
    }

    #[test]
    fn self_loop_is_single_record() {
        let mut g = Graph::undirected();
        let e = g.add_edge(2, 2);
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.number_of_edge_slots(), 1);
        assert!(g.has_self_loop(2));
        assert!(g.try_remove_edge(2, 2));
        assert_eq!(g.endpoints(e), None);
        assert!(g.is_singleton());
    }

    #[test]
    fn removal_is_tombstone_based() {
        let mut g = diamond();
        assert!(g.try_remove_edge(1, 0));
        assert!(!g.try_remove_edge(0, 1));
        assert_eq!(g.number_of_edges(), 3);
        assert_eq!(g.number_of_edge_slots(), 8);
        assert_eq!(g.endpoints(0), None);
        assert_eq!(g.endpoints(1), None);
        assert_eq!(g.neighbors_of(0).collect_vec(), vec![2]);

        let e = g.add_edge(0, 1);
        assert_eq!(e, 8);
    }

    #[test]
    fn names_and_lookup() {
        let mut g = Graph::directed();
        let a = g.add_vertex("a").unwrap();
        let b = g.add_vertex("b").unwrap();
        assert_eq!(
            g.add_vertex("a"),
            Err(GraphError::DuplicateName("a".into()))
        );
        assert_eq!(g.add_edge_by_name("a", "b").unwrap(), 0);
        assert_eq!(
            g.add_edge_by_name("a", "zz"),
            Err(GraphError::UnknownVertex("zz".into()))
        );
        assert_eq!(g.find_vertex("b"), Some(b));
        assert_eq!(g.names_of([b, a]), vec!["b", "a"]);

        g.add_edge(3, 0);
        assert_eq!(g.name_of(2), "2");
        assert_eq!(g.name_of(3), "3");
        assert_eq!(g.find_vertex("3"), Some(3));
    }

    #[test]
    fn auto_naming_collision_keeps_index_access() {
        let mut g = Graph::directed();
        g.add_vertex("1").unwrap();
        g.add_edge(0, 1);
        assert_eq!(g.number_of_nodes(), 2);
        assert_eq!(g.find_vertex("1"), Some(0));
        assert_eq!(g.name_of(1), "1");
        assert!(g.has_edge(0, 1));
    }

    #[test]
    fn in_edges_of_directed() {
        let mut g = Graph::directed();
        g.add_edges([(0, 2), (1, 2), (2, 0)]);
        assert_eq!(g.in_neighbors_of(2).collect_vec(), vec![0, 1]);
        assert_eq!(g.in_degree_of(0), 1);
        assert_eq!(g.total_degree_of(2), 3);
    }

    #[test]
    fn remove_vertex_compacts() {
        let mut g = diamond();
        g.set_edge_attribute(g.find_edge(2, 3).unwrap(), 0, "x");
        let weights: Vec<f64> = (0..8).map(|e| e as f64).collect();

        let mapping = g.remove_vertex(1).unwrap();
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.names_of(g.vertices()), vec!["a", "c", "d"]);
        assert_eq!(g.number_of_edges(), 2);
        assert_eq!(g.find_vertex("d"), Some(2));
        assert_eq!(g.edge_list(), vec![Edge(0, 1), Edge(1, 2)]);

        assert_eq!(mapping.len(), 8);
        assert_eq!(mapping[0], None);
        assert_eq!(mapping[2], Some(0));
        assert_eq!(mapping[3], Some(1));

        let e = g.find_edge(1, 2).unwrap();
        assert_eq!(g.edge_attribute(e, 0), "x");

        let remapped = remap_edge_values(&weights, &mapping);
        assert_eq!(remapped, vec![2.0, 3.0, 6.0, 7.0]);

        assert_eq!(
            g.remove_vertex(7),
            Err(GraphError::BadIndex { index: 7, len: 3 })
        );
    }

    #[test]
    fn clear_keeps_kind() {
        let mut g = diamond();
        g.clear();
        assert!(g.is_empty());
        assert!(g.is_undirected());
        assert_eq!(g.number_of_edge_slots(), 0);
    }
}

crate::testing::test_graph_ops!(
    directed_graph_ops,
    Directed,
    false,
    (GraphNew, AdjacencyList, DirectedAdjacencyList, GraphEdgeEditing)
);

crate::testing::test_graph_ops!(
    undirected_graph_ops,
    Undirected,
    true,
    (GraphNew, AdjacencyList, GraphEdgeEditing)
);
