/*!
Graph traversal algorithms and traversal-derived utilities.

This module provides:
- Generic traversal iterators (BFS, DFS, with and without predecessor tracking).
- Visitor-based traversals (`dfs_visit`, `bfs_visit`) where the visitor can stop the search early.
- Fewest-hop paths via BFS and topological ordering for directed acyclic graphs.
- A high-level `Traversal` trait that exposes traversal algorithms
  directly as methods on graph data structures.

The two orders differ in when a vertex is marked visited:
- BFS marks a vertex when it is enqueued, so no vertex is enqueued twice.
- DFS marks a vertex when it is popped. Unvisited neighbors are pushed in adjacency order,
  hence the last-listed neighbor is explored first.
*/

use super::*;
use std::{collections::VecDeque, marker::PhantomData};

/// What a traversal yields per vertex: the vertex itself and possibly its tree parent
pub trait SequencedItem: Clone + Copy {
    fn new_with_predecessor(predecessor: Node, item: Node) -> Self;

    fn new_without_predecessor(item: Node) -> Self;

    fn item(&self) -> Node;

    /// Tree parent; `None` for the start vertex or if not tracked
    fn predecessor(&self) -> Option<Node>;
}

impl SequencedItem for Node {
    fn new_with_predecessor(_: Node, item: Node) -> Self {
        item
    }
    fn new_without_predecessor(item: Node) -> Self {
        item
    }
    fn item(&self) -> Node {
        *self
    }
    fn predecessor(&self) -> Option<Node> {
        None
    }
}

/// `(parent, vertex)`; a root is stored as `(vertex, vertex)`
pub type PredecessorOfNode = (Node, Node);
impl SequencedItem for PredecessorOfNode {
    fn new_with_predecessor(predecessor: Node, item: Node) -> Self {
        (predecessor, item)
    }
    fn new_without_predecessor(item: Node) -> Self {
        (item, item)
    }
    fn item(&self) -> Node {
        self.1
    }
    fn predecessor(&self) -> Option<Node> {
        if self.0 == self.1 { None } else { Some(self.0) }
    }
}

/// Frontier of a traversal: a queue yields BFS, a stack yields DFS
pub trait NodeSequencer<T> {
    /// If *true*, vertices are marked visited when popped, otherwise when pushed
    const MARK_ON_POP: bool;

    fn init(u: T) -> Self;

    fn push(&mut self, item: T);

    fn pop(&mut self) -> Option<T>;

    /// Number of pending items
    fn cardinality(&self) -> usize;

    fn clear(&mut self);
}

impl<T> NodeSequencer<T> for VecDeque<T> {
    const MARK_ON_POP: bool = false;

    fn init(u: T) -> Self {
        Self::from(vec![u])
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
    fn clear(&mut self) {
        VecDeque::clear(self)
    }
}

impl<T> NodeSequencer<T> for Vec<T> {
    const MARK_ON_POP: bool = true;

    fn init(u: T) -> Self {
        vec![u]
    }
    fn push(&mut self, u: T) {
        Vec::push(self, u)
    }
    fn pop(&mut self) -> Option<T> {
        Vec::pop(self)
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

/// Iterative traversal over the vertices reachable from a start vertex.
/// The frontier `S` decides the order, the item type `I` whether parents are reported.
pub struct TraversalSearch<'a, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    graph: &'a G,
    visited: NodeBitSet,
    sequencer: S,
    stop_at: Option<Node>,
    _item: PhantomData<I>,
}

/// Breadth-first order
pub type BFS<'a, G> = TraversalSearch<'a, G, VecDeque<Node>, Node>;

/// Depth-first order
pub type DFS<'a, G> = TraversalSearch<'a, G, Vec<Node>, Node>;

/// Breadth-first order, reporting the BFS tree parent of every vertex
pub type BFSWithPredecessor<'a, G> =
    TraversalSearch<'a, G, VecDeque<PredecessorOfNode>, PredecessorOfNode>;

/// Depth-first order, reporting the parent through which every vertex was popped
pub type DFSWithPredecessor<'a, G> =
    TraversalSearch<'a, G, Vec<PredecessorOfNode>, PredecessorOfNode>;

impl<G, S, I> Iterator for TraversalSearch<'_, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = loop {
            let popped = self.sequencer.pop()?;
            if !S::MARK_ON_POP || !self.visited.set_bit(popped.item()) {
                break popped;
            }
        };
        let u = popped.item();

        if self.stop_at == Some(u) {
            self.sequencer.clear();
        } else {
            for v in self.graph.neighbors_of(u) {
                if !self.visited.get_bit(v) {
                    self.sequencer.push(I::new_with_predecessor(u, v));
                    if !S::MARK_ON_POP {
                        self.visited.set_bit(v);
                    }
                }
            }
        }

        Some(popped)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.graph.len()))
    }
}

impl<'a, G, S, I> TraversalSearch<'a, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    /// ** Panics if `start >= n` **
    pub fn new(graph: &'a G, start: Node) -> Self {
        assert!(start < graph.number_of_nodes());
        let mut visited = graph.vertex_bitset_unset();
        if !S::MARK_ON_POP {
            visited.set_bit(start);
        }
        Self {
            graph,
            visited,
            sequencer: S::init(I::new_without_predecessor(start)),
            stop_at: None,
            _item: PhantomData,
        }
    }

    /// Returns *true* if `u` was visited (or, for BFS, discovered) so far
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.visited.get_bit(u)
    }

    /// Continues an exhausted search at the smallest unvisited vertex.
    /// Returns *false* if every vertex was visited.
    /// ** Panics if the search is not exhausted **
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert_eq!(self.sequencer.cardinality(), 0);
        let Some(root) = self.graph.vertices().find(|&u| !self.visited.get_bit(u)) else {
            return false;
        };

        if !S::MARK_ON_POP {
            self.visited.set_bit(root);
        }
        self.sequencer.push(I::new_without_predecessor(root));
        true
    }

    /// Ends the search right after `stopper` was yielded
    pub fn set_stop_at(&mut self, stopper: Node) {
        self.stop_at = Some(stopper);
    }

    /// Chainable version of [`TraversalSearch::set_stop_at`]
    pub fn stop_at(mut self, stopper: Node) -> Self {
        self.set_stop_at(stopper);
        self
    }

    /// Treats `u` as visited, so the search never enters it.
    /// Has no effect on items already in the frontier.
    pub fn exclude_node(&mut self, u: Node) {
        self.visited.set_bit(u);
    }

    /// Excludes a node from the search. See [`TraversalSearch::exclude_node`].
    pub fn with_node_excluded(mut self, u: Node) -> Self {
        self.exclude_node(u);
        self
    }
}

/// Reading the traversal tree off a search that reports parents
pub trait TraversalTree: Iterator<Item = PredecessorOfNode> + Sized {
    /// Runs the search to the end and writes the parent of every reached non-root vertex
    /// into `tree`. Other entries are left untouched.
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Undirected, 4, [(0, 1), (1, 2)]);
    ///
    /// let mut parents = vec![INVALID_NODE; 4];
    /// g.bfs_with_predecessor(0).parent_array_into(&mut parents);
    /// assert_eq!(parents, vec![INVALID_NODE, 0, 1, INVALID_NODE]);
    /// ```
    fn parent_array_into(&mut self, tree: &mut [Node]) {
        for pred_with_item in self.by_ref() {
            if let Some(p) = pred_with_item.predecessor() {
                tree[pred_with_item.item() as usize] = p;
            }
        }
    }
}

impl<G, S> TraversalTree for TraversalSearch<'_, G, S, PredecessorOfNode>
where
    G: AdjacencyList,
    S: NodeSequencer<PredecessorOfNode>,
{
}

/// Visitor-driven breadth-first search.
///
/// By default, the visitor is called with every vertex when it is dequeued.
/// With `on_discovery` enabled, it is instead called with the *parent* `u` each time a new
/// neighbor of `u` is discovered, i.e. once per tree edge. In both modes the visitor
/// returning `false` stops the search immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstVisit {
    on_discovery: bool,
}

impl BreadthFirstVisit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call the visitor with the parent of every newly discovered vertex
    pub fn set_on_discovery(&mut self, on_discovery: bool) {
        self.on_discovery = on_discovery;
    }

    /// Call the visitor with the parent of every newly discovered vertex
    pub fn on_discovery(mut self, on_discovery: bool) -> Self {
        self.set_on_discovery(on_discovery);
        self
    }

    /// Runs the search from `start`. Fails with [`GraphError::BadIndex`] if `start >= n`.
    pub fn run<G, F>(&self, graph: &G, start: Node, mut visitor: F) -> Result<()>
    where
        G: AdjacencyList,
        F: FnMut(Node) -> bool,
    {
        graph.check_node(start)?;
        for item in graph.bfs_with_predecessor(start) {
            let visit = if self.on_discovery {
                item.predecessor()
            } else {
                Some(item.item())
            };

            if visit.is_some_and(|u| !visitor(u)) {
                break;
            }
        }
        Ok(())
    }
}

/// Kahn's algorithm with a stack of vertices whose predecessors were all yielded.
/// On a cyclic graph the vertices on or behind a cycle are never yielded.
pub struct TopoSearch<'a, G> {
    graph: &'a G,
    in_degs: Vec<NumNodes>,
    stack: Vec<Node>,
}

impl<G> Iterator for TopoSearch<'_, G>
where
    G: DirectedAdjacencyList,
{
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let u = self.stack.pop()?;

        for v in self.graph.neighbors_of(u) {
            self.in_degs[v as usize] -= 1;
            if self.in_degs[v as usize] == 0 {
                self.stack.push(v);
            }
        }

        Some(u)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.graph.len()))
    }
}

impl<'a, G> TopoSearch<'a, G>
where
    G: DirectedAdjacencyList,
{
    fn new(graph: &'a G) -> Self {
        let in_degs: Vec<NumNodes> = graph.in_degrees().collect();
        let stack: Vec<Node> = graph.vertices().filter(|&u| in_degs[u as usize] == 0).collect();

        Self {
            graph,
            in_degs,
            stack,
        }
    }
}

/// Traversals as methods on the graph
pub trait Traversal: AdjacencyList + Sized {
    /// Iterates over all vertices reachable from `start` in breadth-first order.
    ///
    /// ** Panics if `start >= n` **
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Undirected, 4, [(0, 1), (1, 2), (0, 3)]);
    /// assert_eq!(g.bfs(0).collect::<Vec<_>>(), vec![0, 1, 3, 2]);
    /// ```
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Iterates over all vertices reachable from `start` in depth-first order.
    /// Neighbors listed last are explored first.
    ///
    /// ** Panics if `start >= n` **
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Undirected, 4, [(0, 1), (0, 2), (1, 3)]);
    /// assert_eq!(g.dfs(0).collect::<Vec<_>>(), vec![0, 2, 1, 3]);
    /// ```
    fn dfs(&self, start: Node) -> DFS<'_, Self> {
        DFS::new(self, start)
    }

    /// As [`Traversal::bfs`], but yields `(parent, vertex)` pairs. The start is `(start, start)`.
    ///
    /// ** Panics if `start >= n` **
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Undirected, 3, [(0, 1), (1, 2)]);
    /// assert_eq!(
    ///     g.bfs_with_predecessor(0).collect::<Vec<_>>(),
    ///     vec![(0, 0), (0, 1), (1, 2)]
    /// );
    /// ```
    fn bfs_with_predecessor(&self, start: Node) -> BFSWithPredecessor<'_, Self> {
        BFSWithPredecessor::new(self, start)
    }

    /// As [`Traversal::dfs`], but yields `(parent, vertex)` pairs. The start is `(start, start)`.
    ///
    /// ** Panics if `start >= n` **
    fn dfs_with_predecessor(&self, start: Node) -> DFSWithPredecessor<'_, Self> {
        DFSWithPredecessor::new(self, start)
    }

    /// Depth-first search calling `visitor` on every visited vertex, start first.
    /// The search stops as soon as the visitor returns `false`.
    ///
    /// # Errors
    /// [`GraphError::BadIndex`] if `start >= n`.
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Directed, 4, [(0, 1), (1, 2), (2, 3)]);
    ///
    /// let mut seen = Vec::new();
    /// g.dfs_visit(0, |u| {
    ///     seen.push(u);
    ///     u != 2
    /// })
    /// .unwrap();
    /// assert_eq!(seen, vec![0, 1, 2]);
    /// ```
    fn dfs_visit<F>(&self, start: Node, mut visitor: F) -> Result<()>
    where
        F: FnMut(Node) -> bool,
    {
        self.check_node(start)?;
        for u in self.dfs(start) {
            if !visitor(u) {
                break;
            }
        }
        Ok(())
    }

    /// Breadth-first search calling `visitor` on every dequeued vertex.
    /// See [`BreadthFirstVisit`] for other call patterns.
    fn bfs_visit<F>(&self, start: Node, visitor: F) -> Result<()>
    where
        F: FnMut(Node) -> bool,
    {
        BreadthFirstVisit::new().run(self, start, visitor)
    }

    /// Computes a path with the fewest edges from `start` to `end` using BFS.
    /// The path includes both endpoints; `None` if `end` is unreachable.
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Undirected, 5, [(0, 1), (1, 2), (2, 3), (0, 3)]);
    /// assert_eq!(g.bfs_path(1, 3).unwrap(), Some(vec![1, 0, 3]));
    /// assert_eq!(g.bfs_path(0, 4).unwrap(), None);
    /// ```
    fn bfs_path(&self, start: Node, end: Node) -> Result<Option<Vec<Node>>> {
        self.check_node(start)?;
        self.check_node(end)?;

        let mut parent: Vec<Node> = vec![INVALID_NODE; self.len()];
        parent[start as usize] = start;
        self.bfs_with_predecessor(start)
            .stop_at(end)
            .parent_array_into(&mut parent);

        if parent[end as usize] == INVALID_NODE {
            return Ok(None);
        }

        let mut path = vec![end];
        let mut node = end;
        while node != start {
            node = parent[node as usize];
            path.push(node);
        }
        path.reverse();
        Ok(Some(path))
    }

    /// Vertices in topological order; fewer than `n` vertices if the graph has a cycle.
    ///
    /// # Examples
    /// ```
    /// use lgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphKind::Directed, 3, [(2, 1), (1, 0)]);
    /// assert_eq!(g.topo_search().collect::<Vec<_>>(), vec![2, 1, 0]);
    ///
    /// let cyclic = Graph::from_edges(GraphKind::Directed, 3, [(0, 1), (1, 2), (2, 1)]);
    /// assert_eq!(cyclic.topo_search().collect::<Vec<_>>(), vec![0]);
    /// ```
    fn topo_search(&self) -> TopoSearch<'_, Self>
    where
        Self: DirectedAdjacencyList,
    {
        TopoSearch::new(self)
    }

    /// Returns *true* if the directed graph has no cycle
    fn is_acyclic(&self) -> bool
    where
        Self: DirectedAdjacencyList,
    {
        self.topo_search().count() == self.len()
    }
}

impl<G> Traversal for G where G: AdjacencyList + Sized {}
