/*!
# Session

A [`Session`] owns a graph together with one weight per edge record and exposes the
algorithms of [`crate::algo`] by vertex *name*. It is the entry point for name-based
workflows, e.g. a command loop reading queries from a user:
```
use lgraphs::{prelude::*, session::Session};

let mut session = Session::new(GraphKind::Undirected);
session.add_edge("home", "shop", 2.0);
session.add_edge("shop", "work", 3.0);
session.add_edge("home", "work", 7.0);

let path = session.shortest_path("home", "work").unwrap().unwrap();
assert_eq!(path.names, vec!["home", "shop", "work"]);
assert_eq!(path.cost, 5.0);
```

Depending on the algorithm, the weights are interpreted as lengths, capacities or
probabilities. Unknown names are reported as [`GraphError::UnknownVertex`].
*/

use std::io::{BufRead, Write};

use tracing::debug;

use crate::{
    algo::*,
    error::*,
    io::{DotWriter, EdgeListReader, EdgeListWriter, GraphWriter},
    prelude::*,
};

/// A path given by vertex names
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPath {
    pub names: Vec<String>,
    pub cost: f64,
}

/// A graph with edge weights, queried by vertex name
#[derive(Debug, Clone)]
pub struct Session {
    graph: Graph,
    weights: Vec<f64>,
}

impl Session {
    /// Creates an empty session
    pub fn new(kind: GraphKind) -> Self {
        Self {
            graph: Graph::new(kind, 0),
            weights: Vec::new(),
        }
    }

    /// Creates a session from a graph and its weights indexed by edge id
    pub fn from_parts(graph: Graph, weights: Vec<f64>) -> Result<Self> {
        graph.check_weights(&weights)?;
        Ok(Self { graph, weights })
    }

    /// Reads a session from the named edge list format
    pub fn read_edge_list<R: BufRead>(reader: R, kind: GraphKind) -> std::io::Result<Self> {
        let (graph, weights) = EdgeListReader::new().kind(kind).try_read_weighted(reader)?;
        Ok(Self { graph, weights })
    }

    /// Writes the session in the named edge list format
    pub fn write_edge_list<W: Write>(&self, writer: W) -> std::io::Result<()> {
        EdgeListWriter::new()
            .weights(&self.weights)
            .try_write_graph(&self.graph, writer)
    }

    /// Writes the session in the DOT format with weights as edge labels and the edges of
    /// `highlighted` drawn in color
    pub fn write_dot<W: Write>(&self, writer: W, highlighted: Option<&NamedPath>) -> std::io::Result<()> {
        let mut dot = DotWriter::new().weights(&self.weights);
        if let Some(path) = highlighted {
            let nodes: Vec<Node> = path
                .names
                .iter()
                .filter_map(|name| self.graph.find_vertex(name))
                .collect();
            dot.add_highlighted_path(&nodes);
        }
        dot.try_write_graph(&self.graph, writer)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the weight of the edge `(src, dst)` if present
    pub fn weight(&self, src: &str, dst: &str) -> Option<f64> {
        let e = self
            .graph
            .find_edge(self.graph.find_vertex(src)?, self.graph.find_vertex(dst)?)?;
        self.weights.get(e as usize).copied()
    }

    pub fn into_parts(self) -> (Graph, Vec<f64>) {
        (self.graph, self.weights)
    }

    /// Adds an isolated vertex. Fails if the name is already taken.
    pub fn add_vertex(&mut self, name: &str) -> Result<Node> {
        self.graph.add_vertex(name)
    }

    /// Adds the edge `(src, dst)` with the given weight, creating missing vertices.
    /// An existing edge keeps its id and receives the new weight.
    pub fn add_edge(&mut self, src: &str, dst: &str, weight: f64) -> EdgeId {
        let u = self.graph.vertex_or_insert(src);
        let v = self.graph.vertex_or_insert(dst);
        self.graph.add_weighted_edge(&mut self.weights, u, v, weight)
    }

    /// Removes the edge `(src, dst)`; returns *false* if there is no such edge
    pub fn remove_edge(&mut self, src: &str, dst: &str) -> Result<bool> {
        let u = self.graph.resolve(src)?;
        let v = self.graph.resolve(dst)?;
        Ok(self.graph.try_remove_edge(u, v))
    }

    /// Removes a vertex with all incident edges. Edge ids are compacted and the weights
    /// are carried over.
    pub fn remove_vertex(&mut self, name: &str) -> Result<()> {
        let u = self.graph.resolve(name)?;
        let mapping = self.graph.remove_vertex(u)?;
        self.weights = remap_edge_values(&self.weights, &mapping);
        debug!(name, n = self.graph.number_of_nodes(), "removed vertex");
        Ok(())
    }

    fn named(&self, nodes: impl IntoIterator<Item = Node>) -> Vec<String> {
        self.graph
            .names_of(nodes)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn named_path(&self, path: Path) -> NamedPath {
        NamedPath {
            names: self.named(path.nodes),
            cost: path.cost,
        }
    }

    /// Cheapest path by Dijkstra, `None` if `dst` is unreachable
    pub fn shortest_path(&self, src: &str, dst: &str) -> Result<Option<NamedPath>> {
        let s = self.graph.resolve(src)?;
        let t = self.graph.resolve(dst)?;
        Ok(self
            .graph
            .shortest_path(&self.weights, s, t)?
            .map(|p| self.named_path(p)))
    }

    /// Up to `k` cheapest simple paths by Yen's algorithm; all of them if `k` is `None`
    pub fn k_shortest_paths(&self, src: &str, dst: &str, k: Option<usize>) -> Result<Vec<NamedPath>> {
        let s = self.graph.resolve(src)?;
        let t = self.graph.resolve(dst)?;

        let mut search = KShortestPaths::new();
        search.set_max_paths(k);
        Ok(search
            .run(&self.graph, &self.weights, s, t)?
            .into_iter()
            .map(|p| self.named_path(p))
            .collect())
    }

    /// Cheapest path by A* with a heuristic on vertex names
    pub fn astar<H>(&self, src: &str, dst: &str, heuristic: H) -> Result<Option<NamedPath>>
    where
        H: Fn(&str) -> f64,
    {
        let s = self.graph.resolve(src)?;
        let t = self.graph.resolve(dst)?;
        let graph = &self.graph;
        Ok(graph
            .astar(&self.weights, s, t, |u| heuristic(graph.name_of(u)))?
            .map(|p| self.named_path(p)))
    }

    /// Minimum spanning tree from `root` as named edges, `None` if not all vertices are reachable
    pub fn spanning_tree(&self, root: &str) -> Result<Option<(Vec<(String, String)>, f64)>> {
        let r = self.graph.resolve(root)?;
        let Some(tree) = self.graph.spanning_tree(&self.weights, r)? else {
            return Ok(None);
        };
        let edges = tree
            .edges
            .iter()
            .map(|&Edge(u, v)| {
                (
                    self.graph.name_of(u).to_string(),
                    self.graph.name_of(v).to_string(),
                )
            })
            .collect();
        Ok(Some((edges, tree.cost)))
    }

    /// Walk visiting every vertex along a minimum spanning tree
    pub fn tour(&self) -> Result<Option<Vec<String>>> {
        Ok(self
            .graph
            .tour_nodes(&self.weights)?
            .map(|tour| self.named(tour.nodes)))
    }

    /// Cheapest closed tour through all vertices, starting at the first vertex
    pub fn tsp(&self) -> Result<Option<NamedPath>> {
        Ok(self.graph.tsp(&self.weights)?.map(|p| self.named_path(p)))
    }

    /// Maximum flow with the weights as capacities
    pub fn max_flow(&self, src: &str, dst: &str) -> Result<MaxFlow> {
        let s = self.graph.resolve(src)?;
        let t = self.graph.resolve(dst)?;
        self.graph.max_flow(&self.weights, s, t)
    }

    /// Flow from several sources sharing the capacities, see [`NetworkFlow::multi_flow`]
    pub fn multi_flow(&self, sources: &[&str], sink: &str) -> Result<MultiFlow> {
        let sources = sources
            .iter()
            .map(|name| self.graph.resolve(name))
            .collect::<Result<Vec<_>>>()?;
        let t = self.graph.resolve(sink)?;
        self.graph.multi_flow(&self.weights, &sources, t)
    }

    /// Maximum assignment of agents (vertices with outgoing edges) to tasks
    pub fn assignment(&self) -> Result<Vec<(String, String)>> {
        let assignment = self.graph.bipartite_assignment()?;
        Ok(assignment
            .pairs
            .into_iter()
            .map(|(a, t)| {
                (
                    self.graph.name_of(a).to_string(),
                    self.graph.name_of(t).to_string(),
                )
            })
            .collect())
    }

    /// Cycles as closed walks of names, optionally only those through `through`
    pub fn cycles(&self, through: Option<&str>) -> Result<Vec<Vec<String>>> {
        Ok(self
            .graph
            .find_cycles(through)?
            .into_iter()
            .map(|cycle| self.named(cycle))
            .collect())
    }

    pub fn articulation_points(&self) -> Result<Vec<String>> {
        Ok(self.named(self.graph.articulation_points()?))
    }

    pub fn bridges(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .graph
            .bridges()?
            .into_iter()
            .map(|Edge(u, v)| {
                (
                    self.graph.name_of(u).to_string(),
                    self.graph.name_of(v).to_string(),
                )
            })
            .collect())
    }

    pub fn vertex_cover(&self) -> Vec<String> {
        self.named(self.graph.vertex_cover())
    }

    pub fn euler_circuit(&self, start: &str) -> Result<Vec<String>> {
        let s = self.graph.resolve(start)?;
        Ok(self.named(self.graph.euler_circuit(s)?))
    }

    /// Connected components, or a greedy clique partition if `full_clique` is set
    pub fn components(&self, full_clique: bool) -> Vec<Vec<String>> {
        self.graph
            .components(full_clique)
            .into_iter()
            .map(|group| self.named(group))
            .collect()
    }

    /// Probability of reaching `dst` from `src` with the weights as edge probabilities.
    /// The probabilities of all vertices on `src-dst` paths are stored in vertex attribute `slot`.
    pub fn reach_probability(&mut self, src: &str, dst: &str, slot: usize) -> Result<f64> {
        let s = self.graph.resolve(src)?;
        let t = self.graph.resolve(dst)?;
        ProbabilityPropagation::new()
            .slot(slot)
            .reach_probability(&mut self.graph, &self.weights, s, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roads() -> Session {
        let mut session = Session::new(GraphKind::Undirected);
        session.add_edge("a", "b", 4.0);
        session.add_edge("a", "c", 1.0);
        session.add_edge("c", "b", 2.0);
        session.add_edge("b", "d", 5.0);
        session
    }

    #[test]
    fn paths_by_name() {
        let session = roads();

        let path = session.shortest_path("a", "d").unwrap().unwrap();
        assert_eq!(path.names, vec!["a", "c", "b", "d"]);
        assert_eq!(path.cost, 8.0);

        let paths = session.k_shortest_paths("a", "d", None).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1].names, vec!["a", "b", "d"]);
        assert_eq!(paths[1].cost, 9.0);

        let astar = session.astar("a", "d", |_| 0.0).unwrap().unwrap();
        assert_eq!(astar, path);

        assert_eq!(
            session.shortest_path("a", "x"),
            Err(GraphError::UnknownVertex("x".into()))
        );
    }

    #[test]
    fn structure_by_name() {
        let session = roads();
        assert_eq!(session.articulation_points().unwrap(), vec!["b"]);
        assert_eq!(
            session.bridges().unwrap(),
            vec![("b".to_string(), "d".to_string())]
        );
        assert_eq!(session.components(false), vec![vec!["a", "b", "c", "d"]]);
        assert_eq!(session.cycles(Some("c")).unwrap().len(), 1);

        let (edges, cost) = session.spanning_tree("a").unwrap().unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(cost, 8.0);
    }

    #[test]
    fn remove_vertex_keeps_weights() {
        let mut session = roads();
        session.remove_vertex("c").unwrap();

        assert_eq!(session.weight("a", "b"), Some(4.0));
        assert_eq!(session.weight("d", "b"), Some(5.0));
        assert_eq!(session.weight("a", "c"), None);

        let path = session.shortest_path("a", "d").unwrap().unwrap();
        assert_eq!(path.cost, 9.0);

        assert!(session.remove_edge("a", "b").unwrap());
        assert_eq!(session.shortest_path("a", "d").unwrap(), None);
    }

    #[test]
    fn flows_and_probabilities() {
        let mut session = Session::new(GraphKind::Directed);
        session.add_edge("s", "a", 0.5);
        session.add_edge("s", "b", 0.5);
        session.add_edge("a", "t", 1.0);
        session.add_edge("b", "t", 1.0);

        assert_eq!(session.max_flow("s", "t").unwrap().total, 1.0);
        assert_eq!(session.reach_probability("s", "t", 0).unwrap(), 0.75);
        assert_eq!(session.graph().vertex_attribute(3, 0), "0.75");
    }

    #[test]
    fn edge_list_round_trip() {
        let session = roads();
        let mut buffer = Vec::new();
        session.write_edge_list(&mut buffer).unwrap();

        let again = Session::read_edge_list(buffer.as_slice(), GraphKind::Undirected).unwrap();
        assert_eq!(again.weights(), session.weights());
        assert_eq!(
            again.shortest_path("a", "d").unwrap(),
            session.shortest_path("a", "d").unwrap()
        );
    }
}
