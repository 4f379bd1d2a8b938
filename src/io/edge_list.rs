//! # EdgeList
//!
//! The named EdgeList-Format consists of non-comment-lines of the form
//! - `source target weight` : a weighted edge between two named vertices,
//! - `source target` : an edge with the default weight,
//! - `name` : an isolated vertex.
//!
//! Vertices are created in order of their first appearance. Tokens are separated by
//! whitespace, hence names must not contain any. Empty lines are skipped.

use std::{
    fs::File,
    io::{BufRead, BufWriter, ErrorKind, Write},
    path::Path,
};

use stream_bitset::prelude::*;
use tracing::debug;

use super::*;

/// A GraphReader for the named EdgeList-Format
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// Kind of the graph to build
    kind: GraphKind,
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
    /// Weight of edges without an explicit weight
    default_weight: f64,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            kind: GraphKind::Directed,
            comment_identifier: "#".to_string(),
            default_weight: 1.0,
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader for directed graphs
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the kind of the graph to build
    pub fn set_kind(&mut self, kind: GraphKind) {
        self.kind = kind;
    }

    /// Chainable version of [`EdgeListReader::set_kind`]
    pub fn kind(mut self, kind: GraphKind) -> Self {
        self.set_kind(kind);
        self
    }

    /// Updates the comment identifier
    pub fn set_comment_identifier<S: Into<String>>(&mut self, c: S) {
        self.comment_identifier = c.into();
    }

    /// Chainable version of [`EdgeListReader::set_comment_identifier`]
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> Self {
        self.set_comment_identifier(c);
        self
    }

    /// Sets the weight of edges given without one
    pub fn set_default_weight(&mut self, weight: f64) {
        self.default_weight = weight;
    }

    /// Chainable version of [`EdgeListReader::set_default_weight`]
    pub fn default_weight(mut self, weight: f64) -> Self {
        self.set_default_weight(weight);
        self
    }

    /// Reads a graph together with its edge weights, indexed by edge id
    pub fn try_read_weighted<R: BufRead>(&self, reader: R) -> Result<(Graph, Vec<f64>)> {
        let mut graph = Graph::new(self.kind, 0);
        let mut weights = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with(&self.comment_identifier) {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            raise_error_unless!(
                tokens.len() <= 3,
                ErrorKind::InvalidData,
                format!("Line {}: expected at most 3 tokens, got {}", number + 1, tokens.len())
            );

            match tokens.as_slice() {
                [name] => {
                    graph.vertex_or_insert(name);
                }
                [src, dst, rest @ ..] => {
                    let weight = match rest.first() {
                        Some(token) => parse_value!(token, "edge weight"),
                        None => self.default_weight,
                    };

                    let u = graph.vertex_or_insert(src);
                    let v = graph.vertex_or_insert(dst);
                    graph.add_weighted_edge(&mut weights, u, v, weight);
                }
                [] => {}
            }
        }

        let slots = graph.number_of_edge_slots() as usize;
        weights.resize(slots, self.default_weight);

        debug!(
            n = graph.number_of_nodes(),
            m = graph.number_of_edges(),
            "read edge list"
        );
        Ok((graph, weights))
    }
}

impl GraphReader<Graph> for EdgeListReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<Graph> {
        Ok(self.try_read_weighted(reader)?.0)
    }
}

/// Trait for creating graphs from an EdgeListReader.
/// Used as shorthand for default EdgeListReader settings.
pub trait EdgeListRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_edge_list<R: BufRead>(reader: R, kind: GraphKind) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_edge_list_file<P: AsRef<Path>>(path: P, kind: GraphKind) -> Result<Self> {
        Self::try_read_edge_list(BufReader::new(File::open(path)?), kind)
    }
}

impl EdgeListRead for Graph {
    fn try_read_edge_list<R: BufRead>(reader: R, kind: GraphKind) -> Result<Self> {
        EdgeListReader::new().kind(kind).try_read_graph(reader)
    }
}

/// A writer for the named EdgeList-Format
#[derive(Debug, Clone, Default)]
pub struct EdgeListWriter<'a> {
    /// Weights indexed by edge id; edges are written without weight if unset
    weights: Option<&'a [f64]>,
}

impl<'a> EdgeListWriter<'a> {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the weight of every edge as third token
    pub fn set_weights(&mut self, weights: &'a [f64]) {
        self.weights = Some(weights);
    }

    /// Chainable version of [`EdgeListWriter::set_weights`]
    pub fn weights(mut self, weights: &'a [f64]) -> Self {
        self.set_weights(weights);
        self
    }
}

impl<G> GraphWriter<G> for EdgeListWriter<'_>
where
    G: AdjacencyList + EdgeLookup + NamedVertices,
{
    fn try_write_graph<W: Write>(&self, graph: &G, mut writer: W) -> Result<()> {
        let mut touched = graph.vertex_bitset_unset();

        for u in graph.vertices() {
            for (e, v) in graph.out_edges_of(u) {
                if graph.is_undirected() && u > v {
                    continue;
                }
                touched.set_bit(u);
                touched.set_bit(v);

                write!(writer, "{} {}", graph.name_of(u), graph.name_of(v))?;
                if let Some(weights) = self.weights {
                    if let Some(w) = weights.get(e as usize) {
                        write!(writer, " {w}")?;
                    }
                }
                writeln!(writer)?;
            }
        }

        for u in graph.vertices().filter(|&u| !touched.get_bit(u)) {
            writeln!(writer, "{}", graph.name_of(u))?;
        }

        Ok(())
    }
}

/// Trait for writing a graph to a writer in the EdgeList-Format.
/// Shorthand for default settings.
pub trait EdgeListWrite {
    /// Tries to write the graph to a writer
    fn try_write_edge_list<W: Write>(&self, writer: W) -> Result<()>;

    /// Tries to write the graph to a file
    fn try_write_edge_list_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_edge_list(writer)
    }
}

impl<G> EdgeListWrite for G
where
    G: AdjacencyList + EdgeLookup + NamedVertices,
{
    fn try_write_edge_list<W: Write>(&self, writer: W) -> Result<()> {
        EdgeListWriter::default().try_write_graph(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    const INPUT: &str = "# a small road network\n\
                         a b 7\n\
                         b c 2.5\n\
                         \n\
                         a c\n\
                         lonely\n";

    #[test]
    fn read_named_weighted() {
        let (graph, weights) = EdgeListReader::new()
            .try_read_weighted(INPUT.as_bytes())
            .unwrap();

        assert!(graph.is_directed());
        assert_eq!(graph.names_of(graph.vertices()), vec!["a", "b", "c", "lonely"]);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(weights, vec![7.0, 2.5, 1.0]);
        assert_eq!(graph.degree_of(3), 0);
    }

    #[test]
    fn read_undirected_with_default_weight() {
        let (graph, weights) = EdgeListReader::new()
            .kind(GraphKind::Undirected)
            .default_weight(3.0)
            .try_read_weighted(INPUT.as_bytes())
            .unwrap();

        assert_eq!(graph.number_of_edges(), 3);
        let e = graph.find_edge(2, 0).unwrap();
        assert_eq!(weights[e as usize], 3.0);
        let e = graph.find_edge(1, 0).unwrap();
        assert_eq!(weights[e as usize], 7.0);
    }

    #[test]
    fn malformed_lines() {
        let too_long = EdgeListReader::new().try_read_weighted("a b 1 2\n".as_bytes());
        assert_eq!(too_long.unwrap_err().kind(), ErrorKind::InvalidData);

        let bad_weight = EdgeListReader::new().try_read_weighted("a b heavy\n".as_bytes());
        assert_eq!(bad_weight.unwrap_err().kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn write_then_read_keeps_names() {
        let (graph, weights) = EdgeListReader::new()
            .kind(GraphKind::Undirected)
            .try_read_weighted(INPUT.as_bytes())
            .unwrap();

        let mut buffer = Vec::new();
        EdgeListWriter::new()
            .weights(&weights)
            .try_write_graph(&graph, &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().collect_vec(), vec!["a b 7", "a c 1", "b c 2.5", "lonely"]);

        let (again, _) = EdgeListReader::new()
            .kind(GraphKind::Undirected)
            .try_read_weighted(text.as_bytes())
            .unwrap();
        assert_eq!(again.names_of(again.vertices()), vec!["a", "b", "c", "lonely"]);
        assert_eq!(again.number_of_edges(), graph.number_of_edges());
    }
}
