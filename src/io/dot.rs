//! # Dot
//!
//! The Dot-Format is a very extensive format used by [GraphViz](https://graphviz.org/) to allow
//! for detailed visualizations. We only use basic functionality: vertices are drawn with their
//! names, edges optionally carry their weight as label and the edges of a path can be
//! highlighted, e.g. the result of a shortest path query:
//! ```ignore
//! let path = graph.shortest_path(&weights, s, t)?.unwrap();
//! DotWriter::new()
//!     .weights(&weights)
//!     .highlight_path(&path.nodes)
//!     .try_write_graph(&graph, &mut writer)?;
//! ```
//!
//! If a vertex attribute slot is configured, its non-empty values are appended to the vertex
//! labels (e.g. the probabilities written by
//! [`ProbabilityPropagation`](crate::algo::ProbabilityPropagation)).

use std::{fmt::Display, io::Write};

use itertools::Itertools;

use super::*;

/// A writer for the Dot-Format
#[derive(Debug, Clone)]
pub struct DotWriter<'a> {
    /// Weights indexed by edge id, written as edge labels
    weights: Option<&'a [f64]>,
    /// Vertex attribute slot appended to vertex labels
    attribute_slot: Option<usize>,
    /// Edges drawn in `highlight_color`
    highlighted: Vec<Edge>,
    highlight_color: DotColor,
}

impl Default for DotWriter<'_> {
    fn default() -> Self {
        Self {
            weights: None,
            attribute_slot: None,
            highlighted: Vec::new(),
            highlight_color: DotColor::Red,
        }
    }
}

impl<'a> DotWriter<'a> {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels every edge with its weight
    pub fn set_weights(&mut self, weights: &'a [f64]) {
        self.weights = Some(weights);
    }

    /// Chainable version of [`DotWriter::set_weights`]
    pub fn weights(mut self, weights: &'a [f64]) -> Self {
        self.set_weights(weights);
        self
    }

    /// Appends the given vertex attribute to the vertex labels
    pub fn set_attribute_slot(&mut self, slot: usize) {
        self.attribute_slot = Some(slot);
    }

    /// Chainable version of [`DotWriter::set_attribute_slot`]
    pub fn attribute_slot(mut self, slot: usize) -> Self {
        self.set_attribute_slot(slot);
        self
    }

    /// Highlights the edges between consecutive vertices of `path`.
    /// Can be called multiple times to highlight several paths.
    pub fn add_highlighted_path(&mut self, path: &[Node]) {
        self.highlighted
            .extend(path.iter().tuple_windows().map(|(&u, &v)| Edge(u, v)));
    }

    /// Chainable version of [`DotWriter::add_highlighted_path`]
    pub fn highlight_path(mut self, path: &[Node]) -> Self {
        self.add_highlighted_path(path);
        self
    }

    /// Sets the color of highlighted edges (red by default)
    pub fn set_highlight_color(&mut self, color: DotColor) {
        self.highlight_color = color;
    }

    /// Chainable version of [`DotWriter::set_highlight_color`]
    pub fn highlight_color(mut self, color: DotColor) -> Self {
        self.set_highlight_color(color);
        self
    }

    fn is_highlighted(&self, Edge(u, v): Edge, directed: bool) -> bool {
        self.highlighted
            .iter()
            .any(|&Edge(a, b)| (a == u && b == v) || (!directed && a == v && b == u))
    }
}

fn escaped(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quotes a DOT identifier
fn quoted(text: &str) -> String {
    format!("\"{}\"", escaped(text))
}

impl<G> GraphWriter<G> for DotWriter<'_>
where
    G: AdjacencyList + NamedVertices + AttributeOverlay,
{
    fn try_write_graph<W>(&self, graph: &G, mut writer: W) -> Result<()>
    where
        W: Write,
    {
        let directed = graph.is_directed();
        let (graph_name, edge_dir) = if directed {
            ("digraph", "->")
        } else {
            ("graph", "--")
        };
        writeln!(writer, "{graph_name} {{")?;

        for u in graph.vertices() {
            let name = graph.name_of(u);
            let extra = self
                .attribute_slot
                .map(|slot| graph.vertex_attribute(u, slot))
                .filter(|value| !value.is_empty());

            match extra {
                Some(value) => writeln!(
                    writer,
                    "  {} [label=\"{}\\n{}\"];",
                    quoted(name),
                    escaped(name),
                    escaped(value)
                )?,
                None => writeln!(writer, "  {};", quoted(name))?,
            }
        }

        for u in graph.vertices() {
            for (e, v) in graph.out_edges_of(u) {
                if !directed && u > v {
                    continue;
                }

                let mut attrs = Vec::new();
                if let Some(w) = self.weights.and_then(|weights| weights.get(e as usize)) {
                    attrs.push(format!("label={}", quoted(&w.to_string())));
                }
                if self.is_highlighted(Edge(u, v), directed) {
                    attrs.push(format!("color={}, penwidth=2", self.highlight_color));
                }

                write!(
                    writer,
                    "  {} {edge_dir} {}",
                    quoted(graph.name_of(u)),
                    quoted(graph.name_of(v))
                )?;
                if !attrs.is_empty() {
                    write!(writer, " [{}]", attrs.join(", "))?;
                }
                writeln!(writer, ";")?;
            }
        }

        writeln!(writer, "}}")
    }
}

/// Trait for writing a graph to a writer in the Dot-Format.
/// Shorthand for default settings.
pub trait DotWrite {
    /// Tries to write the graph to a writer
    fn try_write_dot<W>(&self, writer: W) -> Result<()>
    where
        W: Write;

    /// Tries to write the graph to a file
    fn try_write_dot_file<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_dot(writer)
    }
}

impl<G> DotWrite for G
where
    G: AdjacencyList + NamedVertices + AttributeOverlay,
{
    fn try_write_dot<W>(&self, writer: W) -> Result<()>
    where
        W: Write,
    {
        DotWriter::default().try_write_graph(self, writer)
    }
}

impl Display for DotColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_lowercase())
    }
}

/// Colors usable for highlighting, named as in
/// `https://graphviz.gitlab.io/doc/info/colors.html#svg`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DotColor {
    Black,
    Blue,
    Crimson,
    DarkGreen,
    Gold,
    Gray,
    Green,
    Magenta,
    Orange,
    Purple,
    Red,
    SteelBlue,
}
