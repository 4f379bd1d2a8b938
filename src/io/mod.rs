/*!
# IO

Reading graphs from and writing graphs to text formats.

## Formats

- **EdgeList**: one edge per line, written as `source target [weight]` with vertex *names*.
  A line with a single name adds an isolated vertex. Supports reading and writing.
- **Dot**: The [DOT language](https://graphviz.org/doc/info/lang.html) of [GraphViz](https://graphviz.org/).
  Write-only; used to visualize graphs with their names, weights and highlighted paths.
  Rendering the output is left to the caller.

## Traits

To generalize over reading/writing:
- [`GraphReader`] and [`GraphWriter`] are implemented by readers and writers for a specific format.
- [`GraphRead`] and [`GraphWrite`] abstract over reading/writing using a given [`FileFormat`].

## Example

```
use lgraphs::{prelude::*, io::*};

let input = "# two roads\na b 2\nb c\n";
let format: FileFormat = "edgelist".parse().unwrap();
let graph = Graph::try_from_reader(input.as_bytes(), GraphKind::Undirected, format).unwrap();
assert_eq!(graph.number_of_edges(), 2);

let mut buffer = Vec::new();
graph.try_write_to_writer(&mut buffer, FileFormat::EdgeList).unwrap();
assert_eq!(String::from_utf8(buffer).unwrap(), "a b\nb c\n");
```

Weights are not part of a [`Graph`]. Use [`EdgeListReader::try_read_weighted`] and
[`EdgeListWriter::weights`] to carry them through the edge list format.
*/

pub mod dot;
pub mod edge_list;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, ErrorKind, Result, Write},
    path::Path,
    str::FromStr,
};

use crate::prelude::*;

pub use dot::*;
pub use edge_list::*;

/// Identifier for a graph file format.
/// Parsed case-insensitively from `"dot"` and `"edgelist"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// DOT language of GraphViz
    Dot,
    /// Named edge list format
    EdgeList,
}

impl FromStr for FileFormat {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(FileFormat::Dot),
            "edgelist" => Ok(FileFormat::EdgeList),
            _ => Err(io_error!(
                ErrorKind::InvalidInput,
                format!("Unknown FileFormat: {s}")
            )),
        }
    }
}

/// Trait for types that can read graphs in a specific format
///
/// # Examples
/// ```
/// use lgraphs::{prelude::*, io::*};
///
/// let graph: Graph = EdgeListReader::new()
///     .comment_identifier("%")
///     .try_read_graph("% header\nx y\nz\n".as_bytes())
///     .unwrap();
/// assert_eq!(graph.names_of(graph.vertices()), vec!["x", "y", "z"]);
/// assert!(graph.has_edge(0, 1));
/// ```
pub trait GraphReader<G> {
    /// Reads a graph from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation
    /// of a graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Trait for types that can write graphs in a specific format
///
/// # Examples
/// ```
/// use lgraphs::{prelude::*, io::*};
///
/// let graph = Graph::from_named_edges(GraphKind::Directed, [("u", "v")]);
/// let weights = vec![2.5];
///
/// let mut buffer = Vec::new();
/// EdgeListWriter::new()
///     .weights(&weights)
///     .try_write_graph(&graph, &mut buffer)
///     .unwrap();
/// assert_eq!(String::from_utf8(buffer).unwrap(), "u v 2.5\n");
/// ```
pub trait GraphWriter<G> {
    /// Writes the given graph to the provided writer according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if writing fails (e.g., IO errors).
    fn try_write_graph<W>(&self, graph: &G, writer: W) -> Result<()>
    where
        W: Write;

    /// Writes the given graph to a file according to the settings in `self`
    fn try_write_graph_file<P>(&self, graph: &G, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

/// Trait for reading graphs when only a [`FileFormat`] is known.
/// Only [`FileFormat::EdgeList`] can be read; DOT is write-only.
pub trait GraphRead: Sized {
    /// Reads a graph of the given kind according to the specified [`FileFormat`].
    ///
    /// # Errors
    /// Returns an error if the format is unsupported for reading
    /// or if the input does not match the expected format.
    fn try_from_reader<R>(reader: R, kind: GraphKind, format: FileFormat) -> Result<Self>
    where
        R: BufRead;

    /// Reads a graph from the given file according to the specified [`FileFormat`]
    fn try_from_file<P>(path: P, kind: GraphKind, format: FileFormat) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::try_from_reader(BufReader::new(File::open(path)?), kind, format)
    }
}

impl GraphRead for Graph {
    fn try_from_reader<R>(reader: R, kind: GraphKind, format: FileFormat) -> Result<Self>
    where
        R: BufRead,
    {
        match format {
            FileFormat::EdgeList => EdgeListReader::new().kind(kind).try_read_graph(reader),
            FileFormat::Dot => Err(io_error!(
                ErrorKind::InvalidInput,
                format!("{format:?} does not support GraphRead")
            )),
        }
    }
}

/// Trait for writing graphs when only a [`FileFormat`] is known
pub trait GraphWrite {
    /// Writes the graph to the given writer according to the specified [`FileFormat`].
    ///
    /// # Errors
    /// Returns an error if writing fails (e.g., IO errors).
    fn try_write_to_writer<W>(&self, writer: W, format: FileFormat) -> Result<()>
    where
        W: Write;

    /// Writes the graph to the given file according to the specified [`FileFormat`]
    fn try_write_to_file<P>(&self, path: P, format: FileFormat) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_to_writer(BufWriter::new(File::create(path)?), format)
    }
}

impl<G> GraphWrite for G
where
    G: EdgeListWrite + DotWrite,
{
    fn try_write_to_writer<W>(&self, writer: W, format: FileFormat) -> Result<()>
    where
        W: Write,
    {
        match format {
            FileFormat::EdgeList => self.try_write_edge_list(writer),
            FileFormat::Dot => self.try_write_dot(writer),
        }
    }
}

/// Shorthand for creating a new IO-error
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Shorthand for returning `Err(std::io::Error)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Tries to parse a token and returns early if it fails
macro_rules! parse_value {
    ($token : expr, $name : expr) => {
        match $token.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(io_error!(
                    ErrorKind::InvalidData,
                    format!("Invalid value {:?} found. Cannot parse {}.", $token, $name)
                ))
            }
        }
    };
}

use io_error;
use parse_value;
use raise_error_unless;
