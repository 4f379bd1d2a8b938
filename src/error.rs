/*!
# Errors

Every fallible operation of this crate returns [`Result`] with a [`GraphError`].
Infeasibility (no path, no spanning tree, no tour) is not an error and is reported as `None`
or an empty collection instead.
*/

use thiserror::Error;

use crate::{
    edge::EdgeId,
    node::{Node, NumNodes},
    ops::GraphKind,
};

/// Errors raised by graph construction and the algorithms on top of it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("vertex name already in use: {0}")]
    DuplicateName(String),

    #[error("unknown vertex: {0}")]
    UnknownVertex(String),

    #[error("vertex index {index} out of range for a graph with {len} vertices")]
    BadIndex { index: Node, len: NumNodes },

    #[error("weight vector too short: expected at least {expected} entries, got {got}")]
    WeightLength { expected: usize, got: usize },

    #[error("edge {edge} has negative or undefined weight {weight}")]
    NegativeWeight { edge: EdgeId, weight: f64 },

    #[error("edge {edge} carries {value}, which is not a probability")]
    InvalidProbability { edge: EdgeId, value: f64 },

    #[error("{algorithm} requires a {expected} graph")]
    WrongGraphKind {
        algorithm: &'static str,
        expected: GraphKind,
    },

    #[error("vertex {vertex} has in-degree {in_degree} but out-degree {out_degree}")]
    NotEulerian {
        vertex: Node,
        in_degree: NumNodes,
        out_degree: NumNodes,
    },

    #[error("graph contains a cycle through vertex {0}")]
    NotAcyclic(Node),

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("source and target must differ (both are {0})")]
    IdenticalEndpoints(Node),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            GraphError::DuplicateName("a".into()).to_string(),
            "vertex name already in use: a"
        );
        assert_eq!(
            GraphError::WeightLength {
                expected: 4,
                got: 2
            }
            .to_string(),
            "weight vector too short: expected at least 4 entries, got 2"
        );
        assert_eq!(
            GraphError::WrongGraphKind {
                algorithm: "max_flow",
                expected: GraphKind::Directed
            }
            .to_string(),
            "max_flow requires a directed graph"
        );
    }
}
