/*!
# Graph Generators

Random and deterministic graph builders, mostly used to feed randomized checks of the algorithms.

Generators follow a builder-style pattern:

1. Create a generator instance (e.g., `Gnp::new()`).
2. Set parameters using trait methods (e.g., `.nodes(n).prob(p)`).
3. Generate edges via `generate()` or `stream()`, or a complete [`Graph`] via `graph()`.

Supported models:
- G(n,p): Erdős–Rényi model with independent edge probability
- Substructures: paths, cycles and cliques connected inside an existing graph
*/

use rand::Rng;

use crate::prelude::*;

mod gnp;
mod substructures;

pub use gnp::*;
pub use substructures::*;

/// Generators with a configurable number of nodes
pub trait NumNodesGen {
    fn nodes(self, n: NumNodes) -> Self;
}

/// Generators with a configurable expected average degree
pub trait AverageDegreeGen {
    fn avg_deg(self, deg: f64) -> Self;
}

/// A configured random edge generator
pub trait GraphGenerator {
    /// Collects [`GraphGenerator::stream`]
    fn generate<R>(&self, rng: &mut R) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Draws edges lazily
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng;

    /// Returns the number of nodes the generated edges refer to
    fn number_of_nodes(&self) -> NumNodes;

    /// Builds a graph of the given kind from a stream of edges.
    /// For undirected graphs only normalized edges are kept, so every pair is drawn once.
    fn graph<R>(&self, kind: GraphKind, rng: &mut R) -> Graph
    where
        R: Rng,
    {
        let n = self.number_of_nodes();
        Graph::from_edges(
            kind,
            n,
            self.stream(rng)
                .filter(|e| kind == GraphKind::Directed || e.is_normalized()),
        )
    }
}
