use rand_distr::{Distribution, Geometric};

use crate::{gens::*, utils::*};

/// A G(n, p) graph can be defined by either a probability or the average degree which is more
/// common in practice
#[derive(Debug, Copy, Clone, Default)]
enum GnpType {
    /// No value has been set yet
    #[default]
    NotSet,
    /// Direct probability value
    Prob(f64),
    /// Average degree of a node
    AvgDeg(f64),
}

/// `G(n,p)` graphs generate every possible (directed) edge in a graph with `n` nodes with
/// probability `p` independent from each other.
///
/// Self-loops are skipped unless enabled with [`Gnp::loops`].
#[derive(Debug, Copy, Clone, Default)]
pub struct Gnp {
    n: NumNodes,
    p: GnpType,
    loops: bool,
}

impl Gnp {
    /// Creates a new empty `G(n,p)` generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates `p` directly
    pub fn prob(mut self, prob: f64) -> Self {
        assert!(prob.is_valid_probability());
        self.p = GnpType::Prob(prob);
        self
    }

    /// Allow self-loops
    pub fn loops(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    fn probability(&self) -> f64 {
        let p = match self.p {
            GnpType::NotSet => panic!("Probability of Gnp was not set!"),
            GnpType::Prob(p) => p,
            GnpType::AvgDeg(d) => d / self.n as f64,
        };
        assert!(
            p.is_valid_probability(),
            "The average degree is invalid for the given n!"
        );
        p
    }
}

impl NumNodesGen for Gnp {
    /// Updates `n`
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl AverageDegreeGen for Gnp {
    /// Updates `p` such that `p = d/n`.
    /// Note that this conversion will only be done when calling `stream/generate`.
    fn avg_deg(mut self, deg: f64) -> Self {
        self.p = GnpType::AvgDeg(deg);
        self
    }
}

impl GraphGenerator for Gnp {
    /// Creates a streaming generator over random `G(n,p)` edges.
    /// Instead of drawing a coin per pair, we jump over the non-edges with geometrically
    /// distributed step sizes.
    fn stream<R: Rng>(&self, rng: &mut R) -> impl Iterator<Item = Edge> {
        assert!(self.n > 0, "At least one node must be generated!");
        let p = self.probability();
        let n = self.n as u64;
        let max_value = n * n;
        let loops = self.loops;

        // p == 0 never yields a success, so no jumps are drawn at all
        let jumps = Geometric::new(p).ok().filter(|_| p > 0.0);
        let mut next: u64 = 0;

        std::iter::from_fn(move || {
            let distr = jumps.as_ref()?;
            let x = next.checked_add(distr.sample(rng))?;
            if x >= max_value {
                return None;
            }
            next = x + 1;
            Some(x)
        })
        .map(move |x| Edge::from_u64(x, n))
        .filter(move |e| loops || !e.is_loop())
    }

    fn number_of_nodes(&self) -> NumNodes {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn extreme_probabilities() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        assert!(Gnp::new().nodes(10).prob(0.0).generate(rng).is_empty());

        let full = Gnp::new().nodes(10).prob(1.0).generate(rng);
        assert_eq!(full.len(), 90);

        let with_loops = Gnp::new().nodes(10).prob(1.0).loops(true).generate(rng);
        assert_eq!(with_loops.len(), 100);
    }

    #[test]
    fn average_degree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(2);
        let n = 400;
        let m = Gnp::new().nodes(n).avg_deg(10.0).stream(rng).count() as f64;
        assert!((m / n as f64 - 10.0).abs() < 1.0);
    }

    #[test]
    fn undirected_graph_draws_each_pair_once() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let g = Gnp::new().nodes(20).prob(1.0).graph(GraphKind::Undirected, rng);
        assert_eq!(g.number_of_edges(), 20 * 19 / 2);
        assert_eq!(g.number_of_edge_slots(), 20 * 19);
    }
}
