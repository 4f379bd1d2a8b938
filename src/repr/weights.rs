/*!
# Edge Weights

Weights, capacities and probabilities live outside the graph in containers indexed by
[`EdgeId`]. Any container implementing [`EdgeWeights`] can be passed to the algorithms; the
common case is a `Vec<f64>` with one entry per edge record.

Since removed edges keep their id, a weight vector must cover all edge slots, not only the
live edges (see [`GraphEdgeOrder::number_of_edge_slots`]).
*/

use super::*;

/// Read access to per-edge values
pub trait EdgeWeights {
    /// Returns the value associated with edge `e`
    /// ** Might panic if `e` is not covered **
    fn weight(&self, e: EdgeId) -> f64;

    /// Returns the number of covered edge ids or `None` if every id is covered
    fn num_entries(&self) -> Option<usize>;
}

impl EdgeWeights for [f64] {
    fn weight(&self, e: EdgeId) -> f64 {
        self[e as usize]
    }

    fn num_entries(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl EdgeWeights for Vec<f64> {
    fn weight(&self, e: EdgeId) -> f64 {
        self[e as usize]
    }

    fn num_entries(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<W: EdgeWeights + ?Sized> EdgeWeights for &W {
    fn weight(&self, e: EdgeId) -> f64 {
        (**self).weight(e)
    }

    fn num_entries(&self) -> Option<usize> {
        (**self).num_entries()
    }
}

/// Every edge has weight `1`. Turns weighted algorithms into hop-count variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitWeights;

impl EdgeWeights for UnitWeights {
    fn weight(&self, _: EdgeId) -> f64 {
        1.0
    }

    fn num_entries(&self) -> Option<usize> {
        None
    }
}

/// Weights computed on demand by a closure
#[derive(Debug, Clone, Copy)]
pub struct WeightFn<F>(pub F);

impl<F: Fn(EdgeId) -> f64> EdgeWeights for WeightFn<F> {
    fn weight(&self, e: EdgeId) -> f64 {
        (self.0)(e)
    }

    fn num_entries(&self) -> Option<usize> {
        None
    }
}

/// Validation and evaluation of weights against a graph
pub trait WeightedGraph: EdgeLookup + GraphEdgeOrder {
    /// Fails with [`GraphError::WeightLength`] if `weights` does not cover every edge slot
    fn check_weights<W: EdgeWeights + ?Sized>(&self, weights: &W) -> Result<()> {
        let expected = self.number_of_edge_slots() as usize;
        match weights.num_entries() {
            Some(got) if got < expected => Err(GraphError::WeightLength { expected, got }),
            _ => Ok(()),
        }
    }

    /// As [`WeightedGraph::check_weights`], additionally failing with
    /// [`GraphError::NegativeWeight`] if a live edge has a negative or NaN weight
    fn check_non_negative_weights<W: EdgeWeights + ?Sized>(&self, weights: &W) -> Result<()> {
        self.check_weights(weights)?;
        for e in self.edge_ids() {
            let weight = weights.weight(e);
            if weight.is_nan() || weight < 0.0 {
                return Err(GraphError::NegativeWeight { edge: e, weight });
            }
        }
        Ok(())
    }

    /// Sums the weights along consecutive vertices of `path`.
    /// Returns `None` if some consecutive pair is not connected by an edge.
    fn path_cost<W: EdgeWeights + ?Sized>(&self, weights: &W, path: &[Node]) -> Option<f64> {
        path.windows(2)
            .map(|w| self.find_edge(w[0], w[1]).map(|e| weights.weight(e)))
            .sum()
    }
}

impl<G: EdgeLookup + GraphEdgeOrder> WeightedGraph for G {}

/// Inserting edges together with their weight
pub trait WeightedEdgeEditing: GraphEdgeEditing + EdgeLookup + GraphEdgeOrder + GraphType {
    /// Adds edge `(u, v)` and stores `weight` for its record(s), growing `weights` to cover all
    /// edge slots. Slots not written by this call default to `1.0`.
    fn add_weighted_edge(&mut self, weights: &mut Vec<f64>, u: Node, v: Node, weight: f64) -> EdgeId {
        let e = self.add_edge(u, v);
        let slots = self.number_of_edge_slots() as usize;
        if weights.len() < slots {
            weights.resize(slots, 1.0);
        }

        weights[e as usize] = weight;
        if self.is_undirected() {
            if let Some(r) = self.find_edge(v, u) {
                weights[r as usize] = weight;
            }
        }
        e
    }
}

impl<G: GraphEdgeEditing + EdgeLookup + GraphEdgeOrder + GraphType> WeightedEdgeEditing for G {}
