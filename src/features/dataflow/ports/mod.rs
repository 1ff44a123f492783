//! The monotone dataflow analysis contract: label, direction, meet, and transfer are the
//! only moving parts a concrete analysis supplies — the worklist driver in
//! `infrastructure::worklist` is generic over all four.

use petgraph::graph::NodeIndex;

pub trait DataflowAnalysis<V> {
    /// Key this analysis's state is stored under; purely descriptive here since results are
    /// returned as typed maps rather than stashed on the CFG node itself.
    fn label(&self) -> &'static str;

    /// Forward analyses meet over predecessors and propagate along successors; backward
    /// analyses do the reverse. Both instantiations in this crate are forward.
    fn is_forward(&self) -> bool;

    /// The value assumed at a node with no "before" neighbors yet visited (function entry,
    /// for a forward analysis).
    fn initial(&self) -> V;

    /// Join of the "before" neighbors' after-values. Called with an empty vector only when a
    /// node has no before-neighbors at all, and `initial()` governs that case instead.
    fn meet(&self, incoming: Vec<&V>) -> V;

    /// Per-node effect: the after-value for `node` given its before-value.
    fn transfer(&self, node: NodeIndex, before: &V) -> V;
}
