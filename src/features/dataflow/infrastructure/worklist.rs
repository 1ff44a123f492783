//! Generic monotone worklist driver: seed a deque with the entry node; while non-empty,
//! dequeue `n`, collect the `after` values of its `before` neighbors, compute
//! `before := meet(...)`, store it, compute `after := transfer(n, before)`, and if `after`
//! changed, enqueue all `after` neighbors.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use crate::features::cfg::domain::ControlFlowGraph;
use crate::features::dataflow::ports::DataflowAnalysis;

/// The `before` and `after` value at every node the worklist actually visited. A node
/// unreachable from the traversal's starting point (dead code, mirroring the post-dominator
/// table's "unreachable nodes ... must not be consulted") simply has no entry in either map.
pub struct DataflowResult<V> {
    pub before: HashMap<NodeIndex, V>,
    pub after: HashMap<NodeIndex, V>,
}

/// Runs `analysis` to a fixed point over `cfg`. Both concrete instantiations are forward, so
/// the queue seeds from the entry node; a backward analysis (none is instantiated here, but
/// the driver supports the direction flag uniformly) seeds from exit instead.
pub fn run<V, A>(cfg: &ControlFlowGraph, analysis: &A) -> DataflowResult<V>
where
    V: Clone + PartialEq,
    A: DataflowAnalysis<V>,
{
    let forward = analysis.is_forward();
    let start = if forward { cfg.entry } else { cfg.exit };

    let mut before: HashMap<NodeIndex, V> = HashMap::new();
    let mut after: HashMap<NodeIndex, V> = HashMap::new();

    let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);
    let mut queued: HashSet<NodeIndex> = HashSet::from([start]);

    while let Some(n) = queue.pop_front() {
        queued.remove(&n);

        let before_neighbors = if forward {
            cfg.predecessors(n)
        } else {
            cfg.successors(n)
        };
        let incoming: Vec<&V> = before_neighbors.iter().filter_map(|p| after.get(p)).collect();
        let before_val = if incoming.is_empty() {
            analysis.initial()
        } else {
            analysis.meet(incoming)
        };

        let after_val = analysis.transfer(n, &before_val);
        let changed = after.get(&n) != Some(&after_val);

        before.insert(n, before_val);
        if changed {
            after.insert(n, after_val);
            let after_neighbors = if forward {
                cfg.successors(n)
            } else {
                cfg.predecessors(n)
            };
            for nb in after_neighbors {
                if queued.insert(nb) {
                    queue.push_back(nb);
                }
            }
        }
    }

    DataflowResult { before, after }
}
