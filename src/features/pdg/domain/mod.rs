//! Program dependence graph domain model. One PDG node per CFG node, with control- and
//! data-dependence edges pointed "dependent -> dependency" so a backward slice is simply a
//! DFS following edges out of the target, rather than walking edges in reverse.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::features::ast::domain::AstNodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdgEdgeKind {
    ControlDependence,
    DataDependence,
}

#[derive(Debug, Clone)]
pub struct PdgNode {
    pub cfg_node: NodeIndex,
    pub stmt: Option<AstNodeId>,
}

pub struct ProgramDependenceGraph {
    pub graph: DiGraph<PdgNode, PdgEdgeKind>,
    pub by_cfg_node: HashMap<NodeIndex, NodeIndex>,
}

impl ProgramDependenceGraph {
    pub fn node(&self, id: NodeIndex) -> &PdgNode {
        &self.graph[id]
    }

    pub fn node_for_cfg(&self, cfg_node: NodeIndex) -> Option<NodeIndex> {
        self.by_cfg_node.get(&cfg_node).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// The nodes `n` itself depends on — the edges the slicer walks.
    pub fn dependencies_of(&self, n: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(n, Direction::Outgoing).collect()
    }

    /// Intraprocedural backward slice: the target plus every node reachable from it by
    /// following outgoing CD/DD edges, via DFS with a visited set.
    pub fn backward_slice(&self, target: NodeIndex) -> HashSet<NodeIndex> {
        self.backward_slice_filtered(target, None, true, true)
    }

    /// Backward slice restricted to at most `max_depth` hops and to the requested edge
    /// kinds. `max_depth = None` is unbounded.
    pub fn backward_slice_filtered(
        &self,
        target: NodeIndex,
        max_depth: Option<usize>,
        include_control: bool,
        include_data: bool,
    ) -> HashSet<NodeIndex> {
        self.bfs_filtered(target, max_depth, include_control, include_data, Direction::Outgoing)
    }

    /// Data-dependence-only backward slice: what values feed into `target`, ignoring why
    /// those branches were taken.
    pub fn thin_slice(&self, target: NodeIndex, max_depth: Option<usize>) -> HashSet<NodeIndex> {
        self.backward_slice_filtered(target, max_depth, false, true)
    }

    /// Forward slice: the source plus every node that depends on it, transitively — the
    /// dual of [`Self::backward_slice`], found by walking incoming dependency edges.
    pub fn forward_slice(&self, source: NodeIndex, max_depth: Option<usize>) -> HashSet<NodeIndex> {
        self.bfs_filtered(source, max_depth, true, true, Direction::Incoming)
    }

    /// Union of the backward and forward slices of `focus`.
    pub fn hybrid_slice(&self, focus: NodeIndex, max_depth: Option<usize>) -> HashSet<NodeIndex> {
        let mut nodes = self.backward_slice_filtered(focus, max_depth, true, true);
        nodes.extend(self.forward_slice(focus, max_depth));
        nodes
    }

    /// Nodes on some dependency path from `source` to `target`: the intersection of
    /// `target`'s backward slice and `source`'s forward slice.
    pub fn chop(&self, source: NodeIndex, target: NodeIndex, max_depth: Option<usize>) -> HashSet<NodeIndex> {
        let backward = self.backward_slice_filtered(target, max_depth, true, true);
        let forward = self.forward_slice(source, max_depth);
        backward.intersection(&forward).copied().collect()
    }

    fn bfs_filtered(
        &self,
        start: NodeIndex,
        max_depth: Option<usize>,
        include_control: bool,
        include_data: bool,
        direction: Direction,
    ) -> HashSet<NodeIndex> {
        let max_depth = max_depth.unwrap_or(usize::MAX);
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        while let Some((n, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in self.graph.edges_directed(n, direction) {
                let kind = *edge.weight();
                if !include_control && kind == PdgEdgeKind::ControlDependence {
                    continue;
                }
                if !include_data && kind == PdgEdgeKind::DataDependence {
                    continue;
                }
                let neighbor = if direction == Direction::Outgoing {
                    edge.target()
                } else {
                    edge.source()
                };
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
        visited
    }
}
