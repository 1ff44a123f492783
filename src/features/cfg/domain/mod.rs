//! Control-flow graph domain model: one arena-and-index `DiGraph` per function, with
//! synthetic entry/exit nodes and a small typed edge-kind vocabulary.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::features::ast::domain::AstNodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfgEdgeKind {
    Sequential,
    True,
    False,
    LoopBack,
    LoopExit,
    Exception,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfgNodeKind {
    Entry,
    Exit,
    Statement,
}

/// One CFG node: either a synthetic entry/exit, or a single AST statement.
#[derive(Debug, Clone)]
pub struct CfgNode {
    pub kind: CfgNodeKind,
    pub stmt: Option<AstNodeId>,
}

pub struct ControlFlowGraph {
    pub graph: DiGraph<CfgNode, CfgEdgeKind>,
    pub entry: NodeIndex,
    pub exit: NodeIndex,
}

impl ControlFlowGraph {
    pub fn node(&self, id: NodeIndex) -> &CfgNode {
        &self.graph[id]
    }

    pub fn predecessors(&self, n: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(n, Direction::Incoming).collect()
    }

    pub fn successors(&self, n: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(n, Direction::Outgoing).collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// The AST statement ids that label every non-synthetic node, in node-index order.
    pub fn statement_nodes(&self) -> impl Iterator<Item = (NodeIndex, AstNodeId)> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |id| self.graph[id].stmt.map(|stmt| (id, stmt)))
    }
}
