//! CFG-builder port: treats CFG construction as swappable with an external CFG library —
//! enumerate nodes, expose predecessors and successors, expose statements carrying variable
//! accesses. The AST-backed default below is the only implementation carried here, but
//! downstream code depends on this trait, not on it directly.

use crate::features::ast::domain::{AstNodeId, AstTree};
use crate::features::cfg::domain::ControlFlowGraph;

pub trait CfgBuilderPort {
    fn build(&self, tree: &AstTree, func_def: AstNodeId) -> ControlFlowGraph;
}
