//! PDG-builder port. Unlike the CFG and call-graph ports, nothing here stands in for a
//! genuine external dependency — the construction is pure composition of the CFG,
//! post-dominators, and dataflow results already computed upstream — but the seam is kept
//! anyway: callers depend on the trait, not the concrete walker, even with one implementation.

use crate::features::ast::domain::AstTree;
use crate::features::cfg::domain::ControlFlowGraph;
use crate::features::pdg::domain::ProgramDependenceGraph;

pub trait PdgBuilderPort {
    fn build(&self, tree: &AstTree, cfg: &ControlFlowGraph) -> ProgramDependenceGraph;
}
