//! `var_def_use`: forward, purely local analysis answering "what does this single statement
//! read/write" — the `before` value is ignored entirely.

use petgraph::graph::NodeIndex;

use crate::features::ast::domain::AstTree;
use crate::features::cfg::domain::ControlFlowGraph;
use crate::features::dataflow::domain::{Access, VarDefUse};
use crate::features::dataflow::infrastructure::access::extract_accesses;
use crate::features::dataflow::infrastructure::worklist;
use crate::features::dataflow::ports::DataflowAnalysis;
use std::collections::HashMap;

pub struct VarDefUseAnalysis<'a> {
    pub tree: &'a AstTree,
    pub cfg: &'a ControlFlowGraph,
}

impl<'a> DataflowAnalysis<VarDefUse> for VarDefUseAnalysis<'a> {
    fn label(&self) -> &'static str {
        "var_def_use"
    }

    fn is_forward(&self) -> bool {
        true
    }

    fn initial(&self) -> VarDefUse {
        VarDefUse::default()
    }

    fn meet(&self, _incoming: Vec<&VarDefUse>) -> VarDefUse {
        // The scheduling framework is reused for uniformity only; this analysis's `after`
        // value never depends on `before`, so the join result is discarded by `transfer`.
        VarDefUse::default()
    }

    fn transfer(&self, node: NodeIndex, _before: &VarDefUse) -> VarDefUse {
        let Some(stmt) = self.cfg.node(node).stmt else {
            return VarDefUse::default();
        };
        let mut out = VarDefUse::default();
        for access in extract_accesses(self.tree, stmt) {
            match access {
                Access::Read(name) => {
                    out.uses.insert(name);
                }
                Access::Write(name) => {
                    out.defs.insert(name);
                }
            }
        }
        out
    }
}

/// Runs the analysis and returns each node's local `{defs, uses}`, keyed by CFG node.
pub fn run_var_def_use(tree: &AstTree, cfg: &ControlFlowGraph) -> HashMap<NodeIndex, VarDefUse> {
    let analysis = VarDefUseAnalysis { tree, cfg };
    worklist::run(cfg, &analysis).after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ast::domain::DefKind;
    use crate::features::ast::infrastructure::{find_def, parse};
    use crate::features::cfg::infrastructure::build_cfg;

    #[test]
    fn each_assignment_node_reports_its_own_defs_and_uses() {
        let tree = parse("def foo():\n    x = 1\n    y = x + 1\n    return y\n", None).unwrap();
        let def = find_def(&tree, "foo", Some(DefKind::Function)).unwrap();
        let cfg = build_cfg(&tree, def);
        let result = run_var_def_use(&tree, &cfg);

        let y_node = cfg
            .statement_nodes()
            .find(|&(_, stmt)| tree.text(stmt).starts_with("y ="))
            .map(|(n, _)| n)
            .unwrap();
        let value = &result[&y_node];
        assert!(value.defs.contains("y"));
        assert!(value.uses.contains("x"));
        assert!(!value.defs.contains("x"));
    }
}
