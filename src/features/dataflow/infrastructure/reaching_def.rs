//! `reaching_def`: forward analysis over `(variable, defining-node)` pairs. Meet is set
//! union; a WRITE to `v` at node `n` kills every existing pair naming `v` and adds `(v, n)`.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::features::ast::domain::AstTree;
use crate::features::cfg::domain::ControlFlowGraph;
use crate::features::dataflow::domain::{Access, ReachingDefs};
use crate::features::dataflow::infrastructure::access::extract_accesses;
use crate::features::dataflow::infrastructure::worklist::{self, DataflowResult};
use crate::features::dataflow::ports::DataflowAnalysis;

pub struct ReachingDefAnalysis<'a> {
    pub tree: &'a AstTree,
    pub cfg: &'a ControlFlowGraph,
}

impl<'a> DataflowAnalysis<ReachingDefs> for ReachingDefAnalysis<'a> {
    fn label(&self) -> &'static str {
        "reaching_def"
    }

    fn is_forward(&self) -> bool {
        true
    }

    fn initial(&self) -> ReachingDefs {
        ReachingDefs::new()
    }

    fn meet(&self, incoming: Vec<&ReachingDefs>) -> ReachingDefs {
        incoming.into_iter().fold(ReachingDefs::new(), |mut acc, set| {
            acc.extend(set.iter().cloned());
            acc
        })
    }

    fn transfer(&self, node: NodeIndex, before: &ReachingDefs) -> ReachingDefs {
        let Some(stmt) = self.cfg.node(node).stmt else {
            return before.clone();
        };
        let mut out = before.clone();
        for access in extract_accesses(self.tree, stmt) {
            if let Access::Write(name) = access {
                out.retain(|(existing, _)| existing != &name);
                out.insert((name, node));
            }
        }
        out
    }
}

/// Runs the analysis and returns both the `RD_in` (`before`) and `RD_out` (`after`) map the
/// PDG builder needs.
pub fn run_reaching_defs(tree: &AstTree, cfg: &ControlFlowGraph) -> DataflowResult<ReachingDefs> {
    let analysis = ReachingDefAnalysis { tree, cfg };
    worklist::run(cfg, &analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ast::domain::DefKind;
    use crate::features::ast::infrastructure::{find_def, parse};
    use crate::features::cfg::infrastructure::build_cfg;

    #[test]
    fn a_later_write_kills_the_earlier_definition() {
        let tree = parse("def foo():\n    x = 1\n    x = 2\n    return x\n", None).unwrap();
        let def = find_def(&tree, "foo", Some(DefKind::Function)).unwrap();
        let cfg = build_cfg(&tree, def);
        let result = run_reaching_defs(&tree, &cfg);

        let return_node = cfg
            .statement_nodes()
            .find(|&(_, stmt)| tree.text(stmt).starts_with("return"))
            .map(|(n, _)| n)
            .unwrap();
        let rd_in = &result.before[&return_node];
        assert_eq!(rd_in.iter().filter(|(name, _)| name == "x").count(), 1);
    }

    #[test]
    fn diverging_branches_both_reach_the_join_point() {
        let tree = parse(
            "def foo(cond):\n    if cond:\n        x = 1\n    else:\n        x = 2\n    return x\n",
            None,
        )
        .unwrap();
        let def = find_def(&tree, "foo", Some(DefKind::Function)).unwrap();
        let cfg = build_cfg(&tree, def);
        let result = run_reaching_defs(&tree, &cfg);

        let return_node = cfg
            .statement_nodes()
            .find(|&(_, stmt)| tree.text(stmt).starts_with("return"))
            .map(|(n, _)| n)
            .unwrap();
        let rd_in = &result.before[&return_node];
        assert_eq!(rd_in.iter().filter(|(name, _)| name == "x").count(), 2);
    }
}
