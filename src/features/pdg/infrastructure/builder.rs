//! Builds a [`ProgramDependenceGraph`] from a CFG: one PDG node per CFG node, then
//! data-dependence edges from reaching definitions and control-dependence edges from a
//! post-dominator-tree walk.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};

use crate::features::ast::domain::AstTree;
use crate::features::cfg::domain::ControlFlowGraph;
use crate::features::cfg::infrastructure::{immediate_post_dominators, post_dominators};
use crate::features::dataflow::infrastructure::{run_reaching_defs, run_var_def_use};
use crate::features::pdg::domain::{PdgEdgeKind, PdgNode, ProgramDependenceGraph};
use crate::features::pdg::ports::PdgBuilderPort;

pub struct AstPdgBuilder;

impl AstPdgBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AstPdgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdgBuilderPort for AstPdgBuilder {
    fn build(&self, tree: &AstTree, cfg: &ControlFlowGraph) -> ProgramDependenceGraph {
        build_pdg(tree, cfg)
    }
}

pub fn build_pdg(tree: &AstTree, cfg: &ControlFlowGraph) -> ProgramDependenceGraph {
    let pdom = post_dominators(cfg);
    let ipd = immediate_post_dominators(cfg, &pdom);
    let var_def_use = run_var_def_use(tree, cfg);
    let rd = run_reaching_defs(tree, cfg);

    let mut graph = DiGraph::new();
    let mut by_cfg_node: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    for n in cfg.nodes() {
        let idx = graph.add_node(PdgNode {
            cfg_node: n,
            stmt: cfg.node(n).stmt,
        });
        by_cfg_node.insert(n, idx);
    }

    add_data_dependence_edges(cfg, &var_def_use, &rd.before, &by_cfg_node, &mut graph);
    add_control_dependence_edges(cfg, &pdom, &ipd, &by_cfg_node, &mut graph);

    ProgramDependenceGraph { graph, by_cfg_node }
}

fn add_data_dependence_edges(
    cfg: &ControlFlowGraph,
    var_def_use: &HashMap<NodeIndex, crate::features::dataflow::domain::VarDefUse>,
    rd_in: &HashMap<NodeIndex, crate::features::dataflow::domain::ReachingDefs>,
    by_cfg_node: &HashMap<NodeIndex, NodeIndex>,
    graph: &mut DiGraph<PdgNode, PdgEdgeKind>,
) {
    for b in cfg.nodes() {
        let Some(vdu) = var_def_use.get(&b) else { continue };
        let Some(reaching) = rd_in.get(&b) else { continue };
        for v in &vdu.uses {
            for (name, a) in reaching {
                if name == v {
                    graph.add_edge(by_cfg_node[&b], by_cfg_node[a], PdgEdgeKind::DataDependence);
                }
            }
        }
    }
}

fn add_control_dependence_edges(
    cfg: &ControlFlowGraph,
    pdom: &crate::features::cfg::infrastructure::PostDomTable,
    ipd: &HashMap<NodeIndex, NodeIndex>,
    by_cfg_node: &HashMap<NodeIndex, NodeIndex>,
    graph: &mut DiGraph<PdgNode, PdgEdgeKind>,
) {
    for a in cfg.nodes() {
        // No IPD means a dead-ending branch; skip it, there's nothing to walk up to.
        let Some(&ipd_a) = ipd.get(&a) else { continue };

        for b in cfg.successors(a) {
            if pdom[&a].contains(&b) {
                // B post-dominates A: A always reaches exit through B, so B isn't
                // control-dependent on the choice made at A.
                continue;
            }

            let mut current = b;
            let mut walked = HashSet::new();
            while current != ipd_a && walked.insert(current) {
                if current != a {
                    graph.add_edge(by_cfg_node[&current], by_cfg_node[&a], PdgEdgeKind::ControlDependence);
                }
                match ipd.get(&current) {
                    Some(&next) => current = next,
                    None => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ast::domain::DefKind;
    use crate::features::ast::infrastructure::{find_def, parse};
    use crate::features::cfg::infrastructure::build_cfg;
    use crate::features::pdg::domain::PdgEdgeKind;

    #[test]
    fn use_depends_on_its_reaching_definition() {
        let tree = parse("def foo():\n    x = 1\n    y = x + 1\n    return y\n", None).unwrap();
        let def = find_def(&tree, "foo", Some(DefKind::Function)).unwrap();
        let cfg = build_cfg(&tree, def);
        let pdg = build_pdg(&tree, &cfg);

        let y_cfg = cfg
            .statement_nodes()
            .find(|&(_, stmt)| tree.text(stmt).starts_with("y ="))
            .map(|(n, _)| n)
            .unwrap();
        let x_cfg = cfg
            .statement_nodes()
            .find(|&(_, stmt)| tree.text(stmt).starts_with("x ="))
            .map(|(n, _)| n)
            .unwrap();

        let y_pdg = pdg.node_for_cfg(y_cfg).unwrap();
        let x_pdg = pdg.node_for_cfg(x_cfg).unwrap();
        assert!(pdg.dependencies_of(y_pdg).contains(&x_pdg));
    }

    #[test]
    fn branch_assignment_is_control_dependent_on_the_condition() {
        let tree = parse(
            "def foo(cond):\n    if cond:\n        y = 1\n    return 0\n",
            None,
        )
        .unwrap();
        let def = find_def(&tree, "foo", Some(DefKind::Function)).unwrap();
        let cfg = build_cfg(&tree, def);
        let pdg = build_pdg(&tree, &cfg);

        let branch_cfg = cfg.nodes().find(|&n| cfg.successors(n).len() == 2).unwrap();
        let y_cfg = cfg
            .statement_nodes()
            .find(|&(_, stmt)| tree.text(stmt).starts_with("y ="))
            .map(|(n, _)| n)
            .unwrap();

        let branch_pdg = pdg.node_for_cfg(branch_cfg).unwrap();
        let y_pdg = pdg.node_for_cfg(y_cfg).unwrap();
        assert!(pdg.dependencies_of(y_pdg).contains(&branch_pdg));

        let edge = pdg
            .graph
            .edges_connecting(y_pdg, branch_pdg)
            .next()
            .unwrap();
        assert_eq!(*edge.weight(), PdgEdgeKind::ControlDependence);
    }
}
