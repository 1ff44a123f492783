//! Interprocedural backward slicer: walks every call chain reaching a target statement,
//! locates the call-site feeding each hop, computes that call-site's intraprocedural slice
//! via [`ProgramDependenceGraph::backward_slice`], and unions the results.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use petgraph::graph::NodeIndex;

use crate::features::ast::domain::{AstNodeId, AstTree, SyntaxKind};
use crate::features::call_graph::domain::CallGraph;
use crate::features::call_graph::infrastructure::engine::calls_within;
use crate::features::cfg::domain::ControlFlowGraph;
use crate::features::cfg::infrastructure::build_cfg;
use crate::features::pdg::domain::ProgramDependenceGraph;
use crate::features::pdg::infrastructure::build_pdg;
use crate::features::slicing::domain::{InterproceduralSlice, SkippedChain, SliceStatement};
use crate::features::slicing::infrastructure::call_chains::call_chains;
use crate::features::slicing::ports::FunctionLocatorPort;
use crate::shared::models::Entity;

/// Input: the repo's call graph, a target function id, and a statement (`target_stmt`) inside
/// that function's own body. Output: the union of (function, statement) pairs contributing to
/// `target_stmt`, across every call chain reaching the target.
pub fn backward_slice_interprocedural(
    repo_root: &Path,
    call_graph: &CallGraph,
    locator: &dyn FunctionLocatorPort,
    target_id: &str,
    target_stmt: AstNodeId,
) -> InterproceduralSlice {
    let mut result = InterproceduralSlice::default();

    if let Some((tree, def_id)) = locator.locate(repo_root, target_id) {
        let cfg = build_cfg(&tree, def_id);
        slice_statement_into(&tree, &cfg, target_id, target_stmt, &mut result.statements);
    } else {
        result.skipped.push(SkippedChain {
            chain: vec![target_id.to_string()],
            reason: format!("could not locate source for target {target_id}"),
        });
    }

    let mut processed_pairs: HashSet<(String, String)> = HashSet::new();

    for chain in call_chains(call_graph, target_id) {
        for window in chain.windows(2) {
            let callee_id = &window[0];
            let caller_id = &window[1];
            if !processed_pairs.insert((caller_id.clone(), callee_id.clone())) {
                continue;
            }

            let Some((caller_tree, caller_def)) = locator.locate(repo_root, caller_id) else {
                result.skipped.push(SkippedChain {
                    chain: chain.clone(),
                    reason: format!("could not locate source for caller {caller_id}"),
                });
                continue;
            };

            let callee_name = Entity::with_module(callee_id.as_str(), None)
                .simple_name()
                .to_string();
            let Some(call_id) = first_matching_callsite(&caller_tree, caller_def, &callee_name) else {
                result.skipped.push(SkippedChain {
                    chain: chain.clone(),
                    reason: format!("no call-site for {callee_id} found in {caller_id}"),
                });
                continue;
            };

            let caller_cfg = build_cfg(&caller_tree, caller_def);
            slice_statement_into(&caller_tree, &caller_cfg, caller_id, call_id, &mut result.statements);
        }
    }

    result
}

/// Finds `target_stmt`'s (or the call-site's) enclosing CFG node, builds that function's PDG,
/// and folds its backward slice's statements into `out`.
fn slice_statement_into(
    tree: &AstTree,
    cfg: &ControlFlowGraph,
    function_id: &str,
    stmt_or_subexpr: AstNodeId,
    out: &mut HashSet<SliceStatement>,
) {
    let Some(node) = enclosing_cfg_node(tree, cfg, stmt_or_subexpr) else {
        return;
    };
    let pdg = build_pdg(tree, cfg);
    let Some(pdg_node) = pdg.node_for_cfg(node) else {
        return;
    };
    collect_statements(tree, &pdg, pdg_node, function_id, out);
}

fn collect_statements(
    tree: &AstTree,
    pdg: &ProgramDependenceGraph,
    target: NodeIndex,
    function_id: &str,
    out: &mut HashSet<SliceStatement>,
) {
    for n in pdg.backward_slice(target) {
        let Some(stmt) = pdg.node(n).stmt else { continue };
        out.insert(SliceStatement {
            function_id: function_id.to_string(),
            span: tree.node(stmt).span,
            snippet: tree.text(stmt).to_string(),
        });
    }
}

/// Walks up `id`'s ancestors until one of them is a CFG node's own statement id.
fn enclosing_cfg_node(tree: &AstTree, cfg: &ControlFlowGraph, id: AstNodeId) -> Option<NodeIndex> {
    let stmt_ids: HashMap<AstNodeId, NodeIndex> = cfg.statement_nodes().map(|(n, s)| (s, n)).collect();
    let mut current = Some(id);
    while let Some(curr) = current {
        if let Some(&n) = stmt_ids.get(&curr) {
            return Some(n);
        }
        current = tree.node(curr).parent;
    }
    None
}

/// The first (in source order) call expression within `caller_def`'s body matching
/// `target_name`: (a) a direct name call, (b) an attribute call, or (c) a call whose
/// callable sub-expression is itself a call matching (a) or (b) recursively.
fn first_matching_callsite(tree: &AstTree, caller_def: AstNodeId, target_name: &str) -> Option<AstNodeId> {
    let mut calls = calls_within(tree, caller_def);
    calls.sort_by_key(|&id| tree.node(id).byte_range.0);
    calls.into_iter().find(|&id| call_site_matches(tree, id, target_name))
}

fn call_site_matches(tree: &AstTree, call_id: AstNodeId, target_name: &str) -> bool {
    let Some(&func_id) = tree.node(call_id).children.first() else {
        return false;
    };
    matches_callable(tree, func_id, target_name)
}

fn matches_callable(tree: &AstTree, expr_id: AstNodeId, target_name: &str) -> bool {
    let node = tree.node(expr_id);
    match node.kind {
        SyntaxKind::NameExpr => tree.text(expr_id) == target_name,
        SyntaxKind::AttributeExpr => node
            .children
            .iter()
            .skip(1)
            .any(|&c| tree.node(c).raw_kind == "identifier" && tree.text(c) == target_name),
        SyntaxKind::CallExpr => node
            .children
            .first()
            .is_some_and(|&f| matches_callable(tree, f, target_name)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ast::domain::DefKind;
    use crate::features::ast::infrastructure::{find_def, parse};
    use std::collections::HashMap as StdHashMap;
    use std::fs;
    use std::path::PathBuf;

    struct FixtureLocator {
        files: StdHashMap<String, PathBuf>,
    }

    impl FunctionLocatorPort for FixtureLocator {
        fn locate(&self, _repo_root: &Path, function_id: &str) -> Option<(AstTree, AstNodeId)> {
            let module = function_id.rsplit_once('.').map(|(m, _)| m)?;
            let path = self.files.get(module)?;
            let source = fs::read_to_string(path).ok()?;
            let tree = parse(&source, Some(path.clone())).ok()?;
            let name = function_id.rsplit('.').next()?;
            let def = find_def(&tree, name, Some(DefKind::Function))?;
            Some((tree, def))
        }
    }

    #[test]
    fn slices_across_a_direct_caller() {
        let dir = tempfile::tempdir().unwrap();
        let callee_path = dir.path().join("callee.py");
        let caller_path = dir.path().join("caller.py");
        fs::write(&callee_path, "def b(x):\n    y = x + 1\n    return y\n").unwrap();
        fs::write(&caller_path, "def a():\n    z = 41\n    b(z)\n").unwrap();

        let mut graph = CallGraph::new();
        graph.add_call(Entity::with_module("caller.a", None), Entity::with_module("callee.b", None));

        let locator = FixtureLocator {
            files: StdHashMap::from([
                ("callee".to_string(), callee_path),
                ("caller".to_string(), caller_path),
            ]),
        };

        let (tree, def) = locator.locate(dir.path(), "callee.b").unwrap();
        let target_stmt = tree
            .walk()
            .find(|&id| tree.text(id).starts_with("return"))
            .unwrap();
        let _ = def;

        let slice = backward_slice_interprocedural(dir.path(), &graph, &locator, "callee.b", target_stmt);

        assert!(slice
            .statements
            .iter()
            .any(|s| s.function_id == "caller.a" && s.snippet.starts_with("z =")));
        assert!(slice
            .statements
            .iter()
            .any(|s| s.function_id == "callee.b" && s.snippet.starts_with("y =")));
    }
}
