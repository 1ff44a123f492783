//! End-to-end scenarios against the fragment used throughout the pipeline's own design
//! notes: a function with a loop, a branch, and a call to an unresolved `bar`.

use std::collections::HashSet;
use std::fs;

use codeslice_ir::features::ast::domain::{AstTree, DefKind, SyntaxKind};
use codeslice_ir::features::ast::infrastructure::{find_def, parse};
use codeslice_ir::features::call_graph::domain::CallGraph;
use codeslice_ir::features::call_graph::infrastructure::{construct, persistence, AstCallGraphEngine};
use codeslice_ir::features::cfg::infrastructure::build_cfg;
use codeslice_ir::features::dataflow::domain::Access;
use codeslice_ir::features::dataflow::infrastructure::{extract_accesses, run_reaching_defs};
use codeslice_ir::features::import_normalizer::infrastructure::normalize;
use codeslice_ir::features::pdg::infrastructure::build_pdg;
use codeslice_ir::features::slicing::domain::InterproceduralSlice;
use codeslice_ir::features::slicing::infrastructure::backward_slice_interprocedural;
use codeslice_ir::features::slicing::ports::FunctionLocatorPort;
use codeslice_ir::config::AnalysisConfig;
use codeslice_ir::shared::models::{CalleeKind, Entity};
use std::path::Path;

const FRAGMENT: &str = "\
def foo(x, y, z):
    x = x + 1
    y = y + 2
    a = 0
    for i in range(y):
        if i % 2 == 0:
            z = x + 2
        else:
            z = x + 3
        a = y + 1
    k = bar(z)
    return a
";

fn foo_tree() -> (AstTree, codeslice_ir::features::ast::domain::AstNodeId) {
    let tree = parse(FRAGMENT, None).unwrap();
    let def = find_def(&tree, "foo", Some(DefKind::Function)).unwrap();
    (tree, def)
}

fn stmt_starting_with<'a>(tree: &'a AstTree, cfg: &'a codeslice_ir::features::cfg::domain::ControlFlowGraph, prefix: &str) -> codeslice_ir::features::ast::domain::AstNodeId {
    cfg.statement_nodes()
        .map(|(_, s)| s)
        .find(|&s| tree.text(s).trim_start().starts_with(prefix))
        .unwrap_or_else(|| panic!("no statement starting with {prefix:?}"))
}

#[test]
fn s1_reaching_defs_soundness_at_the_bar_call() {
    let (tree, def) = foo_tree();
    let cfg = build_cfg(&tree, def);
    let rd = run_reaching_defs(&tree, &cfg);

    let call_stmt = stmt_starting_with(&tree, &cfg, "k = bar");
    let (call_node, _) = cfg.statement_nodes().find(|&(_, s)| s == call_stmt).unwrap();
    let rd_in = rd.before.get(&call_node).expect("call node reached by the worklist");

    let names_for_z: HashSet<u32> = rd_in
        .iter()
        .filter(|(name, _)| name == "z")
        .map(|(_, def_node)| {
            let stmt = cfg.node(*def_node).stmt.expect("non-synthetic reaching def");
            tree.node(stmt).span.start_line
        })
        .collect();

    // Lines are 1-based; "z = x + 2" is line 7, "z = x + 3" is line 9.
    assert!(names_for_z.contains(&7), "expected z@line7 in RD_in, got {names_for_z:?}");
    assert!(names_for_z.contains(&9), "expected z@line9 in RD_in, got {names_for_z:?}");
    assert_eq!(names_for_z.len(), 2, "parameter z must not reach, got {names_for_z:?}");
}

#[test]
fn s2_intraprocedural_slice_at_return_a() {
    let (tree, def) = foo_tree();
    let cfg = build_cfg(&tree, def);
    let pdg = build_pdg(&tree, &cfg);

    let return_stmt = stmt_starting_with(&tree, &cfg, "return a");
    let (return_node, _) = cfg.statement_nodes().find(|&(_, s)| s == return_stmt).unwrap();
    let pdg_node = pdg.node_for_cfg(return_node).unwrap();

    let lines: HashSet<u32> = pdg
        .backward_slice(pdg_node)
        .into_iter()
        .filter_map(|n| pdg.node(n).stmt)
        .map(|s| tree.node(s).span.start_line)
        .collect();

    for expected in [3, 5, 10, 4, 12] {
        assert!(lines.contains(&expected), "expected line {expected} in slice, got {lines:?}");
    }
    assert!(!lines.contains(&2), "x = x + 1 must not be in the slice of return a");
    assert!(!lines.contains(&11), "k = bar(z) must not be in the slice of return a");
}

#[test]
fn s3_intraprocedural_slice_at_the_bar_call() {
    let (tree, def) = foo_tree();
    let cfg = build_cfg(&tree, def);
    let pdg = build_pdg(&tree, &cfg);

    let call_stmt = stmt_starting_with(&tree, &cfg, "k = bar");
    let (call_node, _) = cfg.statement_nodes().find(|&(_, s)| s == call_stmt).unwrap();
    let pdg_node = pdg.node_for_cfg(call_node).unwrap();

    let lines: HashSet<u32> = pdg
        .backward_slice(pdg_node)
        .into_iter()
        .filter_map(|n| pdg.node(n).stmt)
        .map(|s| tree.node(s).span.start_line)
        .collect();

    for expected in [7, 9, 6, 5, 3, 2, 11] {
        assert!(lines.contains(&expected), "expected line {expected} in slice, got {lines:?}");
    }
    assert!(!lines.contains(&4), "a = 0 does not feed k = bar(z) and must not be in the slice");
}

#[test]
fn s4_call_graph_classification() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    fs::write(repo.join("b.py"), "def h():\n    pass\n").unwrap();
    fs::write(
        repo.join("a.py"),
        "from b import h\n\ndef g():\n    pass\n\ndef f():\n    g()\n    h()\n    len([1])\n",
    )
    .unwrap();

    let config = AnalysisConfig::default();
    let (graph, _report) = construct(repo, &config, &AstCallGraphEngine::new()).unwrap();

    let f = Entity::with_module("a.f", None);
    let callees = graph.callees_of(&f);

    let g = callees.iter().find(|c| c.simple_name() == "g").expect("calls g");
    assert_eq!(g.kind(), Some(CalleeKind::Local));

    let h = callees.iter().find(|c| c.simple_name() == "h").expect("calls h");
    assert_eq!(h.kind(), Some(CalleeKind::External));

    let len = callees.iter().find(|c| c.simple_name() == "len").expect("calls len");
    assert_eq!(len.kind(), Some(CalleeKind::Builtin));
}

#[test]
fn s5_call_chains_reaching_a_target() {
    use codeslice_ir::features::slicing::infrastructure::call_chains;

    let mut graph = CallGraph::new();
    let e = |id: &str| Entity::with_module(id, None);
    graph.add_call(e("main"), e("a"));
    graph.add_call(e("a"), e("b"));
    graph.add_call(e("main"), e("b"));
    graph.add_call(e("c"), e("b"));

    let mut chains = call_chains(&graph, "b");
    chains.sort();
    let mut expected = vec![
        vec!["b".to_string(), "a".to_string(), "main".to_string()],
        vec!["b".to_string(), "main".to_string()],
        vec!["b".to_string(), "c".to_string()],
    ];
    expected.sort();
    assert_eq!(chains, expected);
}

struct FixtureLocator<'a> {
    repo: &'a Path,
}

impl<'a> FunctionLocatorPort for FixtureLocator<'a> {
    fn locate(&self, _repo_root: &Path, function_id: &str) -> Option<(AstTree, codeslice_ir::features::ast::domain::AstNodeId)> {
        let (module, name) = function_id.rsplit_once('.')?;
        let path = self.repo.join(format!("{module}.py"));
        let source = fs::read_to_string(path).ok()?;
        let tree = parse(&source, None).ok()?;
        let def = find_def(&tree, name, Some(DefKind::Function))?;
        Some((tree, def))
    }
}

#[test]
fn s6_interprocedural_slice_through_a_call_site() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    fs::write(repo.join("callee.py"), "def h(x):\n    return x + 1\n").unwrap();
    fs::write(repo.join("caller.py"), "def caller(p):\n    q = h(p)\n    return q\n").unwrap();

    let mut graph = CallGraph::new();
    graph.add_call(Entity::with_module("caller.caller", None), Entity::with_module("callee.h", None));

    let locator = FixtureLocator { repo };
    let (tree, def) = locator.locate(repo, "callee.h").unwrap();
    let cfg = build_cfg(&tree, def);
    let return_stmt = stmt_starting_with(&tree, &cfg, "return");

    let slice: InterproceduralSlice =
        backward_slice_interprocedural(repo, &graph, &locator, "callee.h", return_stmt);

    assert!(slice
        .statements
        .iter()
        .any(|s| s.function_id == "caller.caller" && s.snippet.starts_with("q = h")));
    assert!(slice.skipped.is_empty());
}

#[test]
fn invariant_forward_inverse_are_mutual_duals() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    fs::write(repo.join("a.py"), "def f():\n    pass\n\ndef g():\n    f()\n").unwrap();

    let config = AnalysisConfig::default();
    let (graph, _) = construct(repo, &config, &AstCallGraphEngine::new()).unwrap();

    for (caller, callees) in graph.iter() {
        for callee in callees {
            assert!(
                graph.callers_of(callee).iter().any(|c| c.id() == caller.id()),
                "inverse[{callee:?}] should contain {caller:?}"
            );
        }
    }
}

#[test]
fn invariant_call_graph_json_round_trips() {
    let mut graph = CallGraph::new();
    let e = |id: &str| Entity::with_module(id, None);
    graph.add_call(e("pkg.a"), e("pkg.b"));
    graph.add_call(e("pkg.a"), e("pkg.c"));
    graph.add_call(e("pkg.b"), e("pkg.c"));

    let dict = persistence::to_dict(&graph);
    let reloaded = persistence::load(&dict).unwrap();
    assert_eq!(persistence::to_dict(&reloaded), dict);
}

#[test]
fn invariant_import_normalization_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("repo");
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("a.py"), "from .b import *\n\ndef f():\n    pass\n").unwrap();
    fs::write(repo.join("b.py"), "def helper():\n    pass\n").unwrap();

    let (first_dest, _) = normalize(&repo).unwrap();
    let first_contents: Vec<(std::path::PathBuf, String)> = {
        let mut v: Vec<_> = walk_py(&first_dest)
            .into_iter()
            .map(|p| {
                let text = fs::read_to_string(&p).unwrap();
                (p.strip_prefix(&first_dest).unwrap().to_path_buf(), text)
            })
            .collect();
        v.sort();
        v
    };

    let (second_dest, _) = normalize(&repo).unwrap();
    let second_contents: Vec<(std::path::PathBuf, String)> = {
        let mut v: Vec<_> = walk_py(&second_dest)
            .into_iter()
            .map(|p| {
                let text = fs::read_to_string(&p).unwrap();
                (p.strip_prefix(&second_dest).unwrap().to_path_buf(), text)
            })
            .collect();
        v.sort();
        v
    };

    assert_eq!(first_contents, second_contents);
}

fn walk_py(root: &Path) -> Vec<std::path::PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().is_some_and(|ext| ext == "py"))
        .collect()
}

#[test]
fn invariant_slicer_closure_every_non_target_node_has_an_incoming_edge_from_the_slice() {
    let (tree, def) = foo_tree();
    let cfg = build_cfg(&tree, def);
    let pdg = build_pdg(&tree, &cfg);

    let return_stmt = stmt_starting_with(&tree, &cfg, "return a");
    let (return_node, _) = cfg.statement_nodes().find(|&(_, s)| s == return_stmt).unwrap();
    let target = pdg.node_for_cfg(return_node).unwrap();

    let slice = pdg.backward_slice(target);
    for &m in &slice {
        if m == target {
            continue;
        }
        let has_edge_from_slice = slice
            .iter()
            .any(|&s| s != m && pdg.dependencies_of(s).contains(&m));
        assert!(has_edge_from_slice, "node {m:?} has no incoming PDG edge from the rest of the slice");
    }
}

#[test]
fn reaching_defs_never_fabricate_an_access_for_an_untouched_variable() {
    let (tree, _def) = foo_tree();
    let range_stmt = tree
        .walk()
        .find(|&id| tree.node(id).kind == SyntaxKind::ForStmt)
        .unwrap();
    let accesses = extract_accesses(&tree, range_stmt);
    assert!(accesses.contains(&Access::Read("y".to_string())));
    assert!(!accesses.iter().any(|a| matches!(a, Access::Write(n) if n == "k")));
}
