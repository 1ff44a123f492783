//! Argument backward trace: locate a function by (repo, file, name), enumerate its
//! parameters, and for each one compute the interprocedural slice rooted at its first read
//! inside the function body.

use std::path::Path;

use crate::errors::{Result, SliceError};
use crate::features::ast::domain::DefKind;
use crate::features::ast::infrastructure::{extract_arguments, find_def, parse_file};
use crate::features::call_graph::domain::CallGraph;
use crate::features::call_graph::infrastructure::engine::function_id as compute_function_id;
use crate::features::cfg::infrastructure::build_cfg;
use crate::features::dataflow::domain::Access;
use crate::features::dataflow::infrastructure::extract_accesses;
use crate::features::orchestration::domain::{ArgumentBackwardTraceReport, ArgumentTrace};
use crate::features::slicing::infrastructure::{backward_slice_interprocedural, RepoFunctionLocator};

/// Parses `file`, finds the function named `function_name`, and traces every parameter back
/// through the repo's call graph. `repo_root` both resolves the function's id and anchors the
/// locator re-parsing callers during the interprocedural walk.
pub fn argument_backward_trace(
    repo_root: &Path,
    file: &Path,
    function_name: &str,
    call_graph: &CallGraph,
) -> Result<ArgumentBackwardTraceReport> {
    let tree = parse_file(file)?;
    let def_id = find_def(&tree, function_name, Some(DefKind::Function)).ok_or_else(|| {
        SliceError::analysis(format!("no function named {function_name} in {}", file.display()))
    })?;

    let function_id = compute_function_id(file, repo_root, &tree, def_id);

    let cfg = build_cfg(&tree, def_id);
    let locator = RepoFunctionLocator::new();

    let mut traces = Vec::new();
    for arg in extract_arguments(&tree, def_id) {
        let first_use = first_read(&tree, &cfg, &arg.name);
        let slice = match first_use {
            Some((_, stmt_id)) => {
                backward_slice_interprocedural(repo_root, call_graph, &locator, &function_id, stmt_id)
            }
            None => Default::default(),
        };
        traces.push(ArgumentTrace {
            parameter: arg.name,
            first_use: first_use.map(|(span, _)| span),
            slice,
        });
    }

    Ok(ArgumentBackwardTraceReport { function_id, traces })
}

/// The earliest (by source position) CFG statement that reads `param_name`, if any.
fn first_read(
    tree: &crate::features::ast::domain::AstTree,
    cfg: &crate::features::cfg::domain::ControlFlowGraph,
    param_name: &str,
) -> Option<(crate::shared::models::Span, crate::features::ast::domain::AstNodeId)> {
    let mut candidates: Vec<_> = cfg
        .statement_nodes()
        .filter(|&(_, stmt_id)| {
            extract_accesses(tree, stmt_id)
                .iter()
                .any(|access| matches!(access, Access::Read(name) if name == param_name))
        })
        .map(|(_, stmt_id)| (tree.node(stmt_id).byte_range.0, tree.node(stmt_id).span, stmt_id))
        .collect();
    candidates.sort_by_key(|&(offset, _, _)| offset);
    candidates.into_iter().next().map(|(_, span, id)| (span, id))
}
