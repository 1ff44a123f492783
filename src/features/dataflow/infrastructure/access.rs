//! Extracts the [`Access`] list of a single CFG statement node: each access is either a bare
//! name read/write or derived from an assignment/for/if/while's named fields. Uses the same
//! field-name conventions the call-graph engine's `callee_name` and the CFG builder's
//! `if`/`for` handling already use (`"left"`/`"right"`/`"condition"` fields, attribute base
//! vs. member-name asymmetry).

use crate::features::ast::domain::{AstNodeId, AstTree, SyntaxKind};
use crate::features::dataflow::domain::Access;

pub fn extract_accesses(tree: &AstTree, stmt_id: AstNodeId) -> Vec<Access> {
    let node = tree.node(stmt_id);
    let mut accesses = Vec::new();

    match node.kind {
        SyntaxKind::AssignmentStmt => assignment_accesses(tree, stmt_id, &mut accesses),
        SyntaxKind::ExpressionStmt => {
            // tree-sitter-python wraps every simple statement in an expression_statement, so
            // a block-level assignment is this node's sole child, not this node itself.
            match node.children.first() {
                Some(&inner) if tree.node(inner).kind == SyntaxKind::AssignmentStmt => {
                    assignment_accesses(tree, inner, &mut accesses)
                }
                _ => push_reads(tree, stmt_id, &mut accesses),
            }
        }
        SyntaxKind::ForStmt => {
            if let Some(left) = tree.child_by_field(stmt_id, "left") {
                collect_write_targets(tree, left, &mut accesses);
            }
            if let Some(right) = tree.child_by_field(stmt_id, "right") {
                push_reads(tree, right, &mut accesses);
            }
        }
        SyntaxKind::IfStmt | SyntaxKind::WhileStmt => {
            if let Some(cond) = tree.child_by_field(stmt_id, "condition") {
                push_reads(tree, cond, &mut accesses);
            }
        }
        _ => {
            // Return statements and anything else not named above: every name reachable
            // under the node (without crossing into a nested def) is a read.
            push_reads(tree, stmt_id, &mut accesses);
        }
    }

    accesses
}

fn assignment_accesses(tree: &AstTree, assign_id: AstNodeId, out: &mut Vec<Access>) {
    let augmented = tree.node(assign_id).raw_kind == "augmented_assignment";
    if let Some(left) = tree.child_by_field(assign_id, "left") {
        collect_write_targets(tree, left, out);
        if augmented {
            // `x += 1` reads the old `x` as well as writing the new one.
            push_reads(tree, left, out);
        }
    }
    if let Some(right) = tree.child_by_field(assign_id, "right") {
        push_reads(tree, right, out);
    }
}

fn push_reads(tree: &AstTree, id: AstNodeId, out: &mut Vec<Access>) {
    let mut names = Vec::new();
    collect_reads(tree, id, &mut names);
    out.extend(names.into_iter().map(Access::Read));
}

/// All plain-name reads under `id`, stopping at attribute member-names (only the receiver is
/// a variable read) and at nested function/class/lambda boundaries (their bodies belong to
/// that inner scope, not this statement).
fn collect_reads(tree: &AstTree, id: AstNodeId, out: &mut Vec<String>) {
    let node = tree.node(id);
    match node.kind {
        SyntaxKind::NameExpr => out.push(tree.text(id).to_string()),
        SyntaxKind::AttributeExpr => {
            if let Some(&object) = node.children.first() {
                collect_reads(tree, object, out);
            }
        }
        SyntaxKind::FunctionDef | SyntaxKind::ClassDef | SyntaxKind::LambdaDef => {}
        _ => {
            for &child in &node.children {
                collect_reads(tree, child, out);
            }
        }
    }
}

/// Assignment-target names: a plain name writes directly; a tuple/list pattern (`a, b = ...`)
/// recurses into each element; an attribute or subscript target (`obj.x = 1`, `xs[0] = 1`)
/// doesn't introduce a new variable binding, so its receiver is a read instead.
fn collect_write_targets(tree: &AstTree, id: AstNodeId, out: &mut Vec<Access>) {
    let node = tree.node(id);
    match node.kind {
        SyntaxKind::NameExpr => out.push(Access::Write(tree.text(id).to_string())),
        SyntaxKind::AttributeExpr => push_reads(tree, id, out),
        _ if node.raw_kind == "subscript" => push_reads(tree, id, out),
        _ => {
            for &child in &node.children {
                collect_write_targets(tree, child, out);
            }
        }
    }
}
