//! Queries over an [`AstTree`]: locating definitions and extracting their shape.

use crate::features::ast::domain::{ArgDescriptor, AstNodeId, AstTree, DefKind, SyntaxKind};

fn def_name<'a>(tree: &'a AstTree, def: AstNodeId) -> Option<&'a str> {
    let name_id = tree.child_by_field(def, "name")?;
    Some(tree.text(name_id))
}

fn matches_kind(tree: &AstTree, id: AstNodeId, kind: Option<DefKind>) -> bool {
    match (kind, &tree.node(id).kind) {
        (None, SyntaxKind::FunctionDef) | (None, SyntaxKind::ClassDef) => true,
        (Some(DefKind::Function), SyntaxKind::FunctionDef) => true,
        (Some(DefKind::Class), SyntaxKind::ClassDef) => true,
        _ => false,
    }
}

/// First function/class definition named `name`, in tree pre-order.
pub fn find_def(tree: &AstTree, name: &str, kind: Option<DefKind>) -> Option<AstNodeId> {
    tree.walk()
        .find(|&id| matches_kind(tree, id, kind) && def_name(tree, id) == Some(name))
}

/// Every function/class definition named `name` (source permits duplicate names).
pub fn find_all_defs(tree: &AstTree, name: &str, kind: Option<DefKind>) -> Vec<AstNodeId> {
    tree.walk()
        .filter(|&id| matches_kind(tree, id, kind) && def_name(tree, id) == Some(name))
        .collect()
}

/// Positional args, keyword-only args with defaults, and variadic markers of a
/// `function_definition` node.
pub fn extract_arguments(tree: &AstTree, func_def: AstNodeId) -> Vec<ArgDescriptor> {
    let Some(params_id) = tree.child_by_field(func_def, "parameters") else {
        return Vec::new();
    };

    tree.node(params_id)
        .children
        .iter()
        .filter_map(|&child| extract_one_argument(tree, child))
        .collect()
}

fn extract_one_argument(tree: &AstTree, id: AstNodeId) -> Option<ArgDescriptor> {
    let node = tree.node(id);
    match node.raw_kind.as_str() {
        "identifier" => Some(ArgDescriptor {
            name: tree.text(id).to_string(),
            type_annotation: None,
            default: None,
            is_variadic_positional: false,
            is_variadic_keyword: false,
        }),
        "typed_parameter" => {
            let name = tree
                .node(id)
                .children
                .iter()
                .find(|&&c| tree.node(c).raw_kind == "identifier")
                .map(|&c| tree.text(c).to_string())?;
            let type_annotation = tree.child_by_field(id, "type").map(|c| tree.text(c).to_string());
            Some(ArgDescriptor {
                name,
                type_annotation,
                default: None,
                is_variadic_positional: false,
                is_variadic_keyword: false,
            })
        }
        "default_parameter" | "typed_default_parameter" => {
            let name = tree.child_by_field(id, "name").map(|c| tree.text(c).to_string())?;
            let type_annotation = tree.child_by_field(id, "type").map(|c| tree.text(c).to_string());
            let default = tree.child_by_field(id, "value").map(|c| tree.text(c).to_string());
            Some(ArgDescriptor {
                name,
                type_annotation,
                default,
                is_variadic_positional: false,
                is_variadic_keyword: false,
            })
        }
        "list_splat_pattern" => {
            let name = tree
                .node(id)
                .children
                .iter()
                .find(|&&c| tree.node(c).raw_kind == "identifier")
                .map(|&c| tree.text(c).to_string())
                .unwrap_or_default();
            Some(ArgDescriptor {
                name,
                type_annotation: None,
                default: None,
                is_variadic_positional: true,
                is_variadic_keyword: false,
            })
        }
        "dictionary_splat_pattern" => {
            let name = tree
                .node(id)
                .children
                .iter()
                .find(|&&c| tree.node(c).raw_kind == "identifier")
                .map(|&c| tree.text(c).to_string())
                .unwrap_or_default();
            Some(ArgDescriptor {
                name,
                type_annotation: None,
                default: None,
                is_variadic_positional: false,
                is_variadic_keyword: true,
            })
        }
        _ => None,
    }
}

/// The textual body of a function definition, with leading docstring-only expression
/// statements dropped.
pub fn extract_body(tree: &AstTree, func_def: AstNodeId) -> String {
    let Some(body_id) = tree.child_by_field(func_def, "body") else {
        return String::new();
    };

    tree.node(body_id)
        .children
        .iter()
        .copied()
        .filter(|&stmt| !is_docstring_statement(tree, stmt))
        .map(|stmt| tree.text(stmt))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_docstring_statement(tree: &AstTree, stmt: AstNodeId) -> bool {
    let node = tree.node(stmt);
    if node.kind != SyntaxKind::ExpressionStmt {
        return false;
    }
    matches!(
        node.children.as_slice(),
        [only] if tree.node(*only).kind == SyntaxKind::StringLiteral
    )
}
