//! Tree-sitter-backed AST parser.
//!
//! Converts a tree-sitter parse tree into our owned [`AstTree`] arena in one pass.

use std::path::{Path, PathBuf};

use tree_sitter::{Node as TsNode, Parser as TsParser};

use crate::errors::{Result, SliceError};
use crate::features::ast::domain::{AstNodeData, AstTree, SyntaxKind};
use crate::features::ast::ports::AstSourcePort;
use crate::shared::models::Span;

pub struct TreeSitterAstSource;

impl TreeSitterAstSource {
    pub fn new() -> Self {
        Self
    }

    fn ts_language() -> tree_sitter::Language {
        tree_sitter_python::language()
    }
}

impl Default for TreeSitterAstSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AstSourcePort for TreeSitterAstSource {
    fn parse(&self, source_text: &str) -> Result<AstTree> {
        parse(source_text, None)
    }

    fn parse_file(&self, path: &Path) -> Result<AstTree> {
        parse_file(path)
    }
}

/// Parse `source_text` into an owned [`AstTree`].
pub fn parse(source_text: &str, file_path: Option<PathBuf>) -> Result<AstTree> {
    let mut parser = TsParser::new();
    parser
        .set_language(&TreeSitterAstSource::ts_language())
        .map_err(|e| SliceError::analysis(format!("tree-sitter language error: {e}")))?;

    let tree = parser.parse(source_text, None).ok_or_else(|| {
        SliceError::parse(
            file_path.clone().unwrap_or_default(),
            "tree-sitter returned no tree",
        )
    })?;

    let root_ts = tree.root_node();
    if root_ts.has_error() {
        tracing::warn!(
            file = ?file_path,
            "parse tree contains syntax errors; continuing with best-effort tree"
        );
    }

    let mut nodes = Vec::new();
    let root = convert(&root_ts, source_text, None, None, &mut nodes);

    Ok(AstTree {
        source: source_text.to_string(),
        file_path,
        nodes,
        root,
    })
}

/// Parse the file at `path` into an owned [`AstTree`]. Unreadable files surface as
/// [`SliceError::Parse`].
pub fn parse_file(path: &Path) -> Result<AstTree> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| SliceError::parse(path, format!("could not read file: {e}")))?;
    parse(&source, Some(path.to_path_buf()))
}

fn convert(
    node: &TsNode,
    source: &str,
    field_name: Option<String>,
    parent: Option<usize>,
    nodes: &mut Vec<AstNodeData>,
) -> usize {
    let span = Span::new(
        node.start_position().row as u32 + 1,
        node.start_position().column as u32,
        node.end_position().row as u32 + 1,
        node.end_position().column as u32,
    );

    let idx = nodes.len();
    nodes.push(AstNodeData {
        kind: SyntaxKind::from_ts_kind(node.kind()),
        raw_kind: node.kind().to_string(),
        span,
        byte_range: (node.start_byte(), node.end_byte()),
        field_name,
        children: Vec::new(),
        parent,
    });

    let mut cursor = node.walk();
    let mut children = Vec::new();
    for child in node.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        let field = node
            .field_name_for_child(child_index_of(node, &child))
            .map(|s| s.to_string());
        children.push(convert(&child, source, field, Some(idx), nodes));
    }
    nodes[idx].children = children;

    idx
}

/// tree-sitter exposes `field_name_for_child` by positional child index rather than by
/// node, so we recover the index via a second cursor pass over named+anonymous children.
fn child_index_of(parent: &TsNode, target: &TsNode) -> u32 {
    let mut cursor = parent.walk();
    for (i, child) in parent.children(&mut cursor).enumerate() {
        if child.id() == target.id() {
            return i as u32;
        }
    }
    0
}

/// Annotate every non-root node with a back-pointer to its parent.
///
/// Parent pointers are already set during [`parse`], so this is idempotent; it exists as a
/// separate operation because some callers build an [`AstTree`] whose nodes they've
/// rearranged (e.g. after pruning docstring nodes) and want to re-derive parents.
pub fn annotate_parents(mut tree: AstTree) -> AstTree {
    for idx in 0..tree.nodes.len() {
        let children = tree.nodes[idx].children.clone();
        for child in children {
            tree.nodes[child].parent = Some(idx);
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_function() {
        let tree = parse("def foo(x):\n    return x\n", None).unwrap();
        assert!(tree.nodes.iter().any(|n| n.kind == SyntaxKind::FunctionDef));
    }

    #[test]
    fn annotate_parents_sets_backpointers() {
        let tree = parse("def foo(x):\n    return x\n", None).unwrap();
        let tree = annotate_parents(tree);
        assert!(tree.nodes[tree.root].parent.is_none());
        let has_child_with_parent = tree
            .nodes
            .iter()
            .enumerate()
            .any(|(i, n)| i != tree.root && n.parent.is_some());
        assert!(has_child_with_parent);
    }
}
