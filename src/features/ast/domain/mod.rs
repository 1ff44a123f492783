//! Owned AST domain model.
//!
//! Tree-sitter's [`tree_sitter::Node`] borrows from the tree it came from, which makes it
//! awkward to hand out long-lived parent pointers. We convert once into an owned tree whose
//! parent pointers live in a flat arena indexed by [`AstNodeId`] (the same arena-and-index
//! shape the rest of the crate uses for its graphs) rather than a recursive structure.

use crate::shared::models::Span;

/// Index into an [`AstTree`]'s arena.
pub type AstNodeId = usize;

/// A coarse classification of AST node shapes the rest of the pipeline cares about.
/// Anything not named here keeps its tree-sitter kind string in [`SyntaxKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    Module,
    FunctionDef,
    ClassDef,
    LambdaDef,
    Parameters,
    Parameter,
    Block,
    AssignmentStmt,
    ImportStmt,
    ImportFromStmt,
    CallExpr,
    NameExpr,
    AttributeExpr,
    ReturnStmt,
    IfStmt,
    ForStmt,
    WhileStmt,
    ExpressionStmt,
    StringLiteral,
    Other(String),
}

impl SyntaxKind {
    pub fn from_ts_kind(kind: &str) -> Self {
        match kind {
            "module" => SyntaxKind::Module,
            "function_definition" => SyntaxKind::FunctionDef,
            "class_definition" => SyntaxKind::ClassDef,
            "lambda" => SyntaxKind::LambdaDef,
            "parameters" => SyntaxKind::Parameters,
            "identifier" => SyntaxKind::NameExpr,
            "default_parameter" | "typed_parameter" | "typed_default_parameter"
            | "list_splat_pattern" | "dictionary_splat_pattern" => SyntaxKind::Parameter,
            "block" => SyntaxKind::Block,
            "assignment" | "augmented_assignment" => SyntaxKind::AssignmentStmt,
            "import_statement" => SyntaxKind::ImportStmt,
            "import_from_statement" => SyntaxKind::ImportFromStmt,
            "call" => SyntaxKind::CallExpr,
            "attribute" => SyntaxKind::AttributeExpr,
            "return_statement" => SyntaxKind::ReturnStmt,
            "if_statement" => SyntaxKind::IfStmt,
            "for_statement" => SyntaxKind::ForStmt,
            "while_statement" => SyntaxKind::WhileStmt,
            "expression_statement" => SyntaxKind::ExpressionStmt,
            "string" => SyntaxKind::StringLiteral,
            other => SyntaxKind::Other(other.to_string()),
        }
    }
}

/// One node in the owned AST arena.
#[derive(Debug, Clone)]
pub struct AstNodeData {
    pub kind: SyntaxKind,
    pub raw_kind: String,
    pub span: Span,
    pub byte_range: (usize, usize),
    /// The tree-sitter field name relating this node to its parent, e.g. `"name"`,
    /// `"body"`, `"parameters"`, `"left"`/`"right"` for assignments.
    pub field_name: Option<String>,
    pub children: Vec<AstNodeId>,
    pub parent: Option<AstNodeId>,
}

/// An owned parse tree plus the source text it was parsed from (needed to slice out
/// textual bodies without re-walking tree-sitter).
#[derive(Debug, Clone)]
pub struct AstTree {
    pub source: String,
    pub file_path: Option<std::path::PathBuf>,
    pub nodes: Vec<AstNodeData>,
    pub root: AstNodeId,
}

impl AstTree {
    pub fn node(&self, id: AstNodeId) -> &AstNodeData {
        &self.nodes[id]
    }

    pub fn text(&self, id: AstNodeId) -> &str {
        let (start, end) = self.nodes[id].byte_range;
        &self.source[start..end]
    }

    /// Child of `id` with the given tree-sitter field name, if any.
    pub fn child_by_field(&self, id: AstNodeId, field: &str) -> Option<AstNodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].field_name.as_deref() == Some(field))
    }

    /// Depth-first walk over the whole tree, root first.
    pub fn walk(&self) -> impl Iterator<Item = AstNodeId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.nodes[next].children.iter().rev());
            Some(next)
        })
    }
}

/// Whether `find_def`/`find_all_defs` should restrict to function or class definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Function,
    Class,
}

/// One positional, keyword-only, or variadic parameter of a function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDescriptor {
    pub name: String,
    pub type_annotation: Option<String>,
    pub default: Option<String>,
    /// `*args`-style positional variadic marker.
    pub is_variadic_positional: bool,
    /// `**kwargs`-style variadic keyword marker.
    pub is_variadic_keyword: bool,
}
