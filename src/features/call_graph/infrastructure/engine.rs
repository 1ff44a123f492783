//! Default call-graph engine: walks the repository with the AST utilities and reports every
//! call-site occurrence, treated as an oracle the builder depends on through a trait rather
//! than directly, also resolving a best-effort callee id rather than just a bare name.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::Result;
use crate::features::ast::domain::{AstNodeId, AstTree, SyntaxKind};
use crate::features::ast::infrastructure::parse;
use crate::features::call_graph::ports::CallGraphEnginePort;

const BUILTIN_MARKER: &str = "<builtin>";

const PYTHON_BUILTINS: &[&str] = &[
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr",
    "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len",
    "list", "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open",
    "ord", "pow", "print", "property", "range", "repr", "reversed", "round", "set", "setattr",
    "slice", "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

pub struct AstCallGraphEngine;

impl AstCallGraphEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AstCallGraphEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CallGraphEnginePort for AstCallGraphEngine {
    fn discover_calls(&self, repo_root: &Path) -> Result<Vec<(String, String)>> {
        discover_calls(repo_root)
    }
}

struct FileDefs {
    module_path: String,
    tree: AstTree,
}

pub fn discover_calls(repo_root: &Path) -> Result<Vec<(String, String)>> {
    let files: Vec<PathBuf> = WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().is_some_and(|ext| ext == "py"))
        .collect();

    let mut parsed = Vec::new();
    for file in &files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(file = ?file, error = %e, "call-graph engine: unreadable file, skipping");
                continue;
            }
        };
        let tree = match parse(&source, Some(file.clone())) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(file = ?file, error = %e, "call-graph engine: unparseable file, skipping");
                continue;
            }
        };
        parsed.push(FileDefs {
            module_path: module_dotted_path(file, repo_root),
            tree,
        });
    }

    // A simple_name -> full id index, used to resolve unqualified callee names against
    // defs found anywhere in the repo (local file preferred, see resolve_callee_id).
    let mut global_defs: Vec<(String, String)> = Vec::new();
    for fd in &parsed {
        for def_id in fd.tree.walk() {
            if !matches!(fd.tree.node(def_id).kind, SyntaxKind::FunctionDef | SyntaxKind::ClassDef) {
                continue;
            }
            let Some(name) = def_name(&fd.tree, def_id) else { continue };
            let qualified = qualified_name(&fd.tree, def_id);
            global_defs.push((name, format!("{}.{}", fd.module_path, qualified)));
        }
    }

    let mut pairs = Vec::new();
    for fd in &parsed {
        for def_id in fd.tree.walk() {
            if fd.tree.node(def_id).kind != SyntaxKind::FunctionDef {
                continue;
            }
            let qualified = qualified_name(&fd.tree, def_id);
            let caller_id = format!("{}.{}", fd.module_path, qualified);

            for call_id in calls_within(&fd.tree, def_id) {
                let Some((name, is_method)) = callee_name(&fd.tree, call_id) else {
                    continue;
                };
                let callee_id = resolve_callee_id(&name, is_method, &fd.module_path, &global_defs);
                pairs.push((caller_id.clone(), callee_id));
            }
        }
    }

    Ok(pairs)
}

/// The id a def would be assigned as a caller/callee in the call graph: its module's dotted
/// path joined with its own qualified name. Exposed for callers (the CLI, orchestration)
/// that need to name a function the same way the call graph does without duplicating the
/// convention.
pub fn function_id(file: &Path, repo_root: &Path, tree: &AstTree, def_id: AstNodeId) -> String {
    format!("{}.{}", module_dotted_path(file, repo_root), qualified_name(tree, def_id))
}

/// Dotted module path of `file` relative to `repo_root`; `__init__.py` collapses into its
/// package's own path.
pub(crate) fn module_dotted_path(file: &Path, repo_root: &Path) -> String {
    let rel = file.strip_prefix(repo_root).unwrap_or(file);
    let mut segments: Vec<String> = rel
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.last().map(String::as_str) == Some("__init__") {
        segments.pop();
    }
    segments.join(".")
}

pub(crate) fn def_name(tree: &AstTree, def_id: AstNodeId) -> Option<String> {
    let name_id = tree.child_by_field(def_id, "name")?;
    Some(tree.text(name_id).to_string())
}

/// Dotted chain of enclosing def names from the outermost to `def_id` itself, e.g.
/// `"Widget.render"` for a method nested in a class.
pub(crate) fn qualified_name(tree: &AstTree, def_id: AstNodeId) -> String {
    let mut chain = Vec::new();
    let mut current = Some(def_id);
    while let Some(id) = current {
        if matches!(tree.node(id).kind, SyntaxKind::FunctionDef | SyntaxKind::ClassDef) {
            if let Some(name) = def_name(tree, id) {
                chain.push(name);
            }
        }
        current = tree.node(id).parent;
    }
    chain.reverse();
    chain.join(".")
}

/// Call expressions attributable to `def_id` itself — traversal stops at any nested
/// function/class/lambda boundary, whose calls belong to that nested caller instead.
pub(crate) fn calls_within(tree: &AstTree, def_id: AstNodeId) -> Vec<AstNodeId> {
    let Some(body_id) = tree.child_by_field(def_id, "body") else {
        return Vec::new();
    };
    let mut calls = Vec::new();
    collect_calls(tree, body_id, true, &mut calls);
    calls
}

pub(crate) fn collect_calls(tree: &AstTree, id: AstNodeId, is_container: bool, calls: &mut Vec<AstNodeId>) {
    let node = tree.node(id);
    if !is_container
        && matches!(
            node.kind,
            SyntaxKind::FunctionDef | SyntaxKind::ClassDef | SyntaxKind::LambdaDef
        )
    {
        return;
    }
    if node.kind == SyntaxKind::CallExpr {
        calls.push(id);
    }
    for &child in &node.children {
        collect_calls(tree, child, false, calls);
    }
}

/// `(simple_name, is_method_call)` of a call expression's target: for `obj.method(...)` only
/// the method name is recovered, not the receiver.
pub(crate) fn callee_name(tree: &AstTree, call_id: AstNodeId) -> Option<(String, bool)> {
    let func_id = *tree.node(call_id).children.first()?;
    let func_node = tree.node(func_id);
    match func_node.kind {
        SyntaxKind::NameExpr => Some((tree.text(func_id).to_string(), false)),
        SyntaxKind::AttributeExpr => {
            let name_id = func_node
                .children
                .iter()
                .skip(1)
                .find(|&&c| tree.node(c).raw_kind == "identifier")?;
            Some((tree.text(*name_id).to_string(), true))
        }
        _ => None,
    }
}

/// Best-effort resolution of a bare callee name to a full dotted id: prefer a definition in
/// the caller's own module, then any definition elsewhere in the repo, then a builtin, else
/// leave the bare name as an unresolved (API-classified) id.
fn resolve_callee_id(
    name: &str,
    is_method: bool,
    caller_module: &str,
    global_defs: &[(String, String)],
) -> String {
    if let Some((_, id)) = global_defs
        .iter()
        .find(|(n, id)| n == name && id.starts_with(&format!("{caller_module}.")))
    {
        return id.clone();
    }
    if let Some((_, id)) = global_defs.iter().find(|(n, _)| n == name) {
        return id.clone();
    }
    if !is_method && PYTHON_BUILTINS.contains(&name) {
        return format!("{BUILTIN_MARKER}.{name}");
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn discovers_direct_and_builtin_calls() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().to_path_buf();
        write_file(
            &repo,
            "pkg/mod.py",
            "def helper():\n    pass\n\ndef foo():\n    helper()\n    print(1)\n",
        );

        let pairs = discover_calls(&repo).unwrap();
        assert!(pairs
            .iter()
            .any(|(c, callee)| c.ends_with("foo") && callee.ends_with("helper")));
        assert!(pairs
            .iter()
            .any(|(c, callee)| c.ends_with("foo") && callee == "<builtin>.print"));
    }

    #[test]
    fn nested_function_calls_attributed_to_inner_scope() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().to_path_buf();
        write_file(
            &repo,
            "mod.py",
            "def outer():\n    def inner():\n        helper()\n    return inner\n\ndef helper():\n    pass\n",
        );

        let pairs = discover_calls(&repo).unwrap();
        assert!(pairs
            .iter()
            .any(|(c, callee)| c.ends_with("outer.inner") && callee.ends_with("helper")));
        assert!(!pairs
            .iter()
            .any(|(c, _)| c.ends_with(".outer") && !c.contains("inner")));
    }

    #[test]
    fn method_calls_resolve_by_simple_name() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().to_path_buf();
        write_file(
            &repo,
            "mod.py",
            "class Widget:\n    def render(self):\n        pass\n\ndef use(w):\n    w.render()\n",
        );

        let pairs = discover_calls(&repo).unwrap();
        assert!(pairs
            .iter()
            .any(|(c, callee)| c.ends_with(".use") && callee.ends_with("Widget.render")));
    }
}
