//! Resolves a call-graph entity id back to its parsed source, by re-walking the repository
//! and matching dotted module/qualified-name prefixes — the inverse of the work the call-graph
//! engine already does in `module_dotted_path`/`qualified_name`, reused here rather than
//! reimplemented.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::features::ast::domain::{AstNodeId, AstTree, SyntaxKind};
use crate::features::ast::infrastructure::parse;
use crate::features::call_graph::infrastructure::engine::{module_dotted_path, qualified_name};
use crate::features::slicing::ports::FunctionLocatorPort;

pub struct RepoFunctionLocator;

impl RepoFunctionLocator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RepoFunctionLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionLocatorPort for RepoFunctionLocator {
    fn locate(&self, repo_root: &Path, function_id: &str) -> Option<(AstTree, AstNodeId)> {
        locate(repo_root, function_id)
    }
}

pub fn locate(repo_root: &Path, function_id: &str) -> Option<(AstTree, AstNodeId)> {
    let files: Vec<PathBuf> = WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().is_some_and(|ext| ext == "py"))
        .collect();

    for file in files {
        let module_path = module_dotted_path(&file, repo_root);
        let prefix = format!("{module_path}.");
        let Some(qualified) = function_id.strip_prefix(&prefix) else {
            continue;
        };
        let Ok(source) = fs::read_to_string(&file) else {
            continue;
        };
        let Ok(tree) = parse(&source, Some(file.clone())) else {
            continue;
        };
        if let Some(def_id) = find_by_qualified_name(&tree, qualified) {
            return Some((tree, def_id));
        }
    }
    None
}

fn find_by_qualified_name(tree: &AstTree, qualified: &str) -> Option<AstNodeId> {
    tree.walk()
        .find(|&id| tree.node(id).kind == SyntaxKind::FunctionDef && qualified_name(tree, id) == qualified)
}
