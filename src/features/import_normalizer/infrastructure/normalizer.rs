//! Rewrites wildcard and relative imports across a copy of a repository.
//!
//! The repository is copied wholesale into a fixed-suffix sibling directory first (deleted
//! if already present from a previous run, then recreated), so a parse failure partway
//! through never corrupts the caller's tree and every file — rewritten or not — is present
//! in the output.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{Result, SliceError};
use crate::features::ast::domain::{AstTree, SyntaxKind};
use crate::features::ast::infrastructure::parse;
use crate::features::import_normalizer::domain::NormalizeReport;
use crate::features::import_normalizer::ports::ImportNormalizerPort;

pub struct FileTreeImportNormalizer;

impl FileTreeImportNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileTreeImportNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportNormalizerPort for FileTreeImportNormalizer {
    fn normalize(&self, repo_root: &Path) -> Result<(PathBuf, NormalizeReport)> {
        normalize(repo_root)
    }
}

/// Fixed sibling-suffix scratch directory: `<repo>_temp`, next to `repo_root`.
fn scratch_root(repo_root: &Path) -> PathBuf {
    let name = repo_root
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let parent = repo_root.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{name}_temp"))
}

pub fn normalize(repo_root: &Path) -> Result<(PathBuf, NormalizeReport)> {
    let dest_root = scratch_root(repo_root);
    if dest_root.is_dir() {
        fs::remove_dir_all(&dest_root)?;
    }
    fs::create_dir_all(&dest_root)?;
    copy_tree(repo_root, &dest_root)?;

    let mut report = NormalizeReport::new();
    let py_files: Vec<PathBuf> = WalkDir::new(&dest_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().is_some_and(|ext| ext == "py"))
        .collect();

    for file in &py_files {
        match normalize_file(file, &dest_root) {
            Ok(Some(rewritten)) => {
                fs::write(file, rewritten)?;
                report.record_rewritten(file.clone());
            }
            Ok(None) => {}
            Err(e) => report.record_skipped(file.clone(), e.to_string()),
        }
    }

    Ok((dest_root, report))
}

fn copy_tree(src_root: &Path, dest_root: &Path) -> Result<()> {
    for entry in WalkDir::new(src_root).into_iter().filter_map(|e| e.ok()) {
        let rel = entry.path().strip_prefix(src_root).unwrap_or(entry.path());
        let dest = dest_root.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Rewrite a single file's wildcard/relative imports. `Ok(None)` means nothing to change;
/// `Err` means the file failed to parse and should be reported, not rewritten.
fn normalize_file(file: &Path, dest_root: &Path) -> Result<Option<String>> {
    let source = fs::read_to_string(file)?;
    let tree = parse(&source, Some(file.to_path_buf()))?;
    if tree_has_error(&tree) {
        return Err(SliceError::parse(file, "syntax error in source"));
    }

    let package = file_package(file);
    let mut edits: Vec<(usize, usize, String)> = Vec::new();

    for id in tree.walk() {
        if tree.node(id).kind != SyntaxKind::ImportFromStmt {
            continue;
        }
        let text = tree.text(id);
        let Some((module_part, import_part)) = parse_from_clause(text) else {
            continue;
        };

        if import_part.trim() == "*" {
            if let Some(new_text) = expand_wildcard(&module_part, file, dest_root)? {
                edits.push((tree.node(id).byte_range.0, tree.node(id).byte_range.1, new_text));
            }
            continue;
        }

        if module_part.starts_with('.') {
            if let Some(new_text) = absolutize_relative(&module_part, &import_part, &package) {
                edits.push((tree.node(id).byte_range.0, tree.node(id).byte_range.1, new_text));
            }
        }
    }

    if edits.is_empty() {
        return Ok(None);
    }

    edits.sort_by_key(|&(start, _, _)| std::cmp::Reverse(start));
    let mut rewritten = source;
    for (start, end, new_text) in edits {
        rewritten.replace_range(start..end, &new_text);
    }
    Ok(Some(rewritten))
}

fn tree_has_error(tree: &AstTree) -> bool {
    tree.nodes.iter().any(|n| n.raw_kind == "ERROR" || n.raw_kind == "MISSING")
}

/// `from <module_part> import <import_part>`, split on the literal `" import "` separator.
fn parse_from_clause(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix("from ")?;
    let (module_part, import_part) = rest.split_once(" import ")?;
    Some((module_part.trim().to_string(), import_part.trim().to_string()))
}

/// Dotted package segments of `file`'s containing package, found by walking up while each
/// ancestor directory carries an `__init__.py` marker.
fn file_package(file: &Path) -> Vec<String> {
    let mut pkg = Vec::new();
    let mut dir = file.parent();
    while let Some(d) = dir {
        if d.join("__init__.py").is_file() {
            if let Some(name) = d.file_name().and_then(|n| n.to_str()) {
                pkg.push(name.to_string());
            }
            dir = d.parent();
        } else {
            break;
        }
    }
    pkg.reverse();
    pkg
}

fn absolutize_relative(module_part: &str, import_part: &str, package: &[String]) -> Option<String> {
    let level = module_part.chars().take_while(|&c| c == '.').count();
    let remainder = &module_part[level..];
    if level == 0 || level - 1 > package.len() {
        return None;
    }
    let base = &package[..package.len() - (level - 1)];
    let mut segments: Vec<&str> = base.iter().map(String::as_str).collect();
    if !remainder.is_empty() {
        segments.push(remainder);
    }
    let absolute = segments.join(".");
    if absolute.is_empty() {
        return None;
    }
    Some(format!("from {absolute} import {import_part}"))
}

fn resolve_module_file(module_part: &str, file: &Path, dest_root: &Path) -> Option<PathBuf> {
    let rel: PathBuf = if module_part.starts_with('.') {
        let package = file_package(file);
        let level = module_part.chars().take_while(|&c| c == '.').count();
        let remainder = &module_part[level..];
        if level - 1 > package.len() {
            return None;
        }
        let base = &package[..package.len() - (level - 1)];
        base.iter()
            .map(PathBuf::from)
            .chain(remainder.split('.').filter(|s| !s.is_empty()).map(PathBuf::from))
            .collect()
    } else {
        module_part.split('.').map(PathBuf::from).collect()
    };
    let candidate = dest_root.join(rel).with_extension("py");
    candidate.is_file().then_some(candidate)
}

/// Expand `from <module_part> import *` into an explicit import of every top-level
/// function/class defined in the resolved target module.
fn expand_wildcard(module_part: &str, file: &Path, dest_root: &Path) -> Result<Option<String>> {
    let Some(target_file) = resolve_module_file(module_part, file, dest_root) else {
        return Ok(None);
    };
    let target_source = fs::read_to_string(&target_file)?;
    let target_tree = parse(&target_source, Some(target_file.clone()))?;

    let names: Vec<String> = target_tree
        .node(target_tree.root)
        .children
        .iter()
        .filter(|&&top| {
            matches!(
                target_tree.node(top).kind,
                SyntaxKind::FunctionDef | SyntaxKind::ClassDef
            )
        })
        .filter_map(|&top| target_tree.child_by_field(top, "name"))
        .map(|name_id| target_tree.text(name_id).to_string())
        .collect();

    if names.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!("from {module_part} import {}", names.join(", "))))
}
