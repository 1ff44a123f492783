//! The interprocedural slicer needs to turn a call-graph entity id back into parsed source —
//! a different direction than the call-graph engine's "files -> ids" walk, so it gets its own
//! seam rather than reusing [`crate::features::call_graph::ports::CallGraphEnginePort`].

use std::path::Path;

use crate::features::ast::domain::{AstNodeId, AstTree};

pub trait FunctionLocatorPort {
    /// Resolve a call-graph entity id to its parsed source tree and function-definition node,
    /// if this crate can locate and parse the file it lives in.
    fn locate(&self, repo_root: &Path, function_id: &str) -> Option<(AstTree, AstNodeId)>;
}
