//! The call-graph engine port: the "third-party call-graph engine" the builder treats as an
//! external oracle.

use std::path::Path;

use crate::errors::Result;

pub trait CallGraphEnginePort {
    /// Every call-site occurrence under `repo_root`, as `(caller_id, callee_id)` pairs, in
    /// definition/source order. Duplicates are expected and meaningful — one pair per
    /// call-site, not one per distinct pair.
    fn discover_calls(&self, repo_root: &Path) -> Result<Vec<(String, String)>>;
}
