//! Import-normalizer port: a repo in, a rewritten sibling repo out.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::features::import_normalizer::domain::NormalizeReport;

pub trait ImportNormalizerPort {
    /// Copy `repo_root` into a throwaway sibling directory, rewrite wildcard and relative
    /// imports file-by-file, and return the new root plus a report of what happened.
    fn normalize(&self, repo_root: &Path) -> Result<(PathBuf, NormalizeReport)>;
}
