//! AST port — the narrow interface the rest of the pipeline depends on, so a different
//! language front end could be substituted without touching the call-graph/CFG/PDG layers.

use std::path::Path;

use crate::errors::Result;
use crate::features::ast::domain::AstTree;

pub trait AstSourcePort {
    fn parse(&self, source_text: &str) -> Result<AstTree>;
    fn parse_file(&self, path: &Path) -> Result<AstTree>;
}
