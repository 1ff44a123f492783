//! Interprocedural slicing domain model: the output is a set of (function, statement) pairs,
//! plus a record of call chains the slicer couldn't walk all the way through so the caller
//! can see what was dropped rather than silently under-reporting.

use std::collections::HashSet;

use crate::shared::models::Span;

/// One statement contributing to an interprocedural slice, identified by its owning function
/// and source span rather than an `AstNodeId` — those only make sense within the tree they
/// came from, and a slice spans many trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SliceStatement {
    pub function_id: String,
    pub span: Span,
    pub snippet: String,
}

/// A call chain `[target, caller, ..., root]` the slicer gave up on partway through, and why
/// — e.g. no matching call-site found, or the caller's source couldn't be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChain {
    pub chain: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct InterproceduralSlice {
    pub statements: HashSet<SliceStatement>,
    pub skipped: Vec<SkippedChain>,
}
