//! Report shapes for the two orchestration use cases: tracing a function's parameters back
//! through their callers, and listing the call chains reaching an entity.

use crate::features::slicing::domain::InterproceduralSlice;
use crate::shared::models::Span;

/// One parameter's backward trace: where it's first read inside the function body, and the
/// interprocedural slice rooted at that use.
#[derive(Debug, Clone)]
pub struct ArgumentTrace {
    pub parameter: String,
    /// `None` if the parameter is never read in the function body (e.g. unused).
    pub first_use: Option<Span>,
    pub slice: InterproceduralSlice,
}

#[derive(Debug, Clone)]
pub struct ArgumentBackwardTraceReport {
    pub function_id: String,
    pub traces: Vec<ArgumentTrace>,
}

#[derive(Debug, Clone)]
pub struct CallChainReport {
    pub entity_id: String,
    pub chains: Vec<Vec<String>>,
}
