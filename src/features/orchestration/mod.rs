//! Orchestration: the two end-user-facing use cases built on top of the call graph,
//! CFG/dataflow/PDG, and interprocedural slicer — argument backward tracing and call-chain
//! listing.

pub mod application;
pub mod domain;
pub mod infrastructure;
