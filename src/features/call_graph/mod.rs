//! Call-graph builder: wraps a pluggable call-discovery engine, classifies every
//! callee, and keeps a forward/inverse pair plus a sanity report.

pub mod domain;
pub mod infrastructure;
pub mod ports;
