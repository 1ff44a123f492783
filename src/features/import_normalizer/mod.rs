//! Import normalizer: rewrites wildcard and relative imports on a scratch copy of the
//! repository before the call-graph engine ever sees it, so downstream callee-id resolution
//! doesn't have to reason about either.

pub mod domain;
pub mod infrastructure;
pub mod ports;
