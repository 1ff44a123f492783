//! Program dependence graph: combines the CFG, post-dominators, and the two dataflow
//! instantiations into control- and data-dependence edges ([`infrastructure::build_pdg`]),
//! the structure the `slicing` feature's backward slicers walk.

pub mod domain;
pub mod infrastructure;
pub mod ports;
