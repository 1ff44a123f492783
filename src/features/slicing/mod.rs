//! Interprocedural backward slicing: call-chain enumeration plus per-hop call-site
//! resolution and intraprocedural slicing, unioned into one
//! [`domain::InterproceduralSlice`].

pub mod domain;
pub mod infrastructure;
pub mod ports;
