//! codeslice-ir: static interprocedural backward slicing for Python repositories.
//!
//! Pipeline: a repo's imports are normalized ([`features::import_normalizer`]), its call
//! graph is built ([`features::call_graph`]), and for any function of interest a
//! control-flow graph ([`features::cfg`]), dataflow facts ([`features::dataflow`]), and a
//! program dependence graph ([`features::pdg`]) are computed on demand, feeding the
//! interprocedural slicer ([`features::slicing`]). [`features::orchestration`] wires the
//! whole pipeline into the two end-user use cases the CLI exposes.

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;
