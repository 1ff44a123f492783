//! Pipeline stages, one module per component: repo -> [`import_normalizer`] -> [`call_graph`]
//! -> per-function ([`ast`] -> [`cfg`] -> [`dataflow`] -> [`pdg`]) -> [`slicing`], wired
//! together by [`orchestration`].

pub mod ast;
pub mod call_graph;
pub mod cfg;
pub mod dataflow;
pub mod import_normalizer;
pub mod orchestration;
pub mod pdg;
pub mod slicing;
