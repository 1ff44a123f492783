//! AST utilities: parse source text to a tree, walk it, annotate parent pointers, and
//! extract function definitions/parameters/bodies. Everything downstream treats the tree
//! as an opaque labeled structure reached only through [`ports::AstSourcePort`] and the
//! query functions in `infrastructure::queries`.

pub mod domain;
pub mod infrastructure;
pub mod ports;
