//! Dataflow value types: the single access vocabulary both instantiations extract from CFG
//! statements, and the two lattice values (`VarDefUse`, `ReachingDefs`) built on top of it.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

/// A single variable access inside a statement. Context (assignment target vs. expression
/// operand) discriminates read from write at extraction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read(String),
    Write(String),
}

/// The local effect of one CFG node: what it reads and writes, independent of any
/// accumulated forward state. Not a forward accumulation itself — see [`VarDefUse`]'s use as
/// a `var_def_use`-labelled analysis value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarDefUse {
    pub defs: HashSet<String>,
    pub uses: HashSet<String>,
}

/// A `(variable, defining CFG node)` pair live at a program point. The reaching-definitions
/// lattice value is a set of these; meet is set union, and a WRITE to `v` replaces every
/// existing pair naming `v`.
pub type ReachingDefs = HashSet<(String, NodeIndex)>;
