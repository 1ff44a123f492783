//! Generic monotone dataflow worklist, instantiated as variable def/use and reaching
//! definitions ([`infrastructure::run_var_def_use`], [`infrastructure::run_reaching_defs`]),
//! which feed the PDG builder in `pdg`.

pub mod domain;
pub mod infrastructure;
pub mod ports;
