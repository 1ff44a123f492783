mod access;
mod reaching_def;
mod var_def_use;
mod worklist;

pub use access::extract_accesses;
pub use reaching_def::{run_reaching_defs, ReachingDefAnalysis};
pub use var_def_use::{run_var_def_use, VarDefUseAnalysis};
pub use worklist::DataflowResult;
