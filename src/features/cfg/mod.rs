//! CFG construction and post-dominator/immediate-post-dominator computation, one graph per
//! function. [`infrastructure::build_cfg`] walks a function body into a [`domain::ControlFlowGraph`];
//! [`infrastructure::post_dominators`] and [`infrastructure::immediate_post_dominators`] feed the
//! control-dependence edges built downstream in `pdg`.

pub mod domain;
pub mod infrastructure;
pub mod ports;
