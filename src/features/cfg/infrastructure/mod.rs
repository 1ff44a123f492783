pub mod builder;
pub mod postdom;

pub use builder::{build_cfg, AstCfgBuilder};
pub use postdom::{immediate_post_dominators, post_dominators, PostDomTable};
