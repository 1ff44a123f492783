mod call_chains;
mod interprocedural;
mod locator;

pub use call_chains::call_chains;
pub use interprocedural::backward_slice_interprocedural;
pub use locator::{locate, RepoFunctionLocator};
