pub mod builder;

pub use builder::{build_pdg, AstPdgBuilder};
