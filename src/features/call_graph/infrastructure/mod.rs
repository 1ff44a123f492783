pub mod builder;
pub mod engine;
pub mod persistence;

pub use builder::construct;
pub use engine::AstCallGraphEngine;
pub use persistence::{load, load_from_file, to_dict, write_to_file};
