pub mod parser;
pub mod queries;

pub use parser::{annotate_parents, parse, parse_file, TreeSitterAstSource};
pub use queries::{extract_arguments, extract_body, find_all_defs, find_def};
