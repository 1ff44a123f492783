mod argument_trace;
mod call_chain_report;

pub use argument_trace::argument_backward_trace;
pub use call_chain_report::call_chains_reaching;
