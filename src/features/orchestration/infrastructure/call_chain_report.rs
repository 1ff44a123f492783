//! Call-chain listing: a thin wrapper reshaping [`call_chains`] into a
//! [`CallChainReport`], the shape the CLI and the argument trace's callers both expect.

use crate::features::call_graph::domain::CallGraph;
use crate::features::orchestration::domain::CallChainReport;
use crate::features::slicing::infrastructure::call_chains;

pub fn call_chains_reaching(call_graph: &CallGraph, entity_id: &str) -> CallChainReport {
    CallChainReport {
        entity_id: entity_id.to_string(),
        chains: call_chains(call_graph, entity_id),
    }
}
