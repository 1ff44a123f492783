//! Orchestration UseCase Implementation
//!
//! Ties together call-graph construction, the parameter-first-use search, and the
//! interprocedural slicer behind two entry points external callers (the CLI, in
//! particular) should depend on instead of wiring the lower features by hand.

use std::path::Path;

use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::features::call_graph::domain::{CallGraph, SanityReport};
use crate::features::call_graph::infrastructure::{construct, AstCallGraphEngine};
use crate::features::orchestration::domain::{ArgumentBackwardTraceReport, CallChainReport};
use crate::features::orchestration::infrastructure::{argument_backward_trace, call_chains_reaching};

/// Orchestration UseCase Trait
///
/// External callers should depend on this trait, not on the individual features it wires
/// together.
pub trait OrchestrationUseCase: Send + Sync {
    /// Given a repo, a file in it, and a function name: trace every parameter back through
    /// its callers via the interprocedural slicer.
    fn trace_arguments(
        &self,
        repo_root: &Path,
        file: &Path,
        function_name: &str,
    ) -> Result<ArgumentBackwardTraceReport>;

    /// Given a repo and an entity id: list every call chain reaching it.
    fn list_call_chains(&self, repo_root: &Path, entity_id: &str) -> Result<CallChainReport>;
}

/// Default [`OrchestrationUseCase`]: builds the call graph fresh from `repo_root` with the
/// AST-based engine on every call. A caller tracing many functions in the same repo should
/// build the graph once with [`construct`] and call
/// [`argument_backward_trace`]/[`call_chains_reaching`] directly instead.
#[derive(Debug, Default)]
pub struct OrchestrationUseCaseImpl {
    config: AnalysisConfig,
}

impl OrchestrationUseCaseImpl {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    fn build_call_graph(&self, repo_root: &Path) -> Result<(CallGraph, SanityReport)> {
        construct(repo_root, &self.config, &AstCallGraphEngine::new())
    }
}

impl OrchestrationUseCase for OrchestrationUseCaseImpl {
    fn trace_arguments(
        &self,
        repo_root: &Path,
        file: &Path,
        function_name: &str,
    ) -> Result<ArgumentBackwardTraceReport> {
        let (graph, _sanity) = self.build_call_graph(repo_root)?;
        argument_backward_trace(repo_root, file, function_name, &graph)
    }

    fn list_call_chains(&self, repo_root: &Path, entity_id: &str) -> Result<CallChainReport> {
        let (graph, _sanity) = self.build_call_graph(repo_root)?;
        Ok(call_chains_reaching(&graph, entity_id))
    }
}
