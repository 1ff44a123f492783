//! Wraps the call-graph engine: resolves entities, classifies callees, and produces the
//! sanity report. This is the part under test — the engine itself is swappable.

use std::path::Path;

use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::features::ast::infrastructure::{extract_body, find_def, parse_file};
use crate::features::call_graph::domain::{CallGraph, SanityEntry, SanityReport};
use crate::features::call_graph::ports::CallGraphEnginePort;
use crate::shared::models::{CalleeKind, CallerRole, Entity};

/// Build the call graph and sanity report for `repo_path`, delegating call discovery to
/// `engine`. `config.max_iter` bounds how many times the engine is re-polled while waiting
/// for its output to stabilize (a no-op for a deterministic engine, which stabilizes after
/// its second call).
pub fn construct(
    repo_path: &Path,
    config: &AnalysisConfig,
    engine: &dyn CallGraphEnginePort,
) -> Result<(CallGraph, SanityReport)> {
    let mut pairs = Vec::new();
    let mut previous: Option<Vec<(String, String)>> = None;
    for _ in 0..config.max_iter.max(1) {
        let current = engine.discover_calls(repo_path)?;
        pairs = current.clone();
        let stabilized = previous.as_ref() == Some(&current);
        previous = Some(current);
        if stabilized {
            break;
        }
    }

    let mut graph = CallGraph::new();
    for (caller_id, callee_id) in pairs {
        let caller = make_caller(&caller_id, repo_path);
        let callee = Entity::new(&callee_id, repo_path);
        graph.add_call(caller, callee);
    }

    let sanity = build_sanity_report(&graph, config);
    Ok((graph, sanity))
}

fn make_caller(caller_id: &str, repo_path: &Path) -> Entity {
    let caller = Entity::new(caller_id, repo_path);
    let role = infer_caller_role(&caller);
    caller.with_role(role)
}

fn infer_caller_role(entity: &Entity) -> CallerRole {
    let Some(module) = entity.module() else {
        return CallerRole::Default;
    };
    let rest = entity
        .id()
        .strip_prefix(&format!("{}.", module.dotted_path))
        .unwrap_or(entity.id());
    if rest.contains('.') {
        CallerRole::Method
    } else {
        CallerRole::Function
    }
}

fn build_sanity_report(graph: &CallGraph, config: &AnalysisConfig) -> SanityReport {
    let mut report = SanityReport::new();

    for (caller, callees) in graph.iter() {
        let mut entry = SanityEntry {
            file: caller.module().and_then(|m| m.file_path.clone()),
            call_count: callees.len(),
            ..SanityEntry::default()
        };

        let file_exists = entry.file.as_deref().is_some_and(std::path::Path::is_file);
        if !file_exists {
            entry.warnings.push(format!("caller file does not exist for {}", caller.id()));
        }

        let body = file_exists
            .then(|| entry.file.as_ref().and_then(|f| parse_file(f).ok()))
            .flatten()
            .and_then(|tree| {
                let def = find_def(&tree, caller.simple_name(), None)?;
                Some(extract_body(&tree, def))
            });

        if file_exists && body.is_none() {
            entry
                .warnings
                .push(format!("no matching definition for caller {}", caller.id()));
        }

        entry.unknown_calls = callees
            .iter()
            .filter(|c| matches!(c.kind(), Some(CalleeKind::Builtin) | Some(CalleeKind::Api)))
            .count();

        if let Some(body) = &body {
            entry.uninvoked_calls = callees
                .iter()
                .filter(|c| !body.contains(c.simple_name()))
                .count();
        }

        if entry.call_count > config.max_callees_warning {
            entry
                .warnings
                .push(format!("caller has more than {} callees", config.max_callees_warning));
        }
        if entry.uninvoked_calls > 0 {
            entry
                .warnings
                .push(format!("{} uninvoked callees", entry.uninvoked_calls));
        }
        if entry.unknown_calls > 0 {
            entry.warnings.push(format!("{} unknown callees", entry.unknown_calls));
        }

        report.entries.insert(caller.id().to_string(), entry);
    }

    report
}
