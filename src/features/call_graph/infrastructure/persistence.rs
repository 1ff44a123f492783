//! JSON round-trip for a [`CallGraph`]: a mapping from caller-id string to a list of
//! callee-id strings, independent of any resolved module/kind/role — those are re-derived
//! at construction time, not persisted.

use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{Result, SliceError};
use crate::features::call_graph::domain::CallGraph;
use crate::shared::models::Entity;

pub fn to_dict(graph: &CallGraph) -> Value {
    let mut map = Map::new();
    for (caller, callees) in graph.iter() {
        let ids: Vec<Value> = callees.iter().map(|c| Value::String(c.id().to_string())).collect();
        map.insert(caller.id().to_string(), Value::Array(ids));
    }
    Value::Object(map)
}

pub fn load(value: &Value) -> Result<CallGraph> {
    let map = value
        .as_object()
        .ok_or_else(|| SliceError::analysis("call graph JSON must be an object"))?;

    let mut graph = CallGraph::new();
    for (caller_id, callees) in map {
        let callee_ids = callees
            .as_array()
            .ok_or_else(|| SliceError::analysis(format!("callee list for {caller_id} must be an array")))?;
        let caller = Entity::with_module(caller_id, None);
        for callee_value in callee_ids {
            let callee_id = callee_value
                .as_str()
                .ok_or_else(|| SliceError::analysis(format!("non-string callee id for {caller_id}")))?;
            graph.add_call(caller.clone(), Entity::with_module(callee_id, None));
        }
        if callee_ids.is_empty() {
            graph.register_caller(caller.clone());
        }
    }
    Ok(graph)
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<CallGraph> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    load(&value)
}

pub fn write_to_file(graph: &CallGraph, path: impl AsRef<Path>) -> Result<()> {
    let value = to_dict(graph);
    let text = serde_json::to_string_pretty(&value)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut graph = CallGraph::new();
        graph.add_call(
            Entity::with_module("pkg.a", None),
            Entity::with_module("pkg.b", None),
        );
        graph.add_call(
            Entity::with_module("pkg.a", None),
            Entity::with_module("pkg.c", None),
        );

        let dict = to_dict(&graph);
        let reloaded = load(&dict).unwrap();
        assert_eq!(to_dict(&reloaded), dict);
    }
}
