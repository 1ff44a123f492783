//! Call-chain enumeration: DFS over the inverse call graph from a target, collecting every
//! simple path down to a root (a function with no callers). Cycles are broken by a visited
//! set, so recursive call graphs still terminate.

use std::collections::HashSet;

use crate::features::call_graph::domain::CallGraph;
use crate::shared::models::Entity;

/// Every call chain reaching `target_id`, each ordered `[target, caller, ..., root]`. For
/// example `main -> a -> b`, `main -> b`, `c -> b` yields chains reaching `b` of
/// `[b, a, main]`, `[b, main]`, `[b, c]`.
pub fn call_chains(graph: &CallGraph, target_id: &str) -> Vec<Vec<String>> {
    let start = Entity::with_module(target_id, None);
    let mut chains = Vec::new();
    let mut path = vec![target_id.to_string()];
    let mut visited: HashSet<String> = HashSet::from([target_id.to_string()]);
    walk(graph, &start, &mut path, &mut visited, &mut chains);
    chains
}

fn walk(
    graph: &CallGraph,
    current: &Entity,
    path: &mut Vec<String>,
    visited: &mut HashSet<String>,
    chains: &mut Vec<Vec<String>>,
) {
    let callers = graph.callers_of(current);
    let mut extended = false;
    for caller in callers {
        let id = caller.id().to_string();
        if visited.contains(&id) {
            continue;
        }
        extended = true;
        path.push(id.clone());
        visited.insert(id.clone());
        walk(graph, caller, path, visited, chains);
        path.pop();
        visited.remove(&id);
    }
    // No unvisited caller to extend into, whether because this is a root (no callers at all)
    // or every caller is already on the path (a cycle) — either way the chain ends here.
    if !extended {
        chains.push(path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Entity;

    fn e(id: &str) -> Entity {
        Entity::with_module(id, None)
    }

    #[test]
    fn enumerates_every_simple_chain_reaching_the_target() {
        let mut graph = CallGraph::new();
        graph.add_call(e("main"), e("a"));
        graph.add_call(e("a"), e("b"));
        graph.add_call(e("main"), e("b"));
        graph.add_call(e("c"), e("b"));

        let mut chains = call_chains(&graph, "b");
        chains.sort();
        let mut expected = vec![
            vec!["b".to_string(), "a".to_string(), "main".to_string()],
            vec!["b".to_string(), "main".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ];
        expected.sort();
        assert_eq!(chains, expected);
    }

    #[test]
    fn recursive_calls_do_not_loop_forever() {
        let mut graph = CallGraph::new();
        graph.add_call(e("f"), e("f"));
        let chains = call_chains(&graph, "f");
        assert_eq!(chains, vec![vec!["f".to_string()]]);
    }
}
