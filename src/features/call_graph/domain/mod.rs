//! The call graph itself: a forward map kept in caller-insertion order, with an inverse that
//! is a pure derivative rebuilt on every mutation, plus the informational sanity report.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::shared::models::Entity;

/// `forward: caller -> ordered sequence of callees`, `inverse: callee -> sequence of
/// callers`. `inverse` is never mutated directly; it is fully recomputed from `forward`
/// after every [`CallGraph::add_call`], per the "pure derivative" contract.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    order: Vec<Entity>,
    forward: HashMap<Entity, Vec<Entity>>,
    inverse: HashMap<Entity, Vec<Entity>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callee` to `forward[caller]`, classifying it as a callee of `caller` at
    /// insertion time. The assigned kind is never revisited afterward.
    pub fn add_call(&mut self, caller: Entity, callee: Entity) {
        let kind = callee.classify_as_callee_of(&caller);
        let callee = callee.with_kind(kind);
        if !self.forward.contains_key(&caller) {
            self.order.push(caller.clone());
        }
        self.forward.entry(caller).or_default().push(callee);
        self.rebuild_inverse();
    }

    /// Record `caller` in insertion order even if it has no callees yet (e.g. a caller with
    /// an empty callee list reloaded from JSON).
    pub fn register_caller(&mut self, caller: Entity) {
        if !self.forward.contains_key(&caller) {
            self.order.push(caller.clone());
            self.forward.insert(caller, Vec::new());
            self.rebuild_inverse();
        }
    }

    fn rebuild_inverse(&mut self) {
        self.inverse.clear();
        for caller in &self.order {
            let Some(callees) = self.forward.get(caller) else {
                continue;
            };
            for callee in callees {
                self.inverse.entry(callee.clone()).or_default().push(caller.clone());
            }
        }
    }

    pub fn callees_of(&self, caller: &Entity) -> &[Entity] {
        self.forward.get(caller).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn callers_of(&self, callee: &Entity) -> &[Entity] {
        self.inverse.get(callee).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn forward(&self) -> &HashMap<Entity, Vec<Entity>> {
        &self.forward
    }

    pub fn inverse(&self) -> &HashMap<Entity, Vec<Entity>> {
        &self.inverse
    }

    /// Callers that are never themselves called — the starting points of call-chain
    /// enumeration.
    pub fn roots(&self) -> Vec<&Entity> {
        self.order.iter().filter(|c| !self.inverse.contains_key(*c)).collect()
    }

    /// `(caller, callees)` pairs in caller-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Entity, &[Entity])> {
        self.order.iter().map(move |c| {
            (
                c,
                self.forward.get(c).map(Vec::as_slice).unwrap_or(&[]),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a> IntoIterator for &'a CallGraph {
    type Item = (&'a Entity, &'a [Entity]);
    type IntoIter = Box<dyn Iterator<Item = (&'a Entity, &'a [Entity])> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Per-caller diagnostics produced alongside [`CallGraph`] construction. Informational only
/// — it never feeds back into the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanityEntry {
    pub file: Option<PathBuf>,
    pub call_count: usize,
    pub uninvoked_calls: usize,
    pub unknown_calls: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SanityReport {
    pub entries: BTreeMap<String, SanityEntry>,
}

impl SanityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_for(&self, caller_id: &str) -> Option<&SanityEntry> {
        self.entries.get(caller_id)
    }
}
