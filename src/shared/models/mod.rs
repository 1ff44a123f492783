//! Shared models used across every analysis stage.

mod entity;
mod span;

pub use entity::{CalleeKind, CallerRole, Entity, Module};
pub use span::{Location, Span};
