//! Shared models and utilities, depended on by every feature.

pub mod models;
