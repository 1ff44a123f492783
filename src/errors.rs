//! Error types for codeslice-ir
//!
//! Provides unified error handling across the crate. Most failure conditions (unresolved
//! calls, missing definitions, unmatched call-sites, a branch with no immediate
//! post-dominator) are not fatal — they're recorded on a sanity/slice report instead of
//! raised. Only unreadable files and parser failures propagate as `SliceError`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for codeslice-ir operations
#[derive(Debug, Error)]
pub enum SliceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or malformed source file
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Failure inside one of the analysis stages (CFG/dataflow/PDG)
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Failure wiring pipeline stages together
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Bad configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization failure for call-graph persistence
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl SliceError {
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SliceError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        SliceError::Analysis(msg.into())
    }

    pub fn pipeline(msg: impl Into<String>) -> Self {
        SliceError::Pipeline(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        SliceError::Config(msg.into())
    }
}

/// Result type alias for codeslice-ir operations
pub type Result<T> = std::result::Result<T, SliceError>;
