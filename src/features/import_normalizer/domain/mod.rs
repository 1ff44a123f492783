//! Result bookkeeping for a normalization pass.

use std::path::PathBuf;

/// What happened to each file during normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub rewritten: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl NormalizeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_rewritten(&mut self, path: PathBuf) {
        self.rewritten.push(path);
    }

    pub fn record_skipped(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path,
            reason: reason.into(),
        });
    }
}
