//! Analysis configuration.
//!
//! codeslice-ir has one stage pipeline and a handful of numeric knobs, so a single
//! serde-serializable struct with a `Default` impl covers it. Loadable from a JSON file via
//! [`AnalysisConfig::load`], written back via [`AnalysisConfig::save`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SliceError};

/// Tunables for the call-graph / CFG / dataflow / PDG / slicing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound on how many times call-graph construction re-polls its engine while
    /// waiting for the discovered call pairs to stabilize.
    pub max_iter: usize,

    /// Sanity report: callers with more callees than this get a warning.
    pub max_callees_warning: usize,

    /// Upper bound on worklist iterations per dataflow analysis, as a defensive cap against
    /// a mis-specified `meet`/`transfer` pair that never reaches a fixed point.
    pub max_worklist_iterations: usize,

    /// Default max call-chain length explored by the interprocedural slicer before a chain
    /// is abandoned as unreasonably deep. `None` means unbounded (bounded only by the
    /// per-DFS visited set that already breaks cycles).
    pub max_chain_depth: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            max_callees_warning: 40,
            max_worklist_iterations: 100_000,
            max_chain_depth: None,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| SliceError::config(format!("invalid config at {}: {e}", path.display())))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.max_callees_warning, 40);
    }

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = AnalysisConfig {
            max_iter: 7,
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        let loaded = AnalysisConfig::load(&path).unwrap();
        assert_eq!(cfg, loaded);
    }
}
