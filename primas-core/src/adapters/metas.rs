//! Forecast targets store
//!
//! The commercial team maintains per-regional monthly targets ("metas") in a
//! side JSON file, keyed by period label (`"DIC 25"`) and then by group
//! name. This subsystem only reads it; edits happen through other tooling.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Read-only view over the metas JSON file.
pub struct MetasStore {
    path: PathBuf,
}

impl MetasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Targets for one period label, e.g. `"MAR 25"`.
    ///
    /// A missing or malformed file yields an empty table: the forecast then
    /// reports zero metas, which is what the original dashboard showed
    /// before targets were entered.
    pub fn targets_for(&self, periodo: &str) -> HashMap<String, f64> {
        self.load_all()
            .remove(periodo)
            .unwrap_or_default()
    }

    fn load_all(&self) -> HashMap<String, HashMap<String, f64>> {
        if !self.path.exists() {
            return HashMap::new();
        }
        match std::fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(all) => all,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "metas file unreadable, treating as empty");
                HashMap::new()
            }
        }
    }
}
