//! Manual estado overrides store
//!
//! Status lookups against the insurer portal write per-consecutivo state
//! updates into a side JSON file. The report layer merges them over the
//! cached estado on read, so a refreshed state shows up without rebuilding
//! the snapshot. Read-only from this subsystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Read-only view over the consecutivo-estado overrides file.
pub struct EstadoOverrides {
    path: PathBuf,
}

impl EstadoOverrides {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current overrides keyed by consecutivo. Empty-string states are
    /// dropped: an empty update must not blank out the imported estado.
    pub fn load(&self) -> HashMap<String, String> {
        if !self.path.exists() {
            return HashMap::new();
        }
        let parsed: Result<HashMap<String, String>, String> =
            std::fs::read_to_string(&self.path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(map) => map
                .into_iter()
                .filter(|(_, estado)| !estado.trim().is_empty())
                .collect(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "estado overrides unreadable, ignoring");
                HashMap::new()
            }
        }
    }
}
