//! Cache snapshot domain model

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::registro::{ConsecutivoPendiente, NegocioNuevo, Registro};

/// An immutable, fully-built instance of the normalized dataset.
///
/// Owned by the cache manager; a refresh produces a whole new snapshot that
/// atomically replaces the old one. Nothing mutates a snapshot after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// ISO-8601 creation time
    pub timestamp: String,
    pub total_registros: usize,
    pub negocios_nuevos_count: usize,
    pub consecutivos_count: usize,
    /// Rows excluded for having no identity signal (diagnostic, not error)
    #[serde(default)]
    pub descartados: usize,
    /// Cells that degraded to a safe default during normalization
    #[serde(default)]
    pub campos_degradados: usize,
    pub negocios_nuevos: Vec<NegocioNuevo>,
    pub consecutivos: Vec<ConsecutivoPendiente>,
    pub todos: Vec<Registro>,
}

impl CacheSnapshot {
    /// Build a snapshot from the three partitioned collections.
    pub fn new(
        todos: Vec<Registro>,
        negocios_nuevos: Vec<NegocioNuevo>,
        consecutivos: Vec<ConsecutivoPendiente>,
        descartados: usize,
        campos_degradados: usize,
    ) -> Self {
        Self {
            timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            total_registros: todos.len(),
            negocios_nuevos_count: negocios_nuevos.len(),
            consecutivos_count: consecutivos.len(),
            descartados,
            campos_degradados,
            negocios_nuevos,
            consecutivos,
            todos,
        }
    }

    /// An empty snapshot (useful as a query-layer fallback)
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_follow_collections() {
        let snap = CacheSnapshot::empty();
        assert_eq!(snap.total_registros, 0);
        assert_eq!(snap.negocios_nuevos_count, 0);
        assert_eq!(snap.consecutivos_count, 0);
        assert!(!snap.timestamp.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let snap = CacheSnapshot::empty();
        let json = serde_json::to_string(&snap).unwrap();
        let back: CacheSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp, snap.timestamp);
    }
}
