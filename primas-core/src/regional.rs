//! Regional classification
//!
//! Maps a free-text branch/location string to one of the closed set of
//! organizational groups. Resolution order is load-bearing: the broker check
//! must run before generic city matching, or a brokered branch in Cali ends
//! up in SUROCCIDENTE instead of CORREDORES CALI.
//!
//! The override table is injected per rebuild rather than re-read on every
//! classification call, which keeps `classify` a pure function while still
//! reflecting the table's current contents on each rebuild.

use std::path::Path;

use tracing::warn;

/// Fallback group for anything the rules don't recognize
pub const REGIONAL_OTRA: &str = "OTRA";

/// Ordered branch-to-regional override table.
///
/// Entry order matters: fuzzy containment scans the table top to bottom and
/// the first hit wins, so the file's insertion order is part of the contract.
#[derive(Debug, Clone, Default)]
pub struct RegionalMap {
    entries: Vec<(String, String)>,
}

impl RegionalMap {
    /// Load the override table from a JSON object file.
    ///
    /// A missing or unreadable file is not fatal — classification falls back
    /// to the keyword cascade — but it is worth a warning, because exact
    /// branch names will start landing in their city groups.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!(path = %path.display(), "regional override table not found, using keyword rules only");
            return Self::default();
        }

        let raw: std::result::Result<serde_json::Map<String, serde_json::Value>, String> =
            std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "regional override table unreadable, using keyword rules only");
                return Self::default();
            }
        };

        let entries = raw
            .into_iter()
            .filter_map(|(k, v)| {
                v.as_str()
                    .map(|reg| (k.trim().to_uppercase(), reg.trim().to_uppercase()))
            })
            .collect();

        Self { entries }
    }

    /// Build a map from in-memory pairs (tests, fixtures).
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.into().to_uppercase(), v.into().to_uppercase()))
            .collect();
        Self { entries }
    }

    fn exact(&self, localidad: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == localidad)
            .map(|(_, v)| v.as_str())
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify a raw location string into its regional group.
///
/// Resolution order: exact override match, broker routing, fuzzy containment
/// over the override keys (in table order), fixed keyword cascade, OTRA.
pub fn classify(localidad: &str, map: &RegionalMap) -> String {
    let up = localidad.trim().to_uppercase();
    if up.is_empty() {
        return REGIONAL_OTRA.to_string();
    }

    // 1. Exact override
    if let Some(reg) = map.exact(&up) {
        return reg.to_string();
    }

    // 2. Brokered branches route to their own sub-groups before any city rule
    if up.contains("CORREDOR") {
        if up.contains("MEDELLIN") || up.contains("MEDELL") {
            return "CORREDORES MEDELLIN".to_string();
        }
        if up.contains("BARRANQUILLA") {
            return "CORREDORES BARRANQUILLA".to_string();
        }
        if up.contains("CALI") {
            return "CORREDORES CALI".to_string();
        }
        if up.contains("BUCARAMANGA") || up.contains("BUCARA") {
            return "CORREDORES BUCARAMANGA".to_string();
        }
        if up.contains("BOGOTA") || up.contains("BOGOT") {
            return "CORREDORES BOGOTA".to_string();
        }
        return "CORREDORES".to_string();
    }

    // 3. Fuzzy containment: "123 - A&A BOGOTA" contains the "BOGOTA" key
    for (suc, reg) in map.iter() {
        if !suc.is_empty() && up.contains(suc) {
            return reg.to_string();
        }
    }

    // 4. Keyword cascade
    if up.contains("IBAGUE") || up.contains("IBAG") {
        return "CENTRO".to_string();
    }
    if up.contains("NEIVA") {
        return "CENTRO".to_string();
    }
    if up.contains("BUCARAMANGA") || up.contains("BUCARA") {
        return "CENTRO".to_string();
    }
    if up.contains("CUCUTA") || up.contains("CÚCUTA") {
        return "CENTRO".to_string();
    }
    if up.contains("VILLAVICENCIO") || up.contains("VILLAVI") {
        return "CENTRO".to_string();
    }
    if up.contains("MEDELLIN") || up.contains("MEDELL") {
        return "ANTIOQUIA Y EJE CAFETERO".to_string();
    }
    if up.contains("BOGOTA") || up.contains("BOGOT") {
        return "BOGOTÁ".to_string();
    }
    if up.contains("BARRANQUILLA") {
        return "CARIBE".to_string();
    }
    if up.contains("CALI") && !up.contains("FIDELIZ") {
        return "SUROCCIDENTE".to_string();
    }
    if up.contains("AGENCIAS") || up.contains("MULTIPLES") {
        return "SAM".to_string();
    }
    if up.contains("DIRECTOS") || up.contains("EMPLEADOS") {
        return "SES".to_string();
    }

    // 5. Nothing matched
    REGIONAL_OTRA.to_string()
}
