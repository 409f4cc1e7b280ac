//! Configuration management
//!
//! Reads `settings.json` from the primas directory:
//! ```json
//! {
//!   "source": { "file": "reporte_negocios.xlsx", "sheet": "REPORTE" },
//!   "data": {
//!     "regionalMap": "data/regional_mapping.json",
//!     "metas": "data/forecast_metas.json",
//!     "estados": "data/consecutivos_estados.json"
//!   }
//! }
//! ```
//! Every path is optional; relative paths resolve against the primas
//! directory. `PRIMAS_SOURCE_FILE` overrides the source path for CI and
//! ad-hoc runs.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_SHEET: &str = "REPORTE";
const DEFAULT_SOURCE_FILE: &str = "reporte_negocios.xlsx";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    source: SourceSettings,
    #[serde(default)]
    data: DataSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceSettings {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    sheet: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataSettings {
    #[serde(default)]
    regional_map: Option<String>,
    #[serde(default)]
    metas: Option<String>,
    #[serde(default)]
    estados: Option<String>,
}

/// Primas configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub source_file: PathBuf,
    pub sheet: String,
    pub snapshot_path: PathBuf,
    pub regional_map_path: PathBuf,
    pub metas_path: PathBuf,
    pub estados_path: PathBuf,
}

impl Config {
    /// Load config from the primas directory.
    ///
    /// Source path precedence: `PRIMAS_SOURCE_FILE` env var, then
    /// settings.json, then the default workbook name in the primas dir.
    pub fn load(primas_dir: &Path) -> Result<Self> {
        let settings_path = primas_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let resolve = |p: &str| -> PathBuf {
            let path = PathBuf::from(p);
            if path.is_absolute() {
                path
            } else {
                primas_dir.join(path)
            }
        };

        let source_file = std::env::var("PRIMAS_SOURCE_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| resolve(&v))
            .or_else(|| raw.source.file.as_deref().map(resolve))
            .unwrap_or_else(|| primas_dir.join(DEFAULT_SOURCE_FILE));

        let sheet = raw
            .source
            .sheet
            .clone()
            .unwrap_or_else(|| DEFAULT_SHEET.to_string());

        let regional_map_path = raw
            .data
            .regional_map
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| primas_dir.join("data").join("regional_mapping.json"));

        let metas_path = raw
            .data
            .metas
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| primas_dir.join("data").join("forecast_metas.json"));

        let estados_path = raw
            .data
            .estados
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| primas_dir.join("data").join("consecutivos_estados.json"));

        Ok(Self {
            source_file,
            sheet,
            snapshot_path: primas_dir.join("snapshot.json"),
            regional_map_path,
            metas_path,
            estados_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.sheet, "REPORTE");
        assert_eq!(
            config.source_file,
            dir.path().join("reporte_negocios.xlsx")
        );
        assert_eq!(config.snapshot_path, dir.path().join("snapshot.json"));
        assert!(config.regional_map_path.ends_with("data/regional_mapping.json"));
    }

    #[test]
    fn test_settings_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{
                "source": { "file": "exports/reporte_2025.csv", "sheet": "DETALLE" },
                "data": { "regionalMap": "/etc/primas/regional.json" }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.sheet, "DETALLE");
        assert_eq!(
            config.source_file,
            dir.path().join("exports/reporte_2025.csv")
        );
        // absolute paths pass through untouched
        assert_eq!(
            config.regional_map_path,
            PathBuf::from("/etc/primas/regional.json")
        );
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{broken").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.sheet, "REPORTE");
    }
}
