//! CLI command implementations

pub mod consecutivos;
pub mod forecast;
pub mod negocios;
pub mod refresh;
pub mod reporte;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use primas_core::PrimasContext;

/// Get the primas directory from environment or default
pub fn get_primas_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PRIMAS_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".primas")
    }
}

/// Get or create primas context
pub fn get_context() -> Result<PrimasContext> {
    let primas_dir = get_primas_dir();

    std::fs::create_dir_all(&primas_dir)
        .with_context(|| format!("Failed to create primas directory: {:?}", primas_dir))?;

    PrimasContext::new(&primas_dir).context("Failed to initialize primas context")
}
