//! Primas Core - pipeline for the international health business report
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Registro, CacheSnapshot, etc.)
//! - **ports**: Trait definitions for external dependencies (ReportSource)
//! - **normalize / schema / regional**: pure transformation building blocks
//! - **services**: Business logic orchestration (ingest, cache, report, forecast)
//! - **adapters**: Concrete implementations (Excel, CSV, mock, JSON stores)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod normalize;
pub mod ports;
pub mod regional;
pub mod schema;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{source_for_path, EstadoOverrides, MetasStore};
use config::Config;
use services::{CacheManager, ForecastService, ReportService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{CacheSnapshot, ConsecutivoPendiente, NegocioNuevo, Registro};

/// Main context for Primas operations
///
/// This is the primary entry point for all business logic. It wires the
/// report source, the cache manager and the read services together.
pub struct PrimasContext {
    pub config: Config,
    pub cache: Arc<CacheManager>,
    pub report_service: ReportService,
    pub forecast_service: ForecastService,
}

impl PrimasContext {
    /// Create a new Primas context rooted at the given directory
    pub fn new(primas_dir: &Path) -> Result<Self> {
        let config = Config::load(primas_dir)?;

        let source = source_for_path(&config.source_file, &config.sheet)?;
        let cache = Arc::new(CacheManager::new(
            source,
            config.snapshot_path.clone(),
            config.regional_map_path.clone(),
        ));

        let report_service = ReportService::new(
            Arc::clone(&cache),
            EstadoOverrides::new(config.estados_path.clone()),
        );
        let forecast_service = ForecastService::new(
            Arc::clone(&cache),
            MetasStore::new(config.metas_path.clone()),
        );

        Ok(Self {
            config,
            cache,
            report_service,
            forecast_service,
        })
    }
}
