//! Business logic services

pub mod cache;
pub mod forecast;
pub mod ingest;
pub mod report;

pub use cache::CacheManager;
pub use forecast::{ForecastGroup, ForecastReport, ForecastRow, ForecastService};
pub use ingest::IngestService;
pub use report::{PaginaRegistros, Periodos, ReportService};
