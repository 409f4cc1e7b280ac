//! Primas CLI - the health business report in your terminal

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{consecutivos, forecast, negocios, refresh, reporte, status};

/// Primas - business report pipeline and queries
#[derive(Parser)]
#[command(name = "primas", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show snapshot status and diagnostics
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the cached dataset from the source report
    Refresh {
        /// Rebuild even if the persisted snapshot looks fresh
        #[arg(long)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Page through the full normalized record set
    Reporte {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Records per page
        #[arg(long, default_value_t = 100)]
        page_size: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// New business: list years, months of a year, or records of a month
    Negocios {
        /// Year to inspect (e.g. 2025)
        year: Option<i32>,
        /// Month to filter (number or Spanish name)
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pending consecutivos, with manual estado updates merged
    Consecutivos {
        /// Filter by year
        #[arg(long)]
        year: Option<i32>,
        /// Filter by month (number or Spanish name)
        #[arg(long)]
        month: Option<String>,
        /// List available "MES YYYY" periods instead of records
        #[arg(long)]
        periods: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forecast rollup: realized premium against targets
    Forecast {
        /// Year (two or four digits)
        year: Option<i32>,
        /// Month (number or Spanish name)
        month: Option<String>,
        /// List periods with data instead of computing a rollup
        #[arg(long)]
        months: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // quiet by default; RUST_LOG=primas_core=debug opens the pipeline up
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Refresh { force, json } => refresh::run(force, json),
        Commands::Reporte { page, page_size, json } => reporte::run(page, page_size, json),
        Commands::Negocios { year, month, json } => negocios::run(year, month, json),
        Commands::Consecutivos { year, month, periods, json } => {
            consecutivos::run(year, month.as_deref(), periods, json)
        }
        Commands::Forecast { year, month, months, json } => {
            forecast::run(year, month.as_deref(), months, json)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}
