//! Forecast command - realized premium against targets

use anyhow::{bail, Result};
use colored::Colorize;

use super::get_context;
use crate::output;
use primas_core::services::ForecastRow;

pub fn run(year: Option<i32>, month: Option<&str>, months: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if months {
        let available = ctx.forecast_service.available_months()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&available)?);
        } else if available.is_empty() {
            println!("No periods with data.");
        } else {
            for p in &available {
                println!("  {}", p);
            }
        }
        return Ok(());
    }

    let (Some(year), Some(month)) = (year, month) else {
        bail!("forecast needs YEAR and MONTH (or --months to list periods)");
    };

    let report = ctx.forecast_service.rollup(year, month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", format!("Forecast {}", report.periodo).bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Regional", "Meta", "Real", "Cumplimiento", "Faltante"]);

    let add_row = |table: &mut comfy_table::Table, fila: &ForecastRow| {
        table.add_row(vec![
            fila.nombre.clone(),
            output::format_usd(fila.meta),
            output::format_usd(fila.real),
            output::format_pct(fila.cumplimiento),
            output::format_usd(fila.faltante),
        ]);
    };

    for grupo in &report.grupos {
        for fila in &grupo.filas {
            add_row(&mut table, fila);
        }
        add_row(&mut table, &grupo.total);
    }
    add_row(&mut table, &report.total_gerencia);

    println!("{}", table);

    Ok(())
}
