//! Negocios command - drill into the new-business collection
//!
//! No arguments lists the available years, a year lists its months, and a
//! year plus month prints the matching records.

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(year: Option<i32>, month: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    match (year, month) {
        (None, _) => {
            let years = ctx.report_service.negocios_years()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&years)?);
            } else if years.is_empty() {
                println!("No new business recorded.");
            } else {
                println!("{}", "Years with new business".bold());
                for y in years {
                    println!("  {}", y);
                }
            }
        }
        (Some(year), None) => {
            let months = ctx.report_service.negocios_months(year)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&months)?);
            } else if months.is_empty() {
                println!("No new business in {}.", year);
            } else {
                println!("{}", format!("Months with new business in {}", year).bold());
                for m in months {
                    println!("  {}", m);
                }
            }
        }
        (Some(year), Some(month)) => {
            let negocios = ctx.report_service.negocios_by_month(year, &month)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&negocios)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec![
                "Poliza",
                "Asegurado",
                "Regional",
                "Producto",
                "Prima USD",
                "Expedicion",
            ]);
            for n in &negocios {
                table.add_row(vec![
                    n.poliza.clone(),
                    n.asegurado.clone(),
                    n.regional.clone(),
                    n.producto.clone(),
                    output::format_usd(n.prima_total_usd),
                    n.fecha_expedicion.clone(),
                ]);
            }
            println!("{}", table);
            println!();
            println!("{} records for {} {}", negocios.len(), month.to_uppercase(), year);
        }
    }

    Ok(())
}
