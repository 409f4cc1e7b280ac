//! Consecutivos command - pending records and their tracking periods

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(year: Option<i32>, month: Option<&str>, periods: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if periods {
        let periodos = ctx.report_service.consecutivo_periods()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&periodos)?);
        } else if periodos.periods.is_empty() {
            println!("No pending consecutivos.");
        } else {
            for p in &periodos.periods {
                println!("  {}", p);
            }
        }
        return Ok(());
    }

    let pendientes = ctx.report_service.consecutivos(year, month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pendientes)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec![
        "Consecutivo",
        "Estado",
        "Asegurado",
        "Regional",
        "Prima USD",
        "Año",
        "Mes",
    ]);
    for c in &pendientes {
        table.add_row(vec![
            c.consecutivo.clone(),
            c.estado.clone(),
            c.asegurado.clone(),
            c.regional.clone(),
            output::format_usd(c.prima),
            c.anio.to_string(),
            c.mes.to_string(),
        ]);
    }
    println!("{}", table);
    println!();
    println!("{} pending consecutivos", pendientes.len());

    Ok(())
}
