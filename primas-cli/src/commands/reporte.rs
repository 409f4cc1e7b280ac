//! Reporte command - page through the full normalized record set

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(page: usize, page_size: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let pagina = ctx.report_service.todos_paginated(page, page_size)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pagina)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec![
        "Consecutivo",
        "Estado",
        "Poliza",
        "Regional",
        "Asegurado",
        "Prima USD",
        "Expedicion",
    ]);

    for r in &pagina.data {
        table.add_row(vec![
            r.consecutivo.clone(),
            r.estado.clone(),
            r.poliza.clone(),
            r.regional.clone(),
            r.asegurado.clone(),
            output::format_usd(r.prima_total_usd),
            r.fecha_expedicion.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{}", table);
    println!();
    println!(
        "Page {} of {} ({} records)",
        pagina.page, pagina.total_pages, pagina.total
    );

    Ok(())
}
