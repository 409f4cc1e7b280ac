//! Status command - snapshot summary and diagnostics

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::get_context;
use crate::output;

#[derive(Serialize)]
struct StatusSummary {
    source: String,
    sheet: String,
    snapshot: String,
    timestamp: String,
    total_registros: usize,
    negocios_nuevos: usize,
    consecutivos: usize,
    descartados: usize,
    campos_degradados: usize,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let snap = ctx.cache.load()?;

    let status = StatusSummary {
        source: ctx.config.source_file.display().to_string(),
        sheet: ctx.config.sheet.clone(),
        snapshot: ctx.cache.snapshot_path().display().to_string(),
        timestamp: snap.timestamp.clone(),
        total_registros: snap.total_registros,
        negocios_nuevos: snap.negocios_nuevos_count,
        consecutivos: snap.consecutivos_count,
        descartados: snap.descartados,
        campos_degradados: snap.campos_degradados,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Business Report Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Source", &status.source]);
    table.add_row(vec!["Sheet", &status.sheet]);
    table.add_row(vec!["Snapshot built", &status.timestamp]);
    table.add_row(vec!["Records", &status.total_registros.to_string()]);
    table.add_row(vec!["New business", &status.negocios_nuevos.to_string()]);
    table.add_row(vec!["Pending consecutivos", &status.consecutivos.to_string()]);
    println!("{}", table);

    if status.descartados > 0 || status.campos_degradados > 0 {
        println!();
        output::warning(&format!(
            "{} rows discarded as noise, {} cells degraded to defaults",
            status.descartados, status.campos_degradados
        ));
    }

    Ok(())
}
