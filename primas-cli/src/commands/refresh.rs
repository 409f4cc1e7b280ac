//! Refresh command - drop caches and rebuild from the source report

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    ctx.cache.invalidate();
    let snap = if force {
        ctx.cache.force_refresh()?
    } else {
        // rebuilds only when the source is newer than the persisted snapshot
        ctx.cache.load()?
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "rebuilt": ctx.cache.rebuild_count() > 0,
                "timestamp": snap.timestamp,
                "total_registros": snap.total_registros,
                "negocios_nuevos": snap.negocios_nuevos_count,
                "consecutivos": snap.consecutivos_count,
            })
        );
        return Ok(());
    }

    if ctx.cache.rebuild_count() > 0 {
        output::success("Snapshot rebuilt from source");
    } else {
        output::success("Persisted snapshot is fresh, nothing to rebuild");
    }
    println!();
    println!("  Records: {}", snap.total_registros);
    println!("  New business: {}", snap.negocios_nuevos_count);
    println!("  Pending consecutivos: {}", snap.consecutivos_count);

    Ok(())
}
