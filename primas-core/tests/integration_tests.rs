//! Integration tests for primas-core
//!
//! These run the whole pipeline through `PrimasContext` against a real CSV
//! source and a real snapshot file on disk. Only the source data itself is
//! synthetic.

use std::path::Path;

use tempfile::TempDir;

use primas_core::PrimasContext;

// ============================================================================
// Test Helpers
// ============================================================================

const CSV_HEADER: &str = "ESTADO,POLIZA EMITIDA,LOCALIDAD,CLAVE,ASEGURADO,CONSECUTIVO,PRODUCTO,PRIMA TOTAL EN DOLARES,PRIMA SIN IVA EN DOLARES,AÑO,MES,FECHA EXPEDICION NEGOCIO";

/// Write the source CSV and a settings.json pointing at it
fn write_report(dir: &Path, rows: &[&str]) {
    let mut content = String::from(CSV_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    std::fs::write(dir.join("reporte.csv"), content).expect("write report csv");

    std::fs::write(
        dir.join("settings.json"),
        r#"{"source": {"file": "reporte.csv"}}"#,
    )
    .expect("write settings");
}

fn sample_rows() -> Vec<&'static str> {
    vec![
        // new business: valid expedition dates, mixed currency conventions
        r#"EMITIDA,POL-1,AGENCIAS MULTIPLES,C1,ACME SAS,1001,SALUD,"US$ 1.200,50","1.000,00",2025,3,14/03/2025"#,
        r#"EMITIDA,POL-2,SUCURSAL IBAGUE,C2,GLOBEX,1002,SALUD,"USD 800.25",700,2025,3,2025-03-20"#,
        // pending: no expedition date, explicit year/month kept
        r#"PENDIENTE,POL-3,CALI SUR,C3,INITECH,1003,SALUD,500,450,2025,ABR,"#,
        // noise row: no identity signals at all
        r#",,BOGOTA,,,,,,,2025,3,"#,
        // degraded cells: garbage money, impossible date
        r#"EN PROCESO,POL-5,MEDELLIN PLAZA,C5,HOOLI,1005,SALUD,basura,na,2024,12,31/02/2025"#,
    ]
}

// ============================================================================
// Full Pipeline
// ============================================================================

#[test]
fn test_full_pipeline_counts_and_partitions() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    let ctx = PrimasContext::new(dir.path()).unwrap();
    let snap = ctx.cache.load().unwrap();

    // 5 input rows, 1 noise row discarded
    assert_eq!(snap.total_registros, 4);
    assert_eq!(snap.descartados, 1);
    assert_eq!(snap.negocios_nuevos_count, 2);
    assert_eq!(snap.consecutivos_count, 2);
    assert_eq!(
        snap.negocios_nuevos_count + snap.consecutivos_count,
        snap.total_registros
    );

    // currency conventions both normalize
    let negocio1 = snap
        .negocios_nuevos
        .iter()
        .find(|n| n.poliza == "POL-1")
        .unwrap();
    assert_eq!(negocio1.prima_total_usd, 1200.50);
    assert_eq!(negocio1.prima_sin_iva_usd, 1000.0);
    assert_eq!(negocio1.fecha_expedicion, "2025-03-14T00:00:00");
    assert_eq!(negocio1.regional, "SAM");

    let negocio2 = snap
        .negocios_nuevos
        .iter()
        .find(|n| n.poliza == "POL-2")
        .unwrap();
    assert_eq!(negocio2.prima_total_usd, 800.25);
    assert_eq!(negocio2.regional, "CENTRO");

    // degraded row stays, with defaults
    let degradado = snap.todos.iter().find(|r| r.poliza == "POL-5").unwrap();
    assert_eq!(degradado.prima_total_usd, 0.0);
    assert_eq!(degradado.fecha_expedicion, None);
    assert!(snap.campos_degradados >= 2);

    // snapshot persisted next to the settings
    assert!(dir.path().join("snapshot.json").exists());
}

#[test]
fn test_query_layer_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    let ctx = PrimasContext::new(dir.path()).unwrap();

    let pagina = ctx.report_service.todos_paginated(1, 2).unwrap();
    assert_eq!(pagina.total, 4);
    assert_eq!(pagina.total_pages, 2);
    // most recently ingested row first
    assert_eq!(pagina.data[0].poliza, "POL-5");

    assert_eq!(ctx.report_service.negocios_years().unwrap(), vec![2025]);
    assert_eq!(
        ctx.report_service.negocios_months(2025).unwrap(),
        vec!["MARZO".to_string()]
    );
    assert_eq!(
        ctx.report_service.negocios_by_month(2025, "MAR").unwrap().len(),
        2
    );

    let pendientes = ctx.report_service.consecutivos(Some(2025), None).unwrap();
    assert_eq!(pendientes.len(), 1);
    assert_eq!(pendientes[0].consecutivo, "1003");
}

#[test]
fn test_forecast_end_to_end_with_metas() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("forecast_metas.json"),
        r#"{"MAR 25": {"SAM": 2400.0, "CENTRO": 800.25}}"#,
    )
    .unwrap();

    let ctx = PrimasContext::new(dir.path()).unwrap();
    let report = ctx.forecast_service.rollup(2025, "MAR").unwrap();

    let sam = report.fila("SAM").unwrap();
    assert_eq!(sam.real, 1200.50);
    assert!((sam.cumplimiento - 0.5002083333).abs() < 1e-6);
    assert_eq!(sam.faltante, 2400.0 - 1200.50);

    let centro = report.fila("CENTRO").unwrap();
    assert_eq!(centro.real, 800.25);
    assert!((centro.cumplimiento - 1.0).abs() < 1e-9);

    assert_eq!(report.total_gerencia.real, 1200.50 + 800.25);

    assert_eq!(
        ctx.forecast_service.available_months().unwrap(),
        vec!["ABR 25", "MAR 25", "DIC 24"]
    );
}

// ============================================================================
// Snapshot Lifecycle
// ============================================================================

#[test]
fn test_second_context_reads_persisted_snapshot() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    let first = PrimasContext::new(dir.path()).unwrap();
    let built = first.cache.load().unwrap();
    drop(first);

    // fresh process: same data must come back from disk, same build stamp
    let second = PrimasContext::new(dir.path()).unwrap();
    let reloaded = second.cache.load().unwrap();
    assert_eq!(reloaded.timestamp, built.timestamp);
    assert_eq!(reloaded.total_registros, built.total_registros);
    assert_eq!(second.cache.rebuild_count(), 0);
}

#[test]
fn test_external_source_update_triggers_rebuild() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    let ctx = PrimasContext::new(dir.path()).unwrap();
    let before = ctx.cache.load().unwrap();
    assert_eq!(before.total_registros, 4);

    // external sync rewrites the source with one more row
    std::thread::sleep(std::time::Duration::from_millis(20));
    let mut rows = sample_rows();
    rows.push(r#"EMITIDA,POL-6,BARRANQUILLA,C6,UMBRELLA,1006,SALUD,300,270,2025,5,05/05/2025"#);
    write_report(dir.path(), &rows);

    // memory snapshot still serves the old build until invalidated
    assert_eq!(ctx.cache.load().unwrap().total_registros, 4);

    ctx.cache.invalidate();
    let after = ctx.cache.load().unwrap();
    assert_eq!(after.total_registros, 5);
    assert_eq!(ctx.cache.rebuild_count(), 2);
}

#[test]
fn test_force_refresh_rebuilds_fresh_snapshot() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    let ctx = PrimasContext::new(dir.path()).unwrap();
    ctx.cache.load().unwrap();
    ctx.cache.force_refresh().unwrap();
    assert_eq!(ctx.cache.rebuild_count(), 2);
}

#[test]
fn test_missing_source_fails_build_but_disk_survives() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), &sample_rows());

    let ctx = PrimasContext::new(dir.path()).unwrap();
    ctx.cache.load().unwrap();

    std::fs::remove_file(dir.path().join("reporte.csv")).unwrap();

    // forced rebuild fails, previous snapshot remains usable
    assert!(ctx.cache.force_refresh().is_err());
    assert!(ctx.cache.load().is_ok());

    ctx.cache.invalidate();
    // with the source gone, the disk snapshot still serves
    let snap = ctx.cache.load().unwrap();
    assert_eq!(snap.total_registros, 4);
}

// ============================================================================
// Override Tables
// ============================================================================

#[test]
fn test_regional_overrides_apply_on_next_rebuild() {
    let dir = TempDir::new().unwrap();
    write_report(
        dir.path(),
        &[r#"EMITIDA,POL-1,OFICINA LUNA,C1,ACME,1001,SALUD,100,90,2025,3,14/03/2025"#],
    );

    let ctx = PrimasContext::new(dir.path()).unwrap();
    let snap = ctx.cache.load().unwrap();
    assert_eq!(snap.todos[0].regional, "OTRA");

    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("regional_mapping.json"),
        r#"{"OFICINA LUNA": "GERENCIA"}"#,
    )
    .unwrap();

    // the table is re-read per rebuild, not per query
    assert_eq!(ctx.cache.load().unwrap().todos[0].regional, "OTRA");
    let rebuilt = ctx.cache.force_refresh().unwrap();
    assert_eq!(rebuilt.todos[0].regional, "GERENCIA");
}

#[test]
fn test_estado_overrides_merge_without_rebuild() {
    let dir = TempDir::new().unwrap();
    write_report(
        dir.path(),
        &[r#"PENDIENTE,POL-1,CALI,C1,ACME,1001,SALUD,100,90,2025,3,"#],
    );

    let ctx = PrimasContext::new(dir.path()).unwrap();
    let before = ctx.report_service.consecutivos(None, None).unwrap();
    assert_eq!(before[0].estado, "PENDIENTE");

    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("consecutivos_estados.json"),
        r#"{"1001": "EMITIDA"}"#,
    )
    .unwrap();

    let after = ctx.report_service.consecutivos(None, None).unwrap();
    assert_eq!(after[0].estado, "EMITIDA");
    // no rebuild happened for the merge
    assert_eq!(ctx.cache.rebuild_count(), 1);
}
