//! Ingestion service - one-pass normalization of the raw report table
//!
//! Reads the source once, reconciles headers, normalizes every cell and
//! partitions rows into the three output collections. One malformed cell
//! never aborts the batch: field-level failures degrade to safe defaults and
//! are counted. Only a missing source or a header row without an
//! expedition-date column is fatal.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{CacheSnapshot, ConsecutivoPendiente, NegocioNuevo, Registro};
use crate::normalize::{mes_to_int, parse_currency, parse_fecha};
use crate::ports::{CellValue, ReportSource};
use crate::regional::{classify, RegionalMap};
use crate::schema::{Campo, HeaderMap};

/// Trimmed cell text with the export's junk spellings of "empty"
/// ("nan", "none") treated as absent.
fn clean_text(cell: Option<&CellValue>) -> String {
    let text = cell.map(CellValue::as_text).unwrap_or_default();
    match text.to_lowercase().as_str() {
        "nan" | "none" => String::new(),
        _ => text,
    }
}

/// Robust year parse for the explicit report column: "2025", "2025.0" and
/// numeric cells all resolve; anything else is 0 (unknown).
fn parse_anio(cell: Option<&CellValue>) -> i32 {
    let text = clean_text(cell);
    if text.is_empty() {
        return 0;
    }
    text.parse::<f64>().map(|v| v as i32).unwrap_or(0)
}

pub struct IngestService {
    source: Arc<dyn ReportSource>,
}

impl IngestService {
    pub fn new(source: Arc<dyn ReportSource>) -> Self {
        Self { source }
    }

    /// Transform the full raw table into a cache snapshot in one pass.
    ///
    /// No persistence here — owning the snapshot lifecycle is the cache
    /// manager's job.
    pub fn build_snapshot(&self, regional_map: &RegionalMap) -> Result<CacheSnapshot> {
        let table = self.source.read_table()?;
        info!(
            source = self.source.name(),
            rows = table.rows.len(),
            "ingesting report table"
        );

        let headers = HeaderMap::resolve(&table.headers);
        if !headers.has(Campo::FechaExpedicion) {
            return Err(Error::schema_incomplete(
                "no header reconciled to the expedition-date field",
            ));
        }
        debug!(mapped = headers.mapped_count(), "headers reconciled");

        let mut todos: Vec<Registro> = Vec::with_capacity(table.rows.len());
        let mut negocios_nuevos: Vec<NegocioNuevo> = Vec::new();
        let mut consecutivos: Vec<ConsecutivoPendiente> = Vec::new();
        let mut descartados = 0usize;
        let mut degradados = 0usize;

        for row in &table.rows {
            let consecutivo = clean_text(headers.cell(Campo::Consecutivo, row));
            let asegurado = clean_text(headers.cell(Campo::Asegurado, row));
            let poliza = clean_text(headers.cell(Campo::Poliza, row));

            // No identity signal at all: filler/noise, never persisted
            if consecutivo.is_empty() && asegurado.is_empty() && poliza.is_empty() {
                descartados += 1;
                continue;
            }

            let fecha = headers
                .cell(Campo::FechaExpedicion, row)
                .and_then(parse_fecha);

            let mes = headers
                .cell(Campo::Mes, row)
                .map(|c| mes_to_int(&c.as_text()))
                .unwrap_or(0);
            let anio = parse_anio(headers.cell(Campo::Anio, row));

            let prima_total = parse_currency(
                headers
                    .cell(Campo::PrimaTotalUsd, row)
                    .unwrap_or(&CellValue::Empty),
            );
            let prima_sin_iva = parse_currency(
                headers
                    .cell(Campo::PrimaSinIvaUsd, row)
                    .unwrap_or(&CellValue::Empty),
            );
            degradados += prima_total.is_degraded() as usize;
            degradados += prima_sin_iva.is_degraded() as usize;

            let localidad = clean_text(headers.cell(Campo::Localidad, row));
            let regional = classify(&localidad, regional_map);

            let registro = Registro {
                estado: clean_text(headers.cell(Campo::Estado, row)),
                poliza,
                regional,
                localidad,
                corredor: clean_text(headers.cell(Campo::Corredor, row)),
                asegurado,
                consecutivo,
                producto: clean_text(headers.cell(Campo::Producto, row)),
                prima_total_usd: prima_total.value(),
                prima_sin_iva_usd: prima_sin_iva.value(),
                anio,
                mes,
                fecha_expedicion: fecha.as_ref().map(|(_, _, iso)| iso.clone()),
            };

            // Route by expedition year: resolved and plausible means new
            // business, everything else stays a pending consecutivo
            match &fecha {
                Some((year, month, iso)) if *year > 2000 => {
                    negocios_nuevos.push(registro.to_negocio(*year, *month, iso.clone()));
                }
                _ => {
                    consecutivos.push(registro.to_consecutivo());
                }
            }

            todos.push(registro);
        }

        info!(
            total = todos.len(),
            negocios = negocios_nuevos.len(),
            consecutivos = consecutivos.len(),
            descartados,
            degradados,
            "snapshot built"
        );

        Ok(CacheSnapshot::new(
            todos,
            negocios_nuevos,
            consecutivos,
            descartados,
            degradados,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockReportSource;

    const HEADERS: &[&str] = &[
        "ESTADO",
        "POLIZA EMITIDA",
        "LOCALIDAD",
        "CLAVE",
        "ASEGURADO",
        "CONSECUTIVO",
        "PRODUCTO",
        "PRIMA TOTAL EN DOLARES",
        "PRIMA SIN IVA EN DOLARES",
        "AÑO",
        "MES",
        "FECHA EXPEDICION NEGOCIO",
    ];

    fn service(rows: &[&[&str]]) -> (Arc<MockReportSource>, IngestService) {
        let source = Arc::new(MockReportSource::from_rows(HEADERS, rows));
        let ingest = IngestService::new(source.clone());
        (source, ingest)
    }

    #[test]
    fn test_partition_by_expedition_year() {
        let (_, ingest) = service(&[
            &["EMITIDA", "P1", "BOGOTA", "C1", "ACME", "1001", "SALUD", "US$ 100", "90", "2025", "MAR", "14/03/2025"],
            &["PENDIENTE", "P2", "CALI", "C2", "GLOBEX", "1002", "SALUD", "200", "180", "2025", "ABR", ""],
        ]);

        let snap = ingest.build_snapshot(&RegionalMap::default()).unwrap();
        assert_eq!(snap.total_registros, 2);
        assert_eq!(snap.negocios_nuevos_count, 1);
        assert_eq!(snap.consecutivos_count, 1);

        let negocio = &snap.negocios_nuevos[0];
        assert_eq!(negocio.anio, 2025);
        assert_eq!(negocio.mes, 3);
        assert_eq!(negocio.fecha_expedicion, "2025-03-14T00:00:00");
        assert_eq!(negocio.prima_total_usd, 100.0);

        let pendiente = &snap.consecutivos[0];
        assert_eq!(pendiente.anio, 2025);
        assert_eq!(pendiente.mes, 4); // from the explicit MES column
        assert_eq!(pendiente.prima, 200.0);
    }

    #[test]
    fn test_noise_rows_are_discarded_and_counted() {
        let (_, ingest) = service(&[
            &["EMITIDA", "P1", "BOGOTA", "C1", "ACME", "1001", "SALUD", "100", "90", "2025", "3", "14/03/2025"],
            &["", "", "BOGOTA", "", "", "", "", "50", "40", "2025", "3", ""],
            &["", "nan", "CALI", "", "none", "NaN", "", "", "", "", "", ""],
        ]);

        let snap = ingest.build_snapshot(&RegionalMap::default()).unwrap();
        assert_eq!(snap.total_registros, 1);
        assert_eq!(snap.descartados, 2);
        // output + discarded == input
        assert_eq!(snap.total_registros + snap.descartados, 3);
        assert!(snap.negocios_nuevos.len() + snap.consecutivos.len() == snap.total_registros);
    }

    #[test]
    fn test_single_identity_signal_keeps_row() {
        let (_, ingest) = service(&[
            &["", "", "", "", "", "1001", "", "", "", "", "", ""],
        ]);
        let snap = ingest.build_snapshot(&RegionalMap::default()).unwrap();
        assert_eq!(snap.total_registros, 1);
        assert_eq!(snap.descartados, 0);
    }

    #[test]
    fn test_malformed_cells_degrade_without_dropping_row() {
        let (_, ingest) = service(&[
            &["EMITIDA", "P1", "BOGOTA", "C1", "ACME", "1001", "SALUD", "basura", "2024-01-01 10:00:00", "no-year", "99", "31/02/2025"],
        ]);

        let snap = ingest.build_snapshot(&RegionalMap::default()).unwrap();
        assert_eq!(snap.total_registros, 1);

        let r = &snap.todos[0];
        assert_eq!(r.prima_total_usd, 0.0);
        assert_eq!(r.prima_sin_iva_usd, 0.0);
        assert_eq!(r.anio, 0);
        assert_eq!(r.mes, 0);
        assert_eq!(r.fecha_expedicion, None);
        assert_eq!(snap.campos_degradados, 2);
        // unresolvable date routes to pending
        assert_eq!(snap.consecutivos_count, 1);
    }

    #[test]
    fn test_regional_classification_applied() {
        let map = RegionalMap::from_pairs([("OFICINA LUNA", "GERENCIA")]);
        let (_, ingest) = service(&[
            &["E", "P1", "OFICINA LUNA", "C", "ACME", "1", "S", "10", "9", "2025", "1", "01/01/2025"],
            &["E", "P2", "CORREDORES CALI", "C", "GLOBEX", "2", "S", "10", "9", "2025", "1", "01/01/2025"],
        ]);

        let snap = ingest.build_snapshot(&map).unwrap();
        assert_eq!(snap.todos[0].regional, "GERENCIA");
        assert_eq!(snap.todos[1].regional, "CORREDORES CALI");
    }

    #[test]
    fn test_missing_expedition_header_is_fatal() {
        let source = Arc::new(MockReportSource::from_rows(
            &["ESTADO", "POLIZA", "ASEGURADO"],
            &[&["E", "P", "A"]],
        ));
        let err = IngestService::new(source)
            .build_snapshot(&RegionalMap::default())
            .unwrap_err();
        assert!(matches!(err, Error::SchemaIncomplete(_)));
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        let (source, ingest) = service(&[]);
        source.set_fail_read(true);
        let err = ingest.build_snapshot(&RegionalMap::default()).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }
}
