//! Header reconciliation
//!
//! Every export run of the report arrives with slightly different column
//! headers: duplicated columns, encoding-damaged accents ("AÑO" as "AO"),
//! near-miss variants ("ASEGURADO DIRECCION" next to "ASEGURADO"). This
//! module maps that mess onto the fixed canonical field set.
//!
//! Matching is an ordered rule table evaluated in a fixed priority order
//! (expedition date first, identifiers next, monetary and auxiliary fields
//! last). Each canonical target is claimed by at most one raw header and
//! each raw header binds at most one target, so a generic header can never
//! displace a more specific one. Same input always yields the same output.

use std::collections::{HashMap, HashSet};

use crate::ports::CellValue;

/// Canonical fields of the business report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Campo {
    FechaExpedicion,
    Consecutivo,
    Localidad,
    Asegurado,
    Producto,
    Poliza,
    PrimaTotalUsd,
    PrimaSinIvaUsd,
    Estado,
    Corredor,
    Anio,
    Mes,
}

struct HeaderRule {
    target: Campo,
    matches: fn(&str) -> bool,
}

fn is_fecha_expedicion(h: &str) -> bool {
    h.contains("EXPEDI") && h.contains("NEGOCIO")
}

fn is_consecutivo(h: &str) -> bool {
    h == "CONSECUTIVO"
}

fn is_localidad(h: &str) -> bool {
    h == "LOCALIDAD" || h == "SUCURSAL"
}

fn is_asegurado_exacto(h: &str) -> bool {
    h == "ASEGURADO"
}

fn is_asegurado_prefijo(h: &str) -> bool {
    h.starts_with("ASEGURADO")
}

fn is_poliza_emitida(h: &str) -> bool {
    (h.contains("POLIZA") || h.contains("PÓLIZA")) && h.contains("EMITIDA")
}

fn is_numero_poliza(h: &str) -> bool {
    (h.contains("NUMERO") || h.contains("NÚMERO")) && (h.contains("POLIZA") || h.contains("PÓLIZA"))
}

fn is_poliza_exacta(h: &str) -> bool {
    h == "POLIZA" || h == "PÓLIZA"
}

fn is_producto(h: &str) -> bool {
    h.contains("PRODUCTO")
}

fn is_prima_total(h: &str) -> bool {
    h.contains("PRIMA") && h.contains("TOTAL") && h.contains("DOLARES")
}

fn is_prima_sin_iva(h: &str) -> bool {
    h.contains("PRIMA") && h.contains("SIN IVA") && h.contains("DOLARES")
}

fn is_estado(h: &str) -> bool {
    h == "ESTADO"
}

fn is_corredor(h: &str) -> bool {
    h.contains("CLAVE")
}

fn is_anio(h: &str) -> bool {
    matches!(h, "AÑO" | "ANO" | "AO" | "AÑO." | "# AÑO" | "G AÑO" | "G ANO")
}

fn is_mes(h: &str) -> bool {
    matches!(h, "MES" | "MES." | "# MES" | "F MES")
}

/// Priority-ordered rule table. The expedition date outranks everything,
/// exact identifier headers outrank their prefix fallbacks, monetary and
/// auxiliary fields come last.
static RULES: &[HeaderRule] = &[
    HeaderRule { target: Campo::FechaExpedicion, matches: is_fecha_expedicion },
    HeaderRule { target: Campo::Consecutivo, matches: is_consecutivo },
    HeaderRule { target: Campo::Localidad, matches: is_localidad },
    HeaderRule { target: Campo::Asegurado, matches: is_asegurado_exacto },
    HeaderRule { target: Campo::Asegurado, matches: is_asegurado_prefijo },
    HeaderRule { target: Campo::Poliza, matches: is_poliza_emitida },
    HeaderRule { target: Campo::Poliza, matches: is_numero_poliza },
    HeaderRule { target: Campo::Poliza, matches: is_poliza_exacta },
    HeaderRule { target: Campo::Producto, matches: is_producto },
    HeaderRule { target: Campo::PrimaTotalUsd, matches: is_prima_total },
    HeaderRule { target: Campo::PrimaSinIvaUsd, matches: is_prima_sin_iva },
    HeaderRule { target: Campo::Estado, matches: is_estado },
    HeaderRule { target: Campo::Corredor, matches: is_corredor },
    HeaderRule { target: Campo::Anio, matches: is_anio },
    HeaderRule { target: Campo::Mes, matches: is_mes },
];

/// Resolved mapping from canonical field to source column index.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    index: HashMap<Campo, usize>,
}

impl HeaderMap {
    /// Reconcile raw headers against the canonical rule table.
    ///
    /// Exact-duplicate headers are removed first, keeping the first
    /// occurrence, so a repeated column can never shadow the data that was
    /// read under it originally.
    pub fn resolve(headers: &[String]) -> Self {
        let mut seen = HashSet::new();
        let mut candidates: Vec<(usize, String)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let upper = header.trim().to_uppercase();
            if seen.insert(upper.clone()) {
                candidates.push((idx, upper));
            }
        }

        let mut index: HashMap<Campo, usize> = HashMap::new();
        let mut bound: HashSet<usize> = HashSet::new();

        for rule in RULES {
            if index.contains_key(&rule.target) {
                continue;
            }
            for (idx, upper) in &candidates {
                if bound.contains(idx) {
                    continue;
                }
                if (rule.matches)(upper) {
                    index.insert(rule.target, *idx);
                    bound.insert(*idx);
                    break;
                }
            }
        }

        Self { index }
    }

    /// Column index for a canonical field, if any header claimed it.
    pub fn column(&self, campo: Campo) -> Option<usize> {
        self.index.get(&campo).copied()
    }

    pub fn has(&self, campo: Campo) -> bool {
        self.index.contains_key(&campo)
    }

    /// The cell for a canonical field within one row.
    pub fn cell<'a>(&self, campo: Campo, row: &'a [CellValue]) -> Option<&'a CellValue> {
        self.column(campo).and_then(|idx| row.get(idx))
    }

    /// Number of canonical fields that found a header.
    pub fn mapped_count(&self) -> usize {
        self.index.len()
    }
}
