//! Normalized business record domain models
//!
//! Field names follow the operations report vocabulary. Serialized keys
//! reproduce the report's column casing exactly (uppercase for the main
//! collections, capitalized for the pending-consecutivo projection) so the
//! cached JSON stays byte-compatible with what downstream consumers expect.

use serde::{Deserialize, Serialize};

/// The universal normalized form of one source row ("todos" collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registro {
    #[serde(rename = "ESTADO")]
    pub estado: String,
    #[serde(rename = "POLIZA")]
    pub poliza: String,
    /// Organizational group derived by the regional classifier
    #[serde(rename = "REGIONAL")]
    pub regional: String,
    /// Raw location string, preserved as imported
    #[serde(rename = "LOCALIDAD")]
    pub localidad: String,
    #[serde(rename = "CORREDOR")]
    pub corredor: String,
    #[serde(rename = "ASEGURADO")]
    pub asegurado: String,
    #[serde(rename = "CONSECUTIVO")]
    pub consecutivo: String,
    #[serde(rename = "PRODUCTO")]
    pub producto: String,
    #[serde(rename = "PRIMA_TOTAL_USD")]
    pub prima_total_usd: f64,
    #[serde(rename = "PRIMA_SIN_IVA_USD")]
    pub prima_sin_iva_usd: f64,
    /// Year from the explicit report column, 0 when unknown
    #[serde(rename = "AÑO")]
    pub anio: i32,
    /// Month 1-12 from the explicit report column, 0 when unknown
    #[serde(rename = "MES")]
    pub mes: u32,
    /// ISO-8601 expedition date, None when it could not be resolved
    #[serde(rename = "FECHA_EXPEDICION")]
    pub fecha_expedicion: Option<String>,
}

impl Registro {
    /// Whether the row carries at least one identity signal.
    ///
    /// Rows with no consecutivo, no insured name and no policy number are
    /// filler/noise in the export and are never persisted.
    pub fn has_identity(&self) -> bool {
        !(self.consecutivo.is_empty() && self.asegurado.is_empty() && self.poliza.is_empty())
    }

    /// Project into a new-business record for a resolved expedition date.
    pub fn to_negocio(&self, anio: i32, mes: u32, fecha_iso: String) -> NegocioNuevo {
        NegocioNuevo {
            estado: self.estado.clone(),
            poliza: self.poliza.clone(),
            regional: self.regional.clone(),
            localidad: self.localidad.clone(),
            corredor: self.corredor.clone(),
            asegurado: self.asegurado.clone(),
            producto: self.producto.clone(),
            prima_total_usd: self.prima_total_usd,
            prima_sin_iva_usd: self.prima_sin_iva_usd,
            fecha_expedicion: fecha_iso,
            anio,
            mes,
            consecutivo: self.consecutivo.clone(),
        }
    }

    /// Project into the pending-consecutivo record used by status tracking.
    ///
    /// Year and month come from the explicit report columns, not from the
    /// (unresolved) expedition date.
    pub fn to_consecutivo(&self) -> ConsecutivoPendiente {
        ConsecutivoPendiente {
            estado: self.estado.clone(),
            poliza: self.poliza.clone(),
            regional: self.regional.clone(),
            localidad: self.localidad.clone(),
            corredor: self.corredor.clone(),
            asegurado: self.asegurado.clone(),
            consecutivo: self.consecutivo.clone(),
            producto: self.producto.clone(),
            prima: self.prima_total_usd,
            anio: self.anio,
            mes: self.mes,
        }
    }
}

/// A record whose expedition date resolved to a valid year (> 2000).
///
/// Same data as [`Registro`], reordered for the new-business report; `anio`
/// and `mes` here come from the expedition date itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegocioNuevo {
    #[serde(rename = "ESTADO")]
    pub estado: String,
    #[serde(rename = "POLIZA")]
    pub poliza: String,
    #[serde(rename = "REGIONAL")]
    pub regional: String,
    #[serde(rename = "LOCALIDAD")]
    pub localidad: String,
    #[serde(rename = "CORREDOR")]
    pub corredor: String,
    #[serde(rename = "ASEGURADO")]
    pub asegurado: String,
    #[serde(rename = "PRODUCTO")]
    pub producto: String,
    #[serde(rename = "PRIMA_TOTAL_USD")]
    pub prima_total_usd: f64,
    #[serde(rename = "PRIMA_SIN_IVA_USD")]
    pub prima_sin_iva_usd: f64,
    #[serde(rename = "FECHA_EXPEDICION")]
    pub fecha_expedicion: String,
    #[serde(rename = "AÑO")]
    pub anio: i32,
    #[serde(rename = "MES")]
    pub mes: u32,
    #[serde(rename = "CONSECUTIVO")]
    pub consecutivo: String,
}

/// Lighter projection for rows without a resolvable expedition date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsecutivoPendiente {
    #[serde(rename = "Estado")]
    pub estado: String,
    #[serde(rename = "Poliza")]
    pub poliza: String,
    #[serde(rename = "Regional")]
    pub regional: String,
    #[serde(rename = "Localidad")]
    pub localidad: String,
    #[serde(rename = "Corredor")]
    pub corredor: String,
    #[serde(rename = "Asegurado")]
    pub asegurado: String,
    #[serde(rename = "Consecutivo")]
    pub consecutivo: String,
    #[serde(rename = "Producto")]
    pub producto: String,
    #[serde(rename = "Prima")]
    pub prima: f64,
    #[serde(rename = "AÑO")]
    pub anio: i32,
    #[serde(rename = "MES")]
    pub mes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registro {
        Registro {
            estado: "EMITIDA".to_string(),
            poliza: "POL-123".to_string(),
            regional: "CENTRO".to_string(),
            localidad: "IBAGUE".to_string(),
            corredor: "C045".to_string(),
            asegurado: "ACME SAS".to_string(),
            consecutivo: "88421".to_string(),
            producto: "SALUD INTERNACIONAL".to_string(),
            prima_total_usd: 1200.5,
            prima_sin_iva_usd: 1008.82,
            anio: 2025,
            mes: 3,
            fecha_expedicion: Some("2025-03-14T00:00:00".to_string()),
        }
    }

    #[test]
    fn test_has_identity() {
        let mut r = sample();
        assert!(r.has_identity());

        r.consecutivo.clear();
        r.asegurado.clear();
        assert!(r.has_identity()); // poliza still present

        r.poliza.clear();
        assert!(!r.has_identity());
    }

    #[test]
    fn test_serialized_keys_match_report_columns() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("PRIMA_TOTAL_USD").is_some());
        assert!(json.get("AÑO").is_some());
        assert!(json.get("FECHA_EXPEDICION").is_some());
        assert!(json.get("prima_total_usd").is_none());
    }

    #[test]
    fn test_consecutivo_projection_uses_explicit_columns() {
        let mut r = sample();
        r.fecha_expedicion = None;
        let c = r.to_consecutivo();
        assert_eq!(c.anio, 2025);
        assert_eq!(c.mes, 3);
        assert_eq!(c.prima, 1200.5);

        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("Prima").is_some());
        assert!(json.get("Consecutivo").is_some());
    }

    #[test]
    fn test_negocio_projection_uses_expedition_date() {
        let r = sample();
        let n = r.to_negocio(2025, 3, "2025-03-14T00:00:00".to_string());
        assert_eq!(n.anio, 2025);
        assert_eq!(n.mes, 3);
        assert_eq!(n.fecha_expedicion, "2025-03-14T00:00:00");
    }
}
