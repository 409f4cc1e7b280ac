//! Forecast service - realized premium against targets
//!
//! Rolls the cached premium totals up by regional, joins them against the
//! commercial team's monthly targets and lays the result out in the fixed
//! three-group supervisory taxonomy. The group membership table is business
//! structure, not derived data: synonyms (a regional spelled two ways) roll
//! into the same bucket.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::adapters::MetasStore;
use crate::normalize::{mes_corto, mes_to_int};
use crate::services::cache::CacheManager;

struct FilaDef {
    nombre: &'static str,
    claves: &'static [&'static str],
}

struct GrupoDef {
    supervisor: &'static str,
    filas: &'static [FilaDef],
}

/// The supervisory taxonomy. Row order and synonym sets are fixed business
/// structure and must match the commercial team's sheet exactly.
static GRUPOS: &[GrupoDef] = &[
    GrupoDef {
        supervisor: "LUZ ADRIANA ARCHILA",
        filas: &[
            FilaDef { nombre: "SAM", claves: &["SAM"] },
            FilaDef { nombre: "CORREDORES CALI", claves: &["CORREDORES CALI"] },
            FilaDef { nombre: "CORREDORES BARRANQUILLA", claves: &["CORREDORES BARRANQUILLA"] },
            FilaDef { nombre: "CARIBE", claves: &["CARIBE"] },
            FilaDef { nombre: "OCCIDENTE", claves: &["OCCIDENTE", "SUROCCIDENTE"] },
            FilaDef { nombre: "GERENCIA", claves: &["GERENCIA"] },
        ],
    },
    GrupoDef {
        supervisor: "MAYERLY ORTIZ",
        filas: &[
            FilaDef { nombre: "CORREDORES MEDELLIN", claves: &["CORREDORES MEDELLIN"] },
            FilaDef { nombre: "BOGOTA", claves: &["BOGOTA", "BOGOTA DC", "BOGOTÁ"] },
            FilaDef { nombre: "ANTIOQUIA Y EJE CAFETERO", claves: &["ANTIOQUIA Y EJE CAFETERO"] },
        ],
    },
    GrupoDef {
        supervisor: "ELVIA PATRICIA BARRAGAN",
        filas: &[
            FilaDef { nombre: "BCM", claves: &["BCM", "OF.CORREDORES BOGOTA"] },
            FilaDef { nombre: "CORREDORES BUCARAMANGA", claves: &["CORREDORES BUCARAMANGA"] },
            FilaDef { nombre: "SEGUROS ESPECIALES", claves: &["SES", "SEGUROS ESPECIALES"] },
            FilaDef { nombre: "CENTRO", claves: &["CENTRO"] },
        ],
    },
];

pub struct ForecastService {
    cache: Arc<CacheManager>,
    metas: MetasStore,
}

impl ForecastService {
    pub fn new(cache: Arc<CacheManager>, metas: MetasStore) -> Self {
        Self { cache, metas }
    }

    /// Compute the forecast rollup for one period.
    ///
    /// `year` accepts two-digit values (promoted by adding 2000); `month`
    /// accepts numbers or Spanish tokens.
    pub fn rollup(&self, year: i32, month: &str) -> Result<ForecastReport> {
        let mes = mes_to_int(month);
        if mes == 0 {
            bail!("unrecognized month: {}", month);
        }
        let anio = if year < 100 { year + 2000 } else { year };

        let snap = self.cache.load()?;

        // realized premium per regional for the requested period
        let mut por_regional: HashMap<String, f64> = HashMap::new();
        for r in &snap.todos {
            if r.anio == anio && r.mes == mes {
                *por_regional.entry(r.regional.trim().to_uppercase()).or_default() +=
                    r.prima_total_usd;
            }
        }

        // targets file keys look like "MAR 25"
        let periodo = format!(
            "{} {:02}",
            mes_corto(mes).unwrap_or("DIC"),
            anio.rem_euclid(100)
        );
        let metas = self.metas.targets_for(&periodo);

        let mut grupos = Vec::with_capacity(GRUPOS.len());
        let mut gran_meta = 0.0;
        let mut gran_real = 0.0;

        for def in GRUPOS {
            let mut filas = Vec::with_capacity(def.filas.len());
            let mut total_meta = 0.0;
            let mut total_real = 0.0;

            for fila in def.filas {
                let real: f64 = fila
                    .claves
                    .iter()
                    .map(|k| por_regional.get(*k).copied().unwrap_or(0.0))
                    .sum();
                let meta = metas.get(fila.nombre).copied().unwrap_or(0.0);

                filas.push(ForecastRow::calculada(fila.nombre, meta, real));
                total_meta += meta;
                total_real += real;
            }

            gran_meta += total_meta;
            gran_real += total_real;

            grupos.push(ForecastGroup {
                supervisor: def.supervisor.to_string(),
                total: ForecastRow::calculada(
                    &format!("Total {}", def.supervisor),
                    total_meta,
                    total_real,
                ),
                filas,
            });
        }

        Ok(ForecastReport {
            periodo,
            anio,
            mes,
            grupos,
            total_gerencia: ForecastRow::calculada("TOTAL GERENCIA", gran_meta, gran_real),
        })
    }

    /// Period labels ("MES YY") with data, newest first.
    pub fn available_months(&self) -> Result<Vec<String>> {
        let snap = self.cache.load()?;

        let pairs: BTreeSet<(i32, u32)> = snap
            .todos
            .iter()
            .filter(|r| (2000..=2030).contains(&r.anio) && (1..=12).contains(&r.mes))
            .map(|r| (r.anio, r.mes))
            .collect();

        Ok(pairs
            .into_iter()
            .rev()
            .filter_map(|(y, m)| {
                mes_corto(m).map(|name| format!("{} {:02}", name, y.rem_euclid(100)))
            })
            .collect())
    }
}

/// One taxonomy row: realized premium against its target
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRow {
    pub nombre: String,
    pub meta: f64,
    pub real: f64,
    /// real / meta, 0 when no target is set
    pub cumplimiento: f64,
    pub forecast: f64,
    pub forecast_pct: f64,
    /// max(0, meta - forecast)
    pub faltante: f64,
}

impl ForecastRow {
    fn calculada(nombre: &str, meta: f64, real: f64) -> Self {
        let forecast = real;
        let cumplimiento = if meta > 0.0 { real / meta } else { 0.0 };
        let forecast_pct = if meta > 0.0 { forecast / meta } else { 0.0 };
        let faltante = (meta - forecast).max(0.0);
        Self {
            nombre: nombre.to_string(),
            meta,
            real,
            cumplimiento,
            forecast,
            forecast_pct,
            faltante,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ForecastGroup {
    pub supervisor: String,
    pub filas: Vec<ForecastRow>,
    pub total: ForecastRow,
}

#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub periodo: String,
    pub anio: i32,
    pub mes: u32,
    pub grupos: Vec<ForecastGroup>,
    pub total_gerencia: ForecastRow,
}

impl ForecastReport {
    /// Row lookup across all groups (tests, table rendering)
    pub fn fila(&self, nombre: &str) -> Option<&ForecastRow> {
        self.grupos
            .iter()
            .flat_map(|g| g.filas.iter())
            .find(|f| f.nombre == nombre)
    }
}
