//! Report service - read-only views over the cached dataset
//!
//! Pagination, year/month filtering and the pending-consecutivo views.
//! Everything here works on the snapshot the cache manager hands out; no
//! ingestion happens in this layer.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::adapters::EstadoOverrides;
use crate::domain::{ConsecutivoPendiente, NegocioNuevo, Registro};
use crate::normalize::{mes_corto, mes_nombre, mes_to_int};
use crate::services::cache::CacheManager;

const DEFAULT_PAGE_SIZE: usize = 100;

pub struct ReportService {
    cache: Arc<CacheManager>,
    estados: EstadoOverrides,
}

impl ReportService {
    pub fn new(cache: Arc<CacheManager>, estados: EstadoOverrides) -> Self {
        Self { cache, estados }
    }

    /// One page of the full record set, most recently ingested first.
    pub fn todos_paginated(&self, page: usize, page_size: usize) -> Result<PaginaRegistros> {
        let snap = self.cache.load()?;

        let page = page.max(1);
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };

        let total = snap.todos.len();
        let total_pages = (total + page_size - 1) / page_size;
        let start = (page - 1) * page_size;

        let data: Vec<Registro> = snap
            .todos
            .iter()
            .rev()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        Ok(PaginaRegistros {
            data,
            total,
            page,
            page_size,
            total_pages,
        })
    }

    /// Years present in the new-business collection, newest first.
    pub fn negocios_years(&self) -> Result<Vec<i32>> {
        let snap = self.cache.load()?;
        let years: BTreeSet<i32> = snap.negocios_nuevos.iter().map(|n| n.anio).collect();
        Ok(years.into_iter().rev().collect())
    }

    /// Month names with new business in a given year, in calendar order.
    pub fn negocios_months(&self, year: i32) -> Result<Vec<String>> {
        let snap = self.cache.load()?;
        let months: BTreeSet<u32> = snap
            .negocios_nuevos
            .iter()
            .filter(|n| n.anio == year)
            .map(|n| n.mes)
            .collect();

        Ok(months
            .into_iter()
            .filter_map(mes_nombre)
            .map(str::to_string)
            .collect())
    }

    /// New business filtered by year and month (number or Spanish token).
    pub fn negocios_by_month(&self, year: i32, month: &str) -> Result<Vec<NegocioNuevo>> {
        let mes = mes_to_int(month);
        if mes == 0 {
            return Ok(Vec::new());
        }

        let snap = self.cache.load()?;
        Ok(snap
            .negocios_nuevos
            .iter()
            .filter(|n| n.anio == year && n.mes == mes)
            .cloned()
            .collect())
    }

    /// Pending consecutivos, optionally filtered, with manual estado
    /// overrides merged over the imported state.
    pub fn consecutivos(
        &self,
        year: Option<i32>,
        month: Option<&str>,
    ) -> Result<Vec<ConsecutivoPendiente>> {
        let snap = self.cache.load()?;

        let mes_filtro = match month {
            Some(token) => {
                let m = mes_to_int(token);
                if m == 0 {
                    return Ok(Vec::new());
                }
                Some(m)
            }
            None => None,
        };

        let overrides = self.estados.load();

        let mut result: Vec<ConsecutivoPendiente> = snap
            .consecutivos
            .iter()
            .filter(|c| year.map_or(true, |y| c.anio == y))
            .filter(|c| mes_filtro.map_or(true, |m| c.mes == m))
            .cloned()
            .collect();

        if !overrides.is_empty() {
            for c in &mut result {
                if let Some(estado) = overrides.get(c.consecutivo.trim()) {
                    c.estado = estado.clone();
                }
            }
        }

        Ok(result)
    }

    /// Distinct "MES YYYY" period labels carried by pending consecutivos,
    /// newest first. The first label doubles as the UI default.
    pub fn consecutivo_periods(&self) -> Result<Periodos> {
        let snap = self.cache.load()?;

        let pairs: BTreeSet<(i32, u32)> = snap
            .consecutivos
            .iter()
            .filter(|c| c.anio != 0 && (1..=12).contains(&c.mes))
            .map(|c| (c.anio, c.mes))
            .collect();

        let periods: Vec<String> = pairs
            .into_iter()
            .rev()
            .filter_map(|(y, m)| mes_corto(m).map(|name| format!("{} {}", name, y)))
            .collect();

        let default = periods.first().cloned();
        Ok(Periodos { periods, default })
    }
}

/// One page of records plus pagination bookkeeping
#[derive(Debug, Serialize)]
pub struct PaginaRegistros {
    pub data: Vec<Registro>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct Periodos {
    pub periods: Vec<String>,
    pub default: Option<String>,
}
