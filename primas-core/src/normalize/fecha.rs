//! Expedition-date and month-token normalization
//!
//! The report writes dates in at least four conventions (DD/MM/YYYY,
//! YYYY/MM/DD, and both with dashes), sometimes with two-digit years, and
//! carries month columns as numbers, abbreviations or full Spanish names.

use chrono::{Datelike, NaiveDate};

use crate::ports::CellValue;

const MESES_CORTOS: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

const MESES_COMPLETOS: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// Parse an expedition-date cell into `(year, month, iso_string)`.
///
/// Native datetime cells short-circuit. Strings are split on `/` or `-`;
/// a 4-character first segment means year-first, otherwise day-first.
/// Two-digit years are promoted by adding 2000. Years outside 2000-2030 and
/// months outside 1-12 are rejected (None) rather than silently wrapped.
pub fn parse_fecha(value: &CellValue) -> Option<(i32, u32, String)> {
    match value {
        CellValue::Empty | CellValue::Bool(_) => None,
        CellValue::DateTime(dt) => Some((
            dt.year(),
            dt.month(),
            dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        )),
        CellValue::Number(_) => None,
        CellValue::Text(s) => parse_fecha_str(s.trim()),
    }
}

fn parse_fecha_str(s: &str) -> Option<(i32, u32, String)> {
    if s.is_empty() {
        return None;
    }

    for sep in ['/', '-'] {
        if !s.contains(sep) {
            continue;
        }
        let parts: Vec<&str> = s.split(sep).map(str::trim).collect();
        if parts.len() != 3 {
            continue;
        }

        let nums: Option<Vec<i64>> = parts.iter().map(|p| p.parse::<i64>().ok()).collect();
        let Some(nums) = nums else { continue };

        // Length-4 first segment is the year; otherwise the first is the day
        let (mut year, month, day) = if parts[0].len() == 4 {
            (nums[0], nums[1], nums[2])
        } else {
            (nums[2], nums[1], nums[0])
        };

        if year < 100 {
            year += 2000;
        }
        if !(2000..=2030).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day)
        {
            continue;
        }

        if let Some(date) = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32) {
            return Some((
                year as i32,
                month as u32,
                format!("{}T00:00:00", date.format("%Y-%m-%d")),
            ));
        }
    }

    None
}

/// Normalize a month token (`3`, `"03"`, `"MAR"`, `"MARZO"`) to 1-12,
/// returning 0 when the token is unrecognized.
pub fn mes_to_int(token: &str) -> u32 {
    let s = token.trim().to_uppercase();
    if s.is_empty() {
        return 0;
    }

    if let Ok(n) = s.parse::<f64>() {
        let n = n as i64;
        if (1..=12).contains(&n) {
            return n as u32;
        }
        return 0;
    }

    for (i, name) in MESES_CORTOS.iter().enumerate() {
        if s == *name {
            return (i + 1) as u32;
        }
    }
    for (i, name) in MESES_COMPLETOS.iter().enumerate() {
        if s == *name {
            return (i + 1) as u32;
        }
    }

    0
}

/// Short Spanish month name ("ENE".."DIC") for a 1-12 month number.
pub fn mes_corto(mes: u32) -> Option<&'static str> {
    if (1..=12).contains(&mes) {
        Some(MESES_CORTOS[(mes - 1) as usize])
    } else {
        None
    }
}

/// Full Spanish month name ("ENERO".."DICIEMBRE") for a 1-12 month number.
pub fn mes_nombre(mes: u32) -> Option<&'static str> {
    if (1..=12).contains(&mes) {
        Some(MESES_COMPLETOS[(mes - 1) as usize])
    } else {
        None
    }
}
