//! Currency normalization
//!
//! The report's monetary columns mix plain numbers with every spelling of
//! "US dollars" the branches have ever typed, US and European separator
//! conventions, and the occasional date pasted into the wrong column. This
//! parser accepts all of it and degrades to 0.0 instead of failing.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{DegradeReason, Parsed};
use crate::ports::CellValue;

/// Currency-marker spellings seen in real exports. Dollar-sign variants run
/// before the bare "USD"/"US " forms so "USD$" never leaves a stray "$".
const CURRENCY_MARKERS: &[&str] = &[
    "US$", "USD$", "UDS$", "USAD$", "UAD$", "ISD$", "USS$", "USD&", "USD%", "US%", "US4", "US5",
    "US3", "$US", "-US$", "SD$", "USD", "US ",
];

/// Parse a monetary cell into a non-negative amount.
///
/// Never fails: empty and unparseable inputs yield 0.0. Degradations are
/// reported through the [`Parsed`] wrapper so ingestion can count them.
pub fn parse_currency(value: &CellValue) -> Parsed<f64> {
    match value {
        CellValue::Empty => Parsed::Ok(0.0),
        CellValue::Number(n) => {
            if *n < 0.0 {
                Parsed::Degraded(0.0, DegradeReason::NegativeAmount)
            } else {
                Parsed::Ok(*n)
            }
        }
        CellValue::DateTime(_) => Parsed::Degraded(0.0, DegradeReason::DateLikeValue),
        CellValue::Bool(_) => Parsed::Degraded(0.0, DegradeReason::Unparseable),
        CellValue::Text(s) => parse_currency_text(s),
    }
}

fn parse_currency_text(raw: &str) -> Parsed<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Parsed::Ok(0.0);
    }

    let mut s = trimmed.to_uppercase();

    // A date that landed in a currency column: YYYY-MM-DD HH:MM:SS shape
    if s.contains('-') && s.contains(':') && s.len() > 10 {
        return Parsed::Degraded(0.0, DegradeReason::DateLikeValue);
    }

    for marker in CURRENCY_MARKERS {
        s = s.replace(marker, "");
    }
    s = s.replace('$', "").replace(' ', "").replace('\t', "");

    // A lone dash is the report's way of writing "nothing"
    if s.is_empty() || s == "-" {
        return Parsed::Ok(0.0);
    }

    // Separator disambiguation:
    // both ',' and '.'  -> the right-most one is the decimal mark
    // only ','          -> decimal when 1-2 digits follow the last comma,
    //                      thousands separator otherwise
    // only '.'          -> already the decimal convention
    if s.contains(',') && s.contains('.') {
        let last_comma = s.rfind(',').unwrap();
        let last_dot = s.rfind('.').unwrap();
        if last_comma > last_dot {
            // 1.234,56
            s = s.replace('.', "").replace(',', ".");
        } else {
            // 1,234.56
            s = s.replace(',', "");
        }
    } else if s.contains(',') {
        let after = &s[s.rfind(',').unwrap() + 1..];
        if (1..=2).contains(&after.len()) {
            // 12,34
            s = s.replace(',', ".");
        } else {
            // 1,234
            s = s.replace(',', "");
        }
    }

    if s.ends_with('.') {
        s.pop();
    }

    if let Ok(dec) = Decimal::from_str(&s) {
        let v = dec.to_f64().unwrap_or(0.0);
        return if v < 0.0 {
            Parsed::Degraded(0.0, DegradeReason::NegativeAmount)
        } else {
            Parsed::Ok(v)
        };
    }

    // Last resort: pull the first numeric substring out of the raw cell
    let num_re = Regex::new(r"[-+]?\d*\.\d+|\d+").unwrap();
    if let Some(m) = num_re.find(trimmed) {
        if let Ok(v) = m.as_str().parse::<f64>() {
            let v = if v < 0.0 { 0.0 } else { v };
            return Parsed::Degraded(v, DegradeReason::FallbackExtraction);
        }
    }

    Parsed::Degraded(0.0, DegradeReason::Unparseable)
}
