//! Value normalizers
//!
//! Pure functions that turn raw report cells into canonical monetary amounts
//! and date triples. These never fail outward: every bad input degrades to a
//! safe default. The [`Parsed`] wrapper keeps the degradation visible so the
//! pipeline can count it, while callers that only want the value use
//! [`Parsed::value`].

mod currency;
mod fecha;

pub use currency::parse_currency;
pub use fecha::{mes_corto, mes_nombre, mes_to_int, parse_fecha};

/// Why a cell degraded to its default value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    /// The value looked like a date/time, not money
    DateLikeValue,
    /// A negative amount where only non-negative primas are valid
    NegativeAmount,
    /// Recovered by extracting the first numeric substring
    FallbackExtraction,
    /// Nothing numeric could be recovered
    Unparseable,
}

/// Outcome of a tolerant parse: the value is always usable, but a degraded
/// parse records why the original cell was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Ok(T),
    Degraded(T, DegradeReason),
}

impl<T: Copy> Parsed<T> {
    /// The contained value, degraded or not.
    pub fn value(&self) -> T {
        match self {
            Parsed::Ok(v) => *v,
            Parsed::Degraded(v, _) => *v,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Parsed::Degraded(..))
    }
}
