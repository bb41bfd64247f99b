//! Safe numeric literals.
//!
//! Statistics cells are coerced leniently so one bad cell never aborts a load:
//! a missing cell produces no literal at all, while a cell that is present but
//! not numeric produces a zero of the target type.

use oxigraph::model::Literal;
use oxigraph::model::vocab::xsd;

/// Target numeric type of a statistics column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric {
    /// `xsd:integer`; fractional input is truncated.
    Integer,
    /// `xsd:decimal`.
    Decimal,
}

/// Cell contents treated as "no value", in addition to the empty string.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell holds no value.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NA_MARKERS.contains(&trimmed)
}

/// Coerce a raw cell into a typed literal.
///
/// Returns `None` for missing cells. Unparseable, non-finite or out-of-range
/// values fall back to a zero of the target datatype. Decimals are written in
/// canonical form (`12`, `0.45`), which is also what the store reads back, so
/// integer and decimal zeros differ only by datatype.
pub fn safe_literal(raw: &str, numeric: Numeric) -> Option<Literal> {
    if is_missing(raw) {
        return None;
    }
    let parsed = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite());

    Some(match numeric {
        Numeric::Integer => {
            let value = parsed.and_then(truncate_i64).unwrap_or(0);
            Literal::new_typed_literal(value.to_string(), xsd::INTEGER)
        }
        Numeric::Decimal => {
            // `+ 0.0` folds negative zero into zero.
            let value = parsed.unwrap_or(0.0) + 0.0;
            Literal::new_typed_literal(value.to_string(), xsd::DECIMAL)
        }
    })
}

/// Truncate toward zero, or `None` when the result does not fit an `i64`.
fn truncate_i64(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}
