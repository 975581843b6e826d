//! Normalization of exported trade fields into typed values.
//!
//! NinjaTrader grid exports render money as display strings (`$1,162.50`,
//! `($42.75)`) and timestamps in US 12-hour form. Everything is normalized
//! here before a [`Trade`](super::trade::Trade) is built, so the metrics
//! calculator only ever sees plain numbers.

use chrono::NaiveDateTime;

use super::trade::Direction;

/// Timestamp layouts seen in grid exports and in `perf.json`.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Format used when timestamps are written back out.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {kind} value {value:?}")]
pub struct FieldError {
    pub kind: &'static str,
    pub value: String,
}

impl FieldError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn is_money_noise(c: char) -> bool {
    matches!(c, '$' | ',' | ' ' | '\u{a0}' | '\u{202f}')
}

/// Parse a currency display string into a signed amount.
///
/// An empty cell is zero. Parentheses denote a negative amount and may not
/// also carry a sign.
pub fn parse_money(raw: &str) -> Result<f64, FieldError> {
    let cleaned: String = raw.chars().filter(|c| !is_money_noise(*c)).collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }

    let (negative, digits) = match cleaned
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        Some(inner) if inner.starts_with(['-', '+']) => {
            return Err(FieldError::new("money", raw));
        }
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };

    let value: f64 = digits.parse().map_err(|_| FieldError::new("money", raw))?;
    if !value.is_finite() {
        return Err(FieldError::new("money", raw));
    }
    Ok(if negative { -value } else { value })
}

/// Parse a plain decimal price, tolerating thousands separators.
pub fn parse_price(raw: &str) -> Result<f64, FieldError> {
    let cleaned: String = raw.chars().filter(|c| !is_money_noise(*c)).collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError::new("price", raw)),
    }
}

pub fn parse_quantity(raw: &str) -> Result<u32, FieldError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<u32>()
        .map_err(|_| FieldError::new("quantity", raw))
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, FieldError> {
    let trimmed = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| FieldError::new("timestamp", raw))
}

pub fn parse_direction(raw: &str) -> Result<Direction, FieldError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "long" => Ok(Direction::Long),
        "short" => Ok(Direction::Short),
        _ => Err(FieldError::new("direction", raw)),
    }
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(OUTPUT_TIMESTAMP_FORMAT).to_string()
}
