//! Presentation formatters for the rendering context.
//!
//! Amounts arrive either as JSON numbers or as numeric strings; anything that
//! does not parse to a finite number formats as an empty string.

use chrono::{Local, NaiveDate};
use serde_json::Value;

const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const LONG_DATE_FORMAT: &str = "%B %d, %Y";

/// Numeric value of a JSON number or numeric string.
pub fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// `1500` -> `$1,500`, `1500.5` -> `$1,500.50`.
pub fn format_currency(value: &Value) -> String {
    let amount = match numeric(value) {
        Some(amount) => amount,
        None => return String::new(),
    };

    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();

    if magnitude.fract() == 0.0 {
        return format!("${}{}", sign, group_thousands(&format!("{:.0}", magnitude)));
    }

    let fixed = format!("{:.2}", magnitude);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("${}{}.{}", sign, group_thousands(whole), cents)
}

/// `"25"` -> `25%`; fractions are truncated toward zero.
pub fn format_percent(value: &Value) -> String {
    match numeric(value) {
        Some(v) => format!("{}%", v.trunc() as i64),
        None => String::new(),
    }
}

/// `2025-03-01` -> `March 01, 2025`; invalid or missing input yields today.
pub fn format_date(value: Option<&str>) -> String {
    format_date_or(value, Local::now().date_naive())
}

pub fn format_date_or(value: Option<&str>, fallback: NaiveDate) -> String {
    value
        .and_then(|v| NaiveDate::parse_from_str(v, INPUT_DATE_FORMAT).ok())
        .unwrap_or(fallback)
        .format(LONG_DATE_FORMAT)
        .to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
