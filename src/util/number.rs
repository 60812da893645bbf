/// Coerce a query-string value into an integer.
///
/// Absent, blank, or non-numeric input yields `fallback`. Decimal and
/// exponent forms are rounded to the nearest integer, since every consumer
/// of these values (page numbers, years) is integral.
pub fn parse_to_number(raw: Option<&str>, fallback: i64) -> i64 {
    raw.and_then(try_parse).unwrap_or(fallback)
}

/// Like [`parse_to_number`], but with an optional fallback: `None` when
/// neither the input nor the fallback provide a number.
pub fn parse_optional_number(raw: Option<&str>, fallback: Option<i64>) -> Option<i64> {
    raw.and_then(try_parse).or(fallback)
}

fn try_parse(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Some(f.round() as i64),
        _ => None,
    }
}
