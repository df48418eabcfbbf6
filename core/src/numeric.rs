//! Lenient number handling for text typed into the panel and for values read
//! back from element attributes.

/// Keeps digits, `-` and `.`, drops everything else.
pub fn sanitize_numeric_text(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '-' || *ch == '.')
        .collect()
}

/// Parses the longest numeric prefix of `raw` (after leading whitespace).
///
/// `"12.5px"` is `12.5`, `"1.2.3"` is `1.2`, `"-"` and `""` are `None`.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok()
}

/// Like [`parse_leading_float`] but truncates toward zero.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let sign_len = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == sign_len {
        return None;
    }
    text[..end].parse::<i64>().ok()
}

/// Sanitizes panel text and parses it; anything unparseable becomes `0`.
pub fn parse_panel_text(raw: &str) -> f64 {
    parse_leading_float(&sanitize_numeric_text(raw)).unwrap_or(0.0)
}

/// Rounds half toward positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Formats a number for CSS and attribute output without a trailing `.0`
/// and without `-0`.
pub fn fmt_f64(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    format!("{}", value)
}
