//! Lenient parsing of numeric form input.
//!
//! Invoice rows are edited field by field, so rate and quantity often
//! arrive half typed ("12.", "", "3 hrs"). These helpers never fail: they
//! accept the longest leading numeric prefix, in the same way browser
//! number fields are read, and otherwise yield nothing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a numeric prefix of `raw`, or `None` when there is none.
///
/// Accepts an optional sign, digits with an optional fractional part and
/// an optional exponent (`1.5e3`).
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = Decimal::from_str(trimmed) {
        return Some(value);
    }

    let prefix = numeric_prefix(trimmed)?;
    let (sign, unsigned) = match prefix.strip_prefix(['+', '-']) {
        Some(rest) => (&prefix[..1], rest),
        None => ("", prefix),
    };
    let normalized = if unsigned.starts_with('.') {
        format!("{}0{}", sign, unsigned)
    } else {
        prefix.to_string()
    };

    if normalized.contains(['e', 'E']) {
        Decimal::from_scientific(&normalized).ok()
    } else {
        Decimal::from_str(&normalized).ok()
    }
}

/// Parse a monetary amount, treating anything unparsable as zero
pub fn parse_amount(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Clamp values that cannot appear on an invoice row (negatives) to zero
pub fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
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
        digits += frac_end - frac_start;
        // "12." keeps the integer part only
        end = if frac_end > frac_start { frac_end } else { end };
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}
