// ABOUTME: Currency formatting, lenient numeric parsing and tenant rate arithmetic
// ABOUTME: Renders USD amounts as $1,234.56 with a configurable minimum precision
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Money helpers
//!
//! Amounts arrive from the backend as decimal strings. They are parsed to
//! `f64` only for display and client-side validation; the backend stays the
//! authority on balances and rates.

/// Precision used for wallet balances and tenant rates
pub const DEFAULT_FRACTION_DIGITS: usize = 2;

/// Precision used for model base costs
pub const BASE_COST_FRACTION_DIGITS: usize = 6;

/// Price a tenant pays for a model given the partner cost and a markup
#[must_use]
pub fn final_rate(base_rate: f64, markup_rate: f64) -> f64 {
    base_rate * (1.0 + markup_rate)
}

/// Format as USD with two fraction digits
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format_currency_with(amount, DEFAULT_FRACTION_DIGITS)
}

/// Format as USD with at least `min_fraction_digits` fraction digits
///
/// Non-finite values render as `-`.
#[must_use]
pub fn format_currency_with(amount: f64, min_fraction_digits: usize) -> String {
    if !amount.is_finite() {
        return "-".to_owned();
    }
    let digits = min_fraction_digits.max(DEFAULT_FRACTION_DIGITS);
    let fixed = format!("{:.*}", digits, amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}${}", group_thousands(int_part))
    } else {
        format!("{sign}${}.{frac_part}", group_thousands(int_part))
    }
}

/// Format a backend decimal string as USD, `-` when it does not parse
#[must_use]
pub fn format_amount_str(amount: &str, min_fraction_digits: usize) -> String {
    parse_number(amount).map_or_else(
        || "-".to_owned(),
        |value| format_currency_with(value, min_fraction_digits),
    )
}

/// Fixed-point rendering without a currency sign, e.g. model rates at 4 places
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Render a fractional markup as a whole percentage, `0.25` becomes `25%`
#[must_use]
pub fn format_percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

/// Parse the leading number of a string, ignoring trailing garbage
///
/// Returns `None` for empty input or input with no leading number, and for
/// non-finite results.
#[must_use]
pub fn parse_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer the way a form field is read, ignoring trailing garbage
#[must_use]
pub fn parse_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_rate_applies_markup() {
        let rate = final_rate(1.00, 0.2);
        assert!((rate - 1.2).abs() < f64::EPSILON);
        assert_eq!(format_currency(rate), "$1.20");
        assert_eq!(format_currency(final_rate(2.5, 0.0)), "$2.50");
    }

    #[test]
    fn test_currency_grouping_and_sign() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(f64::NAN), "-");
    }

    #[test]
    fn test_base_cost_precision() {
        assert_eq!(
            format_currency_with(0.000_125, BASE_COST_FRACTION_DIGITS),
            "$0.000125"
        );
        assert_eq!(format_amount_str("12.5", 2), "$12.50");
        assert_eq!(format_amount_str("n/a", 2), "-");
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number(" 7abc"), Some(7.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_integer("42x"), Some(42));
        assert_eq!(parse_integer("x42"), None);
    }

    #[test]
    fn test_percent_and_fixed() {
        assert_eq!(format_percent(0.25), "25%");
        assert_eq!(format_fixed(1.5, 4), "1.5000");
    }
}
