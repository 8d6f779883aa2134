//! Cell value to display text.
//!
//! Float columns honour the grid precision: `p` decimal places for
//! magnitudes of at least 1, `p` significant digits (`%g`) below 1, and the
//! shortest round-trip form when `p` is 0. Every other value renders its
//! plain string form. Missing values and NaN render empty.

use std::borrow::Cow;

use crate::types::{CellValue, ColumnType};

/// Display text of `value` in a column of type `dtype`.
pub fn format_cell(value: &CellValue, dtype: ColumnType, precision: u8) -> Cow<'_, str> {
    match value {
        CellValue::Missing => Cow::Borrowed(""),
        CellValue::Text(s) => Cow::Borrowed(s.as_str()),
        CellValue::Bool(true) => Cow::Borrowed("true"),
        CellValue::Bool(false) => Cow::Borrowed("false"),
        CellValue::Int(i) => Cow::Owned(i.to_string()),
        CellValue::Float(f) if dtype == ColumnType::Float => Cow::Owned(format_float(*f, precision)),
        CellValue::Float(f) => Cow::Owned(format_float(*f, 0)),
    }
}

/// Format a float with the grid precision rules.
pub fn format_float(x: f64, precision: u8) -> String {
    if x.is_nan() {
        return String::new();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if precision == 0 {
        return x.to_string();
    }
    let p = usize::from(precision);
    if x.abs() >= 1.0 {
        format!("{x:.p$}")
    } else {
        format_general(x, p)
    }
}

/// C `%.{p}g`: `p` significant digits, trailing zeros removed, scientific
/// notation when the exponent is below -4 or at least `p`.
fn format_general(x: f64, p: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let p = p.max(1);
    // Rounding to p digits may bump the exponent (0.0999 -> 0.1), so read it back
    let sci = format!("{x:.prec$e}", prec = p - 1);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i64 = exp.parse().unwrap_or(0);
    let p_signed = i64::try_from(p).unwrap_or(i64::MAX);

    if exp < -4 || exp >= p_signed {
        let mantissa = strip_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    } else {
        let decimals = usize::try_from(p_signed - 1 - exp).unwrap_or(0);
        strip_zeros(&format!("{x:.decimals$}")).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(5.12345, 2, "5.12" ; "fixed above one")]
    #[test_case(-12.5, 3, "-12.500" ; "negative fixed")]
    #[test_case(1.0, 1, "1.0" ; "exactly one is fixed")]
    #[test_case(0.000123456, 3, "0.000123" ; "small keeps significant digits")]
    #[test_case(0.5, 2, "0.5" ; "trailing zeros stripped")]
    #[test_case(0.0000123, 2, "1.2e-05" ; "tiny uses exponent")]
    #[test_case(-0.26, 1, "-0.3" ; "negative below one")]
    #[test_case(0.09996, 3, "0.1" ; "rounding bumps exponent")]
    #[test_case(0.0, 3, "0" ; "zero")]
    #[test_case(0.1, 0, "0.1" ; "precision zero shortest")]
    #[test_case(1234.5678, 0, "1234.5678" ; "precision zero large")]
    fn test_format_float(x: f64, precision: u8, expected: &str) {
        assert_eq!(format_float(x, precision), expected);
    }

    #[test]
    fn test_nan_and_missing_render_empty() {
        assert_eq!(format_cell(&CellValue::Float(f64::NAN), ColumnType::Float, 3), "");
        assert_eq!(format_cell(&CellValue::Missing, ColumnType::Int, 0), "");
    }

    #[test]
    fn test_non_float_columns_ignore_precision() {
        assert_eq!(format_cell(&CellValue::Int(42), ColumnType::Int, 3), "42");
        assert_eq!(format_cell(&CellValue::Bool(true), ColumnType::Bool, 3), "true");
        assert_eq!(
            format_cell(&CellValue::Text("a b".into()), ColumnType::Text, 3),
            "a b"
        );
    }
}
