//! Lenient numeric coercion for duck-typed backend payloads.
//!
//! The upstream API encodes numbers inconsistently: JSON numbers, numeric
//! strings, missing fields, or garbage. Every coercion goes through
//! [`Parsed`], which keeps the resolved value together with a flag saying
//! whether the fallback had to be applied, so malformed upstream data stays
//! distinguishable from a legitimate zero.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub fallback_applied: bool,
}

impl<T> Parsed<T> {
    pub fn exact(value: T) -> Self {
        Self {
            value,
            fallback_applied: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            fallback_applied: true,
        }
    }
}

/// Coerce a JSON value to `i64`, truncating float input the way the
/// original data entry tools did.
pub fn parse_i64(raw: Option<&Value>, fallback: i64) -> Parsed<i64> {
    match raw {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_i64() {
                Parsed::exact(v)
            } else if let Some(v) = n.as_f64() {
                Parsed::exact(v.trunc() as i64)
            } else {
                Parsed::fallback(fallback)
            }
        }
        Some(Value::String(s)) => parse_i64_str(s, fallback),
        _ => Parsed::fallback(fallback),
    }
}

/// Coerce a JSON value to `f64`.
pub fn parse_f64(raw: Option<&Value>, fallback: f64) -> Parsed<f64> {
    match raw {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => Parsed::exact(v),
            None => Parsed::fallback(fallback),
        },
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) => Parsed::exact(v),
            Err(_) => Parsed::fallback(fallback),
        },
        _ => Parsed::fallback(fallback),
    }
}

/// Coerce a user-entered string to `i64` (empty input is a fallback).
pub fn parse_i64_str(s: &str, fallback: i64) -> Parsed<i64> {
    let trimmed = s.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Parsed::exact(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Parsed::exact(v.trunc() as i64);
    }
    Parsed::fallback(fallback)
}

/// Coerce a user-entered string to `f64` (empty input is a fallback).
pub fn parse_f64_str(s: &str, fallback: f64) -> Parsed<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) => Parsed::exact(v),
        Err(_) => Parsed::fallback(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_and_string_inputs_parse_exactly() {
        assert_eq!(parse_i64(Some(&json!(42)), 0), Parsed::exact(42));
        assert_eq!(parse_i64(Some(&json!("42")), 0), Parsed::exact(42));
        assert_eq!(parse_i64(Some(&json!(12.9)), 0), Parsed::exact(12));
        assert_eq!(parse_f64(Some(&json!("3.5")), 0.0), Parsed::exact(3.5));
    }

    #[test]
    fn malformed_input_is_flagged_not_silently_zeroed() {
        let missing = parse_i64(None, 0);
        assert_eq!(missing.value, 0);
        assert!(missing.fallback_applied);

        let garbage = parse_f64(Some(&json!("n/a")), 0.0);
        assert_eq!(garbage.value, 0.0);
        assert!(garbage.fallback_applied);

        // A real zero is not a fallback.
        let zero = parse_i64(Some(&json!(0)), 7);
        assert_eq!(zero.value, 0);
        assert!(!zero.fallback_applied);
    }

    #[test]
    fn draft_strings_truncate_like_the_entry_controls() {
        assert_eq!(parse_i64_str("  120 ", 0), Parsed::exact(120));
        assert_eq!(parse_i64_str("120.9", 0), Parsed::exact(120));
        assert_eq!(parse_i64_str("", 0), Parsed::fallback(0));
        assert_eq!(parse_f64_str("12.25", 1.0), Parsed::exact(12.25));
        assert_eq!(parse_f64_str("abc", 1.0), Parsed::fallback(1.0));
    }
}
