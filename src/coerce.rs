//! Numeric field coercion
//!
//! Incoming field maps are untyped: multipart form fields arrive as strings,
//! JSON bodies may carry numbers, strings, or garbage. The engagement
//! metrics (`likes`, `reviews`, `stars`) are always stored as numbers, so
//! absent or unparsable input coerces to the zero value instead of failing
//! the request. That permissive default is deliberate contract behavior,
//! captured in one policy table rather than scattered ad hoc parsing.

use serde_json::Value;

/// Numeric kind a coerced field is stored as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

/// Coercion policy: field name -> stored numeric kind
///
/// Fields not listed here pass through as text, untouched.
pub const NUMERIC_POLICY: &[(&str, NumericKind)] = &[
    ("likes", NumericKind::Integer),
    ("reviews", NumericKind::Integer),
    ("stars", NumericKind::Float),
];

/// Look up the numeric kind for a field, if it is numeric-coerced
pub fn numeric_kind(field: &str) -> Option<NumericKind> {
    NUMERIC_POLICY
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, kind)| *kind)
}

/// Coerce a raw value to i64, defaulting to 0 on absence or parse failure
pub fn int_or_default(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

/// Coerce a raw value to f64, defaulting to 0.0 on absence or parse failure
pub fn float_or_default(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Text fields pass through unchanged: no trimming, no length limit
///
/// Non-string values are treated as absent rather than stringified.
pub fn text_or_none(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(int_or_default(Some(&json!(42))), 42);
        assert_eq!(int_or_default(Some(&json!("42"))), 42);
        assert_eq!(int_or_default(Some(&json!(" 7 "))), 7);
        assert_eq!(int_or_default(Some(&json!(3.9))), 3);
    }

    #[test]
    fn int_coercion_defaults_to_zero() {
        assert_eq!(int_or_default(None), 0);
        assert_eq!(int_or_default(Some(&Value::Null)), 0);
        assert_eq!(int_or_default(Some(&json!("lots"))), 0);
        assert_eq!(int_or_default(Some(&json!([1, 2]))), 0);
        assert_eq!(int_or_default(Some(&json!({"n": 1}))), 0);
    }

    #[test]
    fn float_coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(float_or_default(Some(&json!(4.5))), 4.5);
        assert_eq!(float_or_default(Some(&json!("4.5"))), 4.5);
        assert_eq!(float_or_default(Some(&json!(3))), 3.0);
    }

    #[test]
    fn float_coercion_defaults_to_zero() {
        assert_eq!(float_or_default(None), 0.0);
        assert_eq!(float_or_default(Some(&Value::Null)), 0.0);
        assert_eq!(float_or_default(Some(&json!("five"))), 0.0);
    }

    #[test]
    fn text_passes_through_unchanged() {
        assert_eq!(
            text_or_none(Some(&json!("  padded  "))),
            Some("  padded  ".to_string())
        );
        assert_eq!(text_or_none(Some(&json!(12))), None);
        assert_eq!(text_or_none(None), None);
    }

    #[test]
    fn policy_table_covers_the_metric_fields() {
        assert_eq!(numeric_kind("likes"), Some(NumericKind::Integer));
        assert_eq!(numeric_kind("reviews"), Some(NumericKind::Integer));
        assert_eq!(numeric_kind("stars"), Some(NumericKind::Float));
        assert_eq!(numeric_kind("name"), None);
    }
}
