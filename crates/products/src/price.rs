//! Monetary price handling.
//!
//! Prices are exact decimals stored as `NUMERIC(10, 2)`.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use catalog_core::{DomainError, DomainResult};

/// Total significant digits a stored price may carry.
pub const PRICE_PRECISION: u32 = 10;

/// Fractional digits a stored price may carry.
pub const PRICE_SCALE: u32 = 2;

/// Characters of rejected input echoed back in an error message.
const ECHO_MAX_CHARS: usize = 32;

/// Parse a price from text.
///
/// Surrounding spaces and double quotes are stripped, so `"\"12.50\""` and
/// `" 12.50 "` both parse. Scientific notation is accepted.
pub fn parse_price(raw: &str) -> DomainResult<Decimal> {
    let trimmed = raw.trim_matches(|c| c == ' ' || c == '"');
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| DomainError::validation(format!("Invalid price [{}]: {e}", echo(raw))))
}

fn echo(raw: &str) -> String {
    match raw.char_indices().nth(ECHO_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

/// Convert a loosely-typed JSON value into a price.
///
/// Only scalars that can denote a number are accepted: JSON numbers and
/// numeric strings. Every other shape is a [`DomainError::TypeMismatch`].
pub fn price_from_value(value: &JsonValue) -> DomainResult<Decimal> {
    match value {
        JsonValue::Number(n) => parse_price(&n.to_string()),
        JsonValue::String(s) => parse_price(s),
        other => Err(DomainError::type_mismatch(format!(
            "price must be a number or numeric string, got {}",
            json_type_name(other)
        ))),
    }
}

/// Ensure a price fits the `NUMERIC(10, 2)` column.
pub fn check_price(price: Decimal) -> DomainResult<()> {
    let normalized = price.normalize();
    if normalized.scale() > PRICE_SCALE {
        return Err(DomainError::validation(format!(
            "price {price} has more than {PRICE_SCALE} decimal places"
        )));
    }
    let limit = Decimal::from(10_i64.pow(PRICE_PRECISION - PRICE_SCALE));
    if normalized.abs() >= limit {
        return Err(DomainError::validation(format!(
            "price {price} exceeds {} digits",
            PRICE_PRECISION
        )));
    }
    Ok(())
}

pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parses_quoted_and_padded_text() {
        assert_eq!(parse_price("12.50").unwrap(), dec!(12.50));
        assert_eq!(parse_price(" \"12.50\" ").unwrap(), dec!(12.5));
        assert_eq!(parse_price("1.25e1").unwrap(), dec!(12.5));
    }

    #[test]
    fn rejects_garbage_text_as_validation_error() {
        assert!(parse_price("twelve").unwrap_err().is_validation());
    }

    #[test]
    fn long_input_is_truncated_in_the_error() {
        let raw = "9".repeat(5000) + "x";
        let message = parse_price(&raw).unwrap_err().to_string();
        assert!(message.len() < 200, "{message}");
        assert!(message.contains(&format!("[{}...]", "9".repeat(32))));

        let message = parse_price("twelve").unwrap_err().to_string();
        assert!(message.starts_with("Invalid price [twelve]:"));
    }

    #[test]
    fn accepts_json_numbers_and_strings() {
        assert_eq!(price_from_value(&json!(12.5)).unwrap(), dec!(12.50));
        assert_eq!(price_from_value(&json!(3)).unwrap(), dec!(3));
        assert_eq!(price_from_value(&json!("99.99")).unwrap(), dec!(99.99));
    }

    #[test]
    fn rejects_non_scalar_values_as_type_mismatch() {
        for value in [json!([""]), json!({"price": 1}), json!(true), JsonValue::Null] {
            match price_from_value(&value) {
                Err(DomainError::TypeMismatch(_)) => {}
                other => panic!("expected TypeMismatch for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn enforces_numeric_column_bounds() {
        assert!(check_price(dec!(12.50)).is_ok());
        assert!(check_price(dec!(12.500)).is_ok());
        assert!(check_price(dec!(99999999.99)).is_ok());
        assert!(check_price(dec!(-5.25)).is_ok());
        assert!(check_price(dec!(0.125)).is_err());
        assert!(check_price(dec!(100000000)).is_err());
    }
}
