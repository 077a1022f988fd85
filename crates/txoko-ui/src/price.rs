//! Price extraction from JSON and display formatting.

use alloc::format;
use alloc::string::{String, ToString};
use serde_json::Value;

use crate::sources::PriceError;

/// Shown in place of the price when the fetch fails.
pub const PRICE_PLACEHOLDER: &str = "--";

/// Pull a non-negative price out of `body` at JSON pointer `pointer`.
///
/// Accepts a JSON number or a decimal string; thousands separators in
/// strings are ignored ("67,123.45").
pub fn parse_price(body: &[u8], pointer: &str) -> Result<f64, PriceError> {
    let json: Value =
        serde_json::from_slice(body).map_err(|e| PriceError::Parse(e.to_string()))?;
    let field = json
        .pointer(pointer)
        .ok_or_else(|| PriceError::MissingField(pointer.to_string()))?;

    let price = match field {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PriceError::Parse(n.to_string()))?,
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| *c != ',').collect();
            digits
                .trim()
                .parse::<f64>()
                .map_err(|_| PriceError::Parse(s.clone()))?
        }
        other => return Err(PriceError::Parse(other.to_string())),
    };

    if !price.is_finite() || price < 0.0 {
        return Err(PriceError::InvalidPrice(price));
    }
    Ok(price)
}

/// "$67,123" from 1000 up, "$0.42" below.
pub fn format_price(price: f64) -> String {
    // Non-negative, so truncating after +0.5 rounds half up.
    let cents = (price * 100.0 + 0.5) as u64;
    if cents < 100_000 {
        return format!("${}.{:02}", cents / 100, cents % 100);
    }
    let whole = (price + 0.5) as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const COINBASE: &str =
        r#"{"data":{"amount":"67123.45","base":"BTC","currency":"USD"}}"#;

    #[test]
    fn parses_coinbase_string_amount() {
        let price = parse_price(COINBASE.as_bytes(), "/data/amount").unwrap();
        assert!((price - 67123.45).abs() < 1e-9);
    }

    #[test]
    fn parses_grouped_string() {
        let body = br#"{"bpi":{"USD":{"rate":"67,123.4567","rate_float":67123.4567}}}"#;
        let price = parse_price(body, "/bpi/USD/rate").unwrap();
        assert!((price - 67123.4567).abs() < 1e-9);
    }

    #[test]
    fn parses_numeric_field() {
        let body = br#"{"bitcoin":{"usd":64000}}"#;
        assert_eq!(parse_price(body, "/bitcoin/usd").unwrap(), 64000.0);
    }

    #[test]
    fn missing_field_is_error() {
        let err = parse_price(COINBASE.as_bytes(), "/data/price").unwrap_err();
        assert_eq!(err, PriceError::MissingField("/data/price".to_string()));
    }

    #[test]
    fn malformed_body_is_error() {
        assert!(matches!(
            parse_price(b"<html>", "/data/amount"),
            Err(PriceError::Parse(_))
        ));
        assert!(matches!(
            parse_price(br#"{"data":{"amount":"n/a"}}"#, "/data/amount"),
            Err(PriceError::Parse(_))
        ));
        assert!(matches!(
            parse_price(br#"{"data":{"amount":null}}"#, "/data/amount"),
            Err(PriceError::Parse(_))
        ));
    }

    #[test]
    fn negative_price_is_error() {
        let err = parse_price(br#"{"data":{"amount":"-1"}}"#, "/data/amount").unwrap_err();
        assert_eq!(err, PriceError::InvalidPrice(-1.0));
    }

    #[test]
    fn formats_large_prices_grouped() {
        assert_eq!(format_price(67123.45), "$67,123");
        assert_eq!(format_price(1000.0), "$1,000");
        assert_eq!(format_price(1234567.8), "$1,234,568");
        assert_eq!(format_price(999_999.5), "$1,000,000");
    }

    #[test]
    fn formats_small_prices_with_cents() {
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(42.1), "$42.10");
        assert_eq!(format_price(999.994), "$999.99");
    }

    #[test]
    fn rounding_up_to_a_thousand_switches_to_grouped() {
        assert_eq!(format_price(999.996), "$1,000");
        assert_eq!(format_price(999.5), "$999.50");
    }
}
