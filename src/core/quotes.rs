//! Parsing of live quote responses into conversion rates

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::currency::{ConversionRate, CurrencyPair};

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("quote {0} not found in response")]
    KeyNotFound(String),
    #[error("quotes list is only valid when empty and both currencies match")]
    UnexpectedShape,
    #[error("invalid quote response: {0}")]
    Invalid(String),
    #[error("API error {code}: {info}")]
    Api { code: i64, info: String },
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    success: bool,
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    info: String,
}

/// Extracts the rate for `pair` from the body of a live quote response.
///
/// `quotes` is normally an object keyed by `<source><target>`. The endpoint
/// answers with an empty list when source and target are the same currency,
/// which is read as the identity rate.
pub fn parse_rate(body: &str, pair: &CurrencyPair) -> Result<ConversionRate, ParseError> {
    debug!(body, "Parsing quote response");
    let document: Value =
        serde_json::from_str(body).map_err(|e| ParseError::Invalid(e.to_string()))?;

    if let Ok(ApiErrorEnvelope {
        success: false,
        error: Some(detail),
    }) = ApiErrorEnvelope::deserialize(&document)
    {
        warn!(code = detail.code, info = %detail.info, "Quote API reported an error");
        return Err(ParseError::Api {
            code: detail.code,
            info: detail.info,
        });
    }

    let key = pair.quote_key();
    debug!(key = %key, "Looking up quote");
    match document.get("quotes") {
        Some(Value::Object(quotes)) => {
            let value = quotes
                .get(&key)
                .ok_or_else(|| ParseError::KeyNotFound(key.clone()))?;
            value
                .as_f64()
                .and_then(ConversionRate::new)
                .ok_or_else(|| ParseError::Invalid(format!("quote {key} is not a rate: {value}")))
        }
        Some(Value::Array(quotes)) if quotes.is_empty() && pair.is_identity() => {
            Ok(ConversionRate::IDENTITY)
        }
        Some(Value::Array(_)) => Err(ParseError::UnexpectedShape),
        Some(other) => Err(ParseError::Invalid(format!(
            "unexpected type for quotes: {other}"
        ))),
        None => Err(ParseError::Invalid("missing quotes".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;

    fn pair(source: &str, target: &str) -> CurrencyPair {
        CurrencyPair::new(
            CurrencyCode::selected(source).unwrap(),
            CurrencyCode::selected(target).unwrap(),
        )
    }

    #[test]
    fn test_keyed_quote() {
        let body = r#"{"success":true,"source":"USD","quotes":{"USDEUR":0.92,"USDGBP":0.79}}"#;
        let rate = parse_rate(body, &pair("USD", "EUR")).unwrap();
        assert_eq!(rate.value(), 0.92);
    }

    #[test]
    fn test_missing_key() {
        let result = parse_rate(r#"{"quotes":{}}"#, &pair("USD", "EUR"));
        assert_eq!(result, Err(ParseError::KeyNotFound("USDEUR".to_string())));
    }

    #[test]
    fn test_empty_list_for_same_currency_is_identity() {
        let rate = parse_rate(r#"{"quotes":[]}"#, &pair("USD", "USD")).unwrap();
        assert_eq!(rate.value(), 1.0);
    }

    #[test]
    fn test_list_shapes_rejected() {
        assert_eq!(
            parse_rate(r#"{"quotes":[]}"#, &pair("USD", "EUR")),
            Err(ParseError::UnexpectedShape)
        );
        assert_eq!(
            parse_rate(r#"{"quotes":[0.92]}"#, &pair("USD", "USD")),
            Err(ParseError::UnexpectedShape)
        );
    }

    #[test]
    fn test_invalid_documents() {
        let usd_eur = pair("USD", "EUR");
        for body in [
            "not json",
            r#"{"quotes":"USDEUR"}"#,
            r#"{"quotes":0.92}"#,
            r#"{"rates":{"USDEUR":0.92}}"#,
            r#"{"quotes":{"USDEUR":"0.92"}}"#,
            r#"{"quotes":{"USDEUR":-1}}"#,
        ] {
            assert!(
                matches!(parse_rate(body, &usd_eur), Err(ParseError::Invalid(_))),
                "expected Invalid for {body}"
            );
        }
    }

    #[test]
    fn test_api_error_envelope() {
        let body = r#"{
            "success": false,
            "error": {"code": 101, "type": "invalid_access_key", "info": "You have not supplied a valid API Access Key."}
        }"#;
        let result = parse_rate(body, &pair("USD", "EUR"));
        assert_eq!(
            result,
            Err(ParseError::Api {
                code: 101,
                info: "You have not supplied a valid API Access Key.".to_string()
            })
        );
    }
}
