//! Translation of function output into an HTTP response.
//!
//! The function prints one JSON object with `statusCode`, optional `headers`
//! and an optional string `body`. Anything else becomes a [`GatewayError`]
//! whose message quotes the offending text.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::gateway::{GatewayError, GatewayResponse};

const TRANSLATE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::translate");

/// Lowest and highest status codes an HTTP response line can carry.
const STATUS_RANGE: std::ops::RangeInclusive<u64> = 100..=999;

/// Shape of the document the function prints. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvocationResult {
    #[serde(default)]
    status_code: Value,
    #[serde(default)]
    headers: Value,
    #[serde(default)]
    body: Value,
}

/// Parses `raw` and builds the response it describes.
///
/// ```
/// use lambda_devd::translate::translate;
///
/// let response = translate(r#"{"statusCode":200,"headers":{"X":"Y"},"body":"hello"}"#)
///     .expect("well-formed output");
/// assert_eq!(response.status, 200);
/// assert_eq!(response.headers.get("X").map(String::as_str), Some("Y"));
/// assert_eq!(response.body, "hello");
/// ```
///
/// # Errors
///
/// Returns [`GatewayError::MalformedInvocationOutput`] when `raw` is not a
/// JSON object, [`GatewayError::InvalidBodyType`] when `body` is present but
/// not a string or null, and [`GatewayError::InvalidStatusCode`] when
/// `statusCode` is missing or not a valid HTTP status.
pub fn translate(raw: &str) -> Result<GatewayResponse, GatewayError> {
    let result = parse(raw)?;
    let body = match result.body {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => {
            return Err(GatewayError::InvalidBodyType {
                body: other.to_string(),
            });
        }
    };
    let status = status_code(&result.status_code)?;
    let headers = headers(result.headers);
    Ok(GatewayResponse::new(status, headers, body))
}

fn parse(raw: &str) -> Result<InvocationResult, GatewayError> {
    let malformed = || GatewayError::MalformedInvocationOutput {
        raw: raw.to_owned(),
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(document @ Value::Object(_)) => {
            serde_json::from_value(document).map_err(|_| malformed())
        }
        _ => Err(malformed()),
    }
}

fn status_code(value: &Value) -> Result<u16, GatewayError> {
    value
        .as_u64()
        .filter(|code| STATUS_RANGE.contains(code))
        .and_then(|code| u16::try_from(code).ok())
        .ok_or_else(|| GatewayError::InvalidStatusCode {
            value: value.to_string(),
        })
}

fn headers(value: Value) -> BTreeMap<String, String> {
    match value {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(name, value)| header_value(&name, value).map(|text| (name, text)))
            .collect(),
        Value::Null => BTreeMap::new(),
        other => {
            warn!(
                target: TRANSLATE_TARGET,
                headers = %other,
                "ignoring headers that are not a JSON object"
            );
            BTreeMap::new()
        }
    }
}

fn header_value(name: &str, value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => {
            warn!(
                target: TRANSLATE_TARGET,
                header = name,
                value = %value,
                "ignoring header with a structured value"
            );
            None
        }
    }
}
