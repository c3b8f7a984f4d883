use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::RelayError;

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Request path from an HTTP API (v2) or REST API (v1) proxy event.
pub fn request_path(payload: &Value) -> Option<&str> {
    payload
        .get("rawPath")
        .and_then(|v| v.as_str())
        .or_else(|| payload.get("path").and_then(|v| v.as_str()))
}

/// Request method from an HTTP API (v2) or REST API (v1) proxy event.
pub fn request_method(payload: &Value) -> Option<&str> {
    payload
        .get("requestContext")
        .and_then(|c| c.get("http"))
        .and_then(|h| h.get("method"))
        .and_then(|m| m.as_str())
        .or_else(|| payload.get("httpMethod").and_then(|m| m.as_str()))
}

/// Request body as text, decoding it first when API Gateway base64-wrapped it.
///
/// # Errors
///
/// Returns `ParseError` if the body is missing, not a string, or not UTF-8,
/// and `DecodeError` if a body flagged as encoded is not base64.
pub fn extract_body(payload: &Value) -> Result<String, RelayError> {
    let body = payload
        .get("body")
        .ok_or_else(|| RelayError::ParseError("Missing body".to_string()))?
        .as_str()
        .ok_or_else(|| RelayError::ParseError("Invalid body format".to_string()))?;

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !encoded {
        return Ok(body.to_string());
    }

    let bytes = STANDARD.decode(body)?;
    String::from_utf8(bytes)
        .map_err(|e| RelayError::ParseError(format!("body is not UTF-8: {e}")))
}
