//! Response builders for the API Gateway proxy integration.

use serde_json::{Value, json};

/// Returns a 200 OK response with an empty JSON body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "body": "{}" })
}

/// Returns a bare response carrying only a status code.
#[must_use]
pub fn status_only(status_code: u16) -> Value {
    json!({ "statusCode": status_code, "body": "" })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}

/// Status code of a response built by this module.
#[must_use]
pub fn status_code(response: &Value) -> Option<u16> {
    response
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
}
