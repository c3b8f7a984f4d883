//! API Lambda handler - thin router that delegates to the route handlers.
//!
//! This module handles:
//! - Request validation (method, body)
//! - Webhook deliveries (delegated to `callback` module)
//! - Deferred tasks (delegated to `task` module)

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use super::state::ApiState;
use super::{callback, helpers, parsing, task};

pub use self::function_handler as handler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Callback,
    Task,
}

fn route_for(path: &str) -> Option<Route> {
    if path.ends_with("/callback") {
        Some(Route::Callback)
    } else if path.ends_with("/task") {
        Some(Route::Task)
    } else {
        None
    }
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails for a well-formed invocation; problems with the request are
/// reported through the returned status code.
#[tracing::instrument(level = "info", skip(state, event))]
pub async fn function_handler(state: &ApiState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let payload = &event.payload;
    let path = parsing::request_path(payload).unwrap_or_default();

    let Some(route) = route_for(path) else {
        info!(raw_path = %path, "No route");
        return Ok(helpers::err_response(404, "Not found"));
    };

    match parsing::request_method(payload) {
        Some(method) if method.eq_ignore_ascii_case("POST") => {}
        method => {
            info!(method = ?method, "Method not allowed");
            return Ok(helpers::err_response(405, "Method not allowed"));
        }
    }

    let body = match parsing::extract_body(payload) {
        Ok(body) => body,
        Err(e) => {
            error!("Request body error: {}", e);
            return Ok(helpers::err_response(400, &e.to_string()));
        }
    };

    let response = match route {
        Route::Callback => {
            let empty = json!({});
            let headers = payload.get("headers").unwrap_or(&empty);
            callback::handle_callback(state, headers, &body).await
        }
        Route::Task => task::handle_task(&state.config, &body).await,
    };

    Ok(response)
}
