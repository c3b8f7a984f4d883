//! LINE Messaging API client
//!
//! Thin wrapper over `reqwest` bound to one channel's access token. Calls are
//! made once; redelivery is left to the task queue.

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, error};

use super::messages::{ApiErrorBody, ReplyMessageRequest, SendMessage};
use crate::core::config::AppConfig;
use crate::errors::RelayError;

const REPLY_PATH: &str = "/v2/bot/message/reply";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct LineClient {
    http: Client,
    base_url: String,
}

impl LineClient {
    /// Build a client bound to the configured channel token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the token is not a valid header value or the
    /// HTTP transport cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, RelayError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.channel_token))
            .map_err(|e| RelayError::ClientError(format!("channel token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| RelayError::ClientError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.line_api_base_url.clone(),
        })
    }

    /// Reply to the conversation turn identified by `reply_token`.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` on transport failure and `ApiError` on a non-2xx
    /// response from LINE.
    pub async fn reply_message(
        &self,
        reply_token: &str,
        messages: &[SendMessage],
    ) -> Result<(), RelayError> {
        let body = ReplyMessageRequest {
            reply_token,
            messages,
            notification_disabled: false,
        };
        let url = format!("{}{}", self.base_url, REPLY_PATH);
        debug!(url = %url, count = messages.len(), "Sending LINE reply");

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body_text = resp
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        let detail = serde_json::from_str::<ApiErrorBody>(&body_text)
            .ok()
            .and_then(|b| b.summary())
            .unwrap_or(body_text);
        error!("LINE reply failed: status={} body={}", status, detail);
        Err(RelayError::ApiError(format!("{status}: {detail}")))
    }
}
