use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to load configuration: {0}")]
    ConfigError(String),

    #[error("Invalid LINE signature: {0}")]
    SignatureError(String),

    #[error("Failed to parse LINE webhook: {0}")]
    ParseError(String),

    #[error("Failed to encode task payload: {0}")]
    EncodeError(String),

    #[error("Failed to decode task payload: {0}")]
    DecodeError(String),

    #[error("Failed to build LINE client: {0}")]
    ClientError(String),

    #[error("Failed to access LINE API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to enqueue task: {0}")]
    QueueError(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::ParseError(error.to_string())
    }
}

impl From<base64::DecodeError> for RelayError {
    fn from(error: base64::DecodeError) -> Self {
        RelayError::DecodeError(format!("base64: {error}"))
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<SdkError<E, R>> for RelayError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        RelayError::QueueError(DisplayErrorContext(&error).to_string())
    }
}
