//! linecho - a LINE bot that echoes text messages back to the sender.
//!
//! This crate implements a two-stage relay:
//! 1. An API Lambda that verifies LINE webhook deliveries and defers each event as a task
//! 2. A task processor that decodes a deferred event and replies through the LINE API
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - SQS for task queuing between the stages
//! - reqwest for LINE Messaging API calls
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use linecho::core::config::AppConfig;
//! use linecho::worker::{TaskOutcome, process_task};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     linecho::setup_logging();
//!
//!     let config = AppConfig {
//!         channel_secret: "dummy_secret".to_string(),
//!         channel_token: "dummy_token".to_string(),
//!         task_queue_url: None,
//!         line_api_base_url: "https://api.line.me".to_string(),
//!     };
//!
//!     // `data` is the form field a deferred task carries
//!     let outcome = process_task(&config, Some("eyJ0eXBlIjoibWVzc2FnZSJ9")).await;
//!     if outcome == TaskOutcome::Replied {
//!         println!("Reply sent");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod core;
pub mod errors;
pub mod line;
pub mod queue;
pub mod worker;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Verbosity follows `RUST_LOG` and defaults to `info`. Calling it again after
/// a subscriber is installed does nothing.
///
/// # Example
///
/// ```
/// linecho::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
