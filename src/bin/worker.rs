// Lambda entry point for the SQS-triggered task worker

use lambda_runtime::{Error, service_fn};
use std::sync::Arc;
use tracing::error;

use linecho::core::config::AppConfig;
use linecho::worker::handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    linecho::setup_logging();

    let config = Arc::new(AppConfig::load().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?);

    lambda_runtime::run(service_fn(move |event| {
        let config = Arc::clone(&config);
        async move { handler(&config, event).await }
    }))
    .await
}
