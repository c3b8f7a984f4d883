use lambda_runtime::{Error, service_fn};
use std::sync::Arc;
use tracing::error;

use linecho::api::{ApiState, handler};
use linecho::core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Error> {
    linecho::setup_logging();

    let config = AppConfig::load().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let state = Arc::new(ApiState::from_config(config).await.map_err(|e| {
        error!("Startup error: {}", e);
        Error::from(e)
    })?);

    lambda_runtime::run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(&state, event).await }
    }))
    .await
}
