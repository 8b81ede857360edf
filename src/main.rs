use std::sync::Arc;

use anyhow::{Context, Result};
use skycast_app::WeatherController;
use skycast_auth::Session;
use skycast_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _) = Config::load_validated().context("Failed to load configuration")?;
    tracing::info!("SkyCast started, default city {}", config.weather.default_city);

    // Sessions live in memory only, so every launch starts signed out.
    let session = Arc::new(Session::new());
    let controller = WeatherController::from_config(&config, session)?;

    if let Err(e) = controller.start().await {
        tracing::warn!("Startup refresh failed: {}", e);
    }

    let state = controller.presentation();
    let rendered =
        serde_json::to_string_pretty(&state).context("Failed to render presentation state")?;
    tracing::info!("Presentation state:\n{}", rendered);

    Ok(())
}
