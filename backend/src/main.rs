//! Climate Advisor Platform - Backend Server
//!
//! Serves regional temperature forecasts and crop recommendations for
//! Junín, Ayacucho, Cusco and Puno.

use std::{net::SocketAddr, sync::Arc};

use climate_advisor_backend::{
    create_app,
    external::{ModelHandle, WeatherClient},
    AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "climate_advisor_server=debug,climate_advisor_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Climate Advisor Server");
    tracing::info!("Environment: {}", config.environment);

    if config.weather.api_key.is_empty() {
        tracing::warn!("No weather API key configured; conditions lookups will fail");
    }

    // Load the forecast model; a failure is reported per request
    tracing::info!("Loading {:?} forecast model...", config.model.kind);
    let model = ModelHandle::load(&config.model);

    let weather = WeatherClient::from_config(&config.weather)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(config, Arc::new(weather), model);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
