//! Climate Advisor Platform - Backend
//!
//! Regional temperature projections, synthetic heat-map samples and crop
//! recommendations for the highland departments of Peru.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::{ArtifactRenderer, ConditionsProvider, ModelHandle, SvgArtifactRenderer};
use services::{ConditionsService, ForecastService, ForecastSettings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub forecast: Arc<ForecastService>,
}

impl AppState {
    /// Wire the forecast pipeline from configuration and its collaborators
    pub fn new(
        config: Config,
        provider: Arc<dyn ConditionsProvider>,
        model: ModelHandle,
    ) -> Self {
        let conditions = ConditionsService::new(provider, config.conditions.cache_ttl_secs);
        let renderer: Option<Arc<dyn ArtifactRenderer>> = if config.rendering.enabled {
            Some(Arc::new(SvgArtifactRenderer::default()))
        } else {
            None
        };
        let settings = ForecastSettings::from_config(&config);

        Self {
            config: Arc::new(config),
            forecast: Arc::new(ForecastService::new(model, conditions, renderer, settings)),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Climate Advisor API v1.0"
}
