//! Route definitions for the Climate Advisor platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/regions", get(handlers::list_regions))
        .route("/predict", post(handlers::predict))
}
