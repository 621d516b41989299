//! HTTP handler for forecast requests

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::ForecastRequest;

use crate::error::{AppError, AppResult};
use crate::services::ForecastResponse;
use crate::AppState;

/// Produce a forecast, heat samples and crop advice for a region
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> AppResult<Json<ForecastResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    tracing::info!(
        "Forecast requested for {}",
        request.region.as_deref().unwrap_or("<missing>")
    );

    let response = state.forecast.predict(&request).await?;
    Ok(Json(response))
}
