//! Error handling for the Climate Advisor platform
//!
//! Provides consistent error responses in English and Spanish. Client-input
//! failures map to 400, upstream and model failures map to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::DomainError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Upstream errors
    #[error("Weather conditions unavailable: {0}")]
    ConditionsUnavailable(String),

    #[error("Forecast model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Rendering failed: {0}")]
    Rendering(String),

    // Internal errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidRegion(_)
                | AppError::InvalidRange(_)
                | AppError::MissingField(_)
                | AppError::InvalidRequest(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRegion(_) => "INVALID_REGION",
            AppError::InvalidRange(_) => "INVALID_RANGE",
            AppError::MissingField(_) => "MISSING_FIELD",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::ConditionsUnavailable(_) => "CONDITIONS_UNAVAILABLE",
            AppError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AppError::Prediction(_) => "PREDICTION_ERROR",
            AppError::Rendering(_) => "RENDERING_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn detail(&self) -> ErrorDetail {
        let (message_en, message_es, field) = match self {
            AppError::InvalidRegion(region) => (
                format!("Unknown region: {}", region),
                format!("Departamento no válido: {}", region),
                Some("region".to_string()),
            ),
            AppError::InvalidRange(msg) => (
                format!("Invalid time range: {}", msg),
                format!("Rango de tiempo no válido: {}", msg),
                None,
            ),
            AppError::MissingField(field) => (
                format!("Missing required field: {}", field),
                format!("Falta el campo {}", field),
                Some(field.clone()),
            ),
            AppError::InvalidRequest(msg) => (
                format!("Invalid request body: {}", msg),
                format!("Solicitud no válida: {}", msg),
                None,
            ),
            AppError::ConditionsUnavailable(_) => (
                "Failed to fetch current weather conditions".to_string(),
                "Error al obtener datos del clima".to_string(),
                None,
            ),
            AppError::ModelUnavailable(reason) => (
                format!("Forecast model is not loaded: {}", reason),
                format!("Error al cargar el modelo: {}", reason),
                None,
            ),
            AppError::Prediction(msg) => (
                format!("Forecast model invocation failed: {}", msg),
                format!("Error en la predicción: {}", msg),
                None,
            ),
            AppError::Rendering(_) => (
                "Failed to render forecast artifacts".to_string(),
                "Error al generar los gráficos".to_string(),
                None,
            ),
            AppError::Configuration(msg) => (
                format!("Configuration error: {}", msg),
                format!("Error de configuración: {}", msg),
                None,
            ),
            AppError::Internal(_) => (
                "An internal server error occurred".to_string(),
                "Hubo un error en el servidor".to_string(),
                None,
            ),
        };

        ErrorDetail {
            code: self.code().to_string(),
            message_en,
            message_es,
            field,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidRegion(region) => AppError::InvalidRegion(region),
            DomainError::InvalidRange(msg) => AppError::InvalidRange(msg),
            DomainError::MissingField(field) => AppError::MissingField(field.to_string()),
            other @ DomainError::SeriesLengthMismatch { .. } => AppError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidRange(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log the error for debugging
        if self.is_client_error() {
            tracing::warn!("Rejected request: {:?}", self);
        } else {
            tracing::error!("Error: {:?}", self);
        }

        (status, Json(ErrorResponse { error: self.detail() })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        for err in [
            AppError::InvalidRegion("Lima".to_string()),
            AppError::InvalidRange("span".to_string()),
            AppError::MissingField("year".to_string()),
            AppError::InvalidRequest("bad json".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn test_upstream_errors_are_server_errors() {
        for err in [
            AppError::ConditionsUnavailable("timeout".to_string()),
            AppError::ModelUnavailable("missing file".to_string()),
            AppError::Prediction("nan".to_string()),
            AppError::Rendering("svg".to_string()),
            AppError::Internal("boom".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{err}");
        }
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: AppError = DomainError::MissingField("start_month").into();
        assert!(matches!(err, AppError::MissingField(ref f) if f == "start_month"));

        let err: AppError = DomainError::SeriesLengthMismatch {
            expected: 8,
            actual: 1,
        }
        .into();
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_detail_names_field() {
        let detail = AppError::MissingField("year".to_string()).detail();
        assert_eq!(detail.code, "MISSING_FIELD");
        assert_eq!(detail.field.as_deref(), Some("year"));
        assert_eq!(detail.message_es, "Falta el campo year");
    }
}
