//! Forecast model clients
//!
//! A model maps one feature vector to one projected temperature. The loaded
//! model is held in a [`ModelHandle`] built at start-up; a failed load leaves
//! the server running and every prediction request fails until restart.

use std::{path::Path, sync::Arc, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{FeatureVector, FEATURE_COUNT};

use crate::config::{ModelConfig, ModelKind};
use crate::error::{AppError, AppResult};

/// Pre-trained regression model
#[axum::async_trait]
pub trait ForecastModel: Send + Sync {
    /// Short identifier reported by the health endpoint
    fn name(&self) -> &str;

    /// Project a temperature (°C) for one feature vector
    async fn predict(&self, features: &FeatureVector) -> AppResult<f64>;
}

/// Outcome of loading the configured model
#[derive(Clone)]
pub enum ModelHandle {
    Ready(Arc<dyn ForecastModel>),
    Unavailable { reason: String },
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Ready(model) => f.debug_tuple("Ready").field(&model.name()).finish(),
            ModelHandle::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

impl ModelHandle {
    /// Load the model described by `config`, recording any failure
    pub fn load(config: &ModelConfig) -> Self {
        let loaded: AppResult<Arc<dyn ForecastModel>> = match config.kind {
            ModelKind::Linear => match config.path.as_deref() {
                Some(path) => {
                    LinearForecastModel::from_file(path).map(|m| Arc::new(m) as Arc<dyn ForecastModel>)
                }
                None => Err(AppError::Configuration("model.path is not set".to_string())),
            },
            ModelKind::Remote => RemoteForecastModel::from_config(config)
                .map(|m| Arc::new(m) as Arc<dyn ForecastModel>),
        };

        match loaded {
            Ok(model) => {
                tracing::info!("Forecast model loaded: {}", model.name());
                ModelHandle::Ready(model)
            }
            Err(e) => {
                tracing::error!("Forecast model failed to load: {}", e);
                ModelHandle::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ready(model: impl ForecastModel + 'static) -> Self {
        ModelHandle::Ready(Arc::new(model))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelHandle::Unavailable {
            reason: reason.into(),
        }
    }

    /// The loaded model, or `ModelUnavailable`
    pub fn model(&self) -> AppResult<&Arc<dyn ForecastModel>> {
        match self {
            ModelHandle::Ready(model) => Ok(model),
            ModelHandle::Unavailable { reason } => Err(AppError::ModelUnavailable(reason.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelHandle::Ready(_))
    }

    /// Status string for health reporting
    pub fn status(&self) -> String {
        match self {
            ModelHandle::Ready(model) => format!("ready ({})", model.name()),
            ModelHandle::Unavailable { .. } => "unavailable".to_string(),
        }
    }
}

/// Reject NaN or infinite model output
pub fn ensure_finite(value: f64) -> AppResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::Prediction(format!(
            "model returned a non-finite value: {}",
            value
        )))
    }
}

/// Linear regression over the feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearForecastModel {
    pub intercept: f64,
    pub weights: [f64; FEATURE_COUNT],
}

impl LinearForecastModel {
    pub fn new(intercept: f64, weights: [f64; FEATURE_COUNT]) -> Self {
        Self { intercept, weights }
    }

    /// Load coefficients from a JSON file: `{"intercept": .., "weights": [..5]}`
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| AppError::ModelUnavailable(format!("invalid coefficients: {}", e)))?;

        if !model.intercept.is_finite() || model.weights.iter().any(|w| !w.is_finite()) {
            return Err(AppError::ModelUnavailable(
                "coefficients must be finite".to_string(),
            ));
        }
        Ok(model)
    }

    fn evaluate(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

#[axum::async_trait]
impl ForecastModel for LinearForecastModel {
    fn name(&self) -> &str {
        "linear"
    }

    async fn predict(&self, features: &FeatureVector) -> AppResult<f64> {
        ensure_finite(self.evaluate(features))
    }
}

/// Request to the inference endpoint
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: &'a FeatureVector,
}

/// Response from the inference endpoint
#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: f64,
}

/// Client for a model served over HTTP
#[derive(Clone)]
pub struct RemoteForecastModel {
    endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

impl RemoteForecastModel {
    pub fn from_config(config: &ModelConfig) -> AppResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| AppError::Configuration("model.endpoint is not set".to_string()))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            http_client,
        })
    }
}

#[axum::async_trait]
impl ForecastModel for RemoteForecastModel {
    fn name(&self) -> &str {
        "remote"
    }

    async fn predict(&self, features: &FeatureVector) -> AppResult<f64> {
        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&PredictRequest { features });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Prediction(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Prediction(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: PredictResponse = response
            .json()
            .await
            .map_err(|e| AppError::Prediction(format!("Failed to parse response: {}", e)))?;

        ensure_finite(result.prediction)
    }
}
