//! Integration tests for the forecast API endpoints.
//!
//! Tests drive the router directly via `tower::ServiceExt` with in-memory
//! conditions providers and forecast models that count their invocations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use climate_advisor_backend::{
    create_app,
    error::{AppError, AppResult, ErrorResponse},
    external::{ConditionsProvider, ForecastModel, ModelHandle},
    services::ForecastResponse,
    AppState, Config,
};
use serde_json::{json, Value};
use shared::{Crop, CurrentConditions, FeatureVector, GeoPoint, Granularity, Region};
use tower::ServiceExt;

// =========================================================================
// Fakes
// =========================================================================

struct FakeProvider {
    calls: AtomicUsize,
    conditions: Option<CurrentConditions>,
}

#[axum::async_trait]
impl ConditionsProvider for FakeProvider {
    async fn current_conditions(&self, _location: GeoPoint) -> AppResult<CurrentConditions> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conditions
            .ok_or_else(|| AppError::ConditionsUnavailable("provider offline".to_string()))
    }
}

/// Returns a fixed temperature for every feature vector
struct FixedModel {
    calls: AtomicUsize,
    value: f64,
}

#[axum::async_trait]
impl ForecastModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn predict(&self, _features: &FeatureVector) -> AppResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

const CONDITIONS: CurrentConditions = CurrentConditions {
    temperature_celsius: 24.0,
    precipitation_mm: 40.0,
    humidity_percent: 60.0,
    wind_speed_mps: 2.5,
};

struct Harness {
    state: AppState,
    provider: Arc<FakeProvider>,
    model: Arc<FixedModel>,
}

fn harness(conditions: Option<CurrentConditions>, model_ready: bool) -> Harness {
    let provider = Arc::new(FakeProvider {
        calls: AtomicUsize::new(0),
        conditions,
    });
    let model = Arc::new(FixedModel {
        calls: AtomicUsize::new(0),
        value: 32.0,
    });

    let handle = if model_ready {
        ModelHandle::Ready(model.clone())
    } else {
        ModelHandle::unavailable("coefficients file not found")
    };

    let mut config = Config::default();
    config.forecast.rng_seed = Some(42);

    Harness {
        state: AppState::new(config, provider.clone(), handle),
        provider,
        model,
    }
}

impl Harness {
    fn provider_calls(&self) -> usize {
        self.provider.calls.load(Ordering::SeqCst)
    }

    fn model_calls(&self) -> usize {
        self.model.calls.load(Ordering::SeqCst)
    }
}

fn predict_request(body: Value) -> Request<Body> {
    Request::post("/api/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_root_banner() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_model_status() {
    let h = harness(Some(CONDITIONS), false);
    let response = create_app(h.state.clone())
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["model"], "unavailable");
    assert_eq!(json["environment"], "development");
}

#[tokio::test]
async fn test_regions_catalog() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(Request::get("/api/v1/regions").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Junín", "Ayacucho", "Cusco", "Puno"]);
}

#[tokio::test]
async fn test_yearly_forecast_for_cusco() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({"region": "Cusco", "year": 2025})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let forecast: ForecastResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(forecast.region, Region::Cusco);
    assert_eq!(forecast.granularity, Granularity::Yearly);
    assert_eq!(forecast.labels.first().map(String::as_str), Some("2025"));
    assert_eq!(forecast.labels.last().map(String::as_str), Some("2032"));
    assert_eq!(forecast.raw_series, vec![32.0; 8]);
    assert_eq!(forecast.series.len(), 8);
    assert!(forecast.series.iter().all(|v| (v - 32.0).abs() <= 0.1 + 1e-9));
    assert_eq!(forecast.heatmap_points.len(), 80);
    assert_eq!(forecast.recommendation.crop, Crop::Maize);
    assert!(forecast.narrative_text.contains("heat tolerance"));
    assert!(forecast.chart_artifact.is_some());
    assert!(forecast.heatmap_artifact.is_some());

    assert_eq!(h.provider_calls(), 1);
    assert_eq!(h.model_calls(), 8);
}

#[tokio::test]
async fn test_monthly_forecast_for_puno() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({
            "region": "Puno",
            "start_year": 2025,
            "start_month": 1,
            "end_year": 2026,
            "end_month": 3
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["granularity"], "monthly");
    assert_eq!(json["labels"].as_array().unwrap().len(), 15);
    assert_eq!(json["heatmap_points"].as_array().unwrap().len(), 50);
    assert_eq!(json["heatmap_points"][0].as_array().unwrap().len(), 3);
    assert_eq!(h.model_calls(), 15);
}

#[tokio::test]
async fn test_spanish_field_names() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({"departamento": "Junín", "año": 2026})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["region"], "Junín");
}

#[tokio::test]
async fn test_unknown_region_makes_no_downstream_calls() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({"region": "Lima", "year": 2025})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.error.code, "INVALID_REGION");
    assert_eq!(error.error.field.as_deref(), Some("region"));

    assert_eq!(h.provider_calls(), 0);
    assert_eq!(h.model_calls(), 0);
}

#[tokio::test]
async fn test_missing_year_is_client_error() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({"region": "Cusco"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "MISSING_FIELD");
    assert_eq!(json["error"]["field"], "year");
    assert_eq!(h.provider_calls(), 0);
}

#[tokio::test]
async fn test_oversized_range_rejected() {
    let h = harness(Some(CONDITIONS), true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({
            "region": "Ayacucho",
            "start_year": 2025,
            "start_month": 1,
            "end_year": 2040,
            "end_month": 1
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "INVALID_RANGE");
    assert_eq!(h.model_calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let h = harness(Some(CONDITIONS), true);
    let request = Request::post("/api/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = create_app(h.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_unavailable_model_is_server_error() {
    let h = harness(Some(CONDITIONS), false);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({"region": "Cusco", "year": 2025})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "MODEL_UNAVAILABLE");
    assert_eq!(h.provider_calls(), 0);
}

#[tokio::test]
async fn test_conditions_failure_is_server_error() {
    let h = harness(None, true);
    let response = create_app(h.state.clone())
        .oneshot(predict_request(json!({"region": "Cusco", "year": 2025})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "CONDITIONS_UNAVAILABLE");
    assert_eq!(json["error"]["message_es"], "Error al obtener datos del clima");
    assert_eq!(h.model_calls(), 0);
}

#[tokio::test]
async fn test_seeded_responses_are_reproducible() {
    let h = harness(Some(CONDITIONS), true);
    let app = create_app(h.state.clone());

    let mut series = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(predict_request(json!({"region": "Cusco", "year": 2025})))
            .await
            .unwrap();
        let json = body_to_json(response.into_body()).await;
        series.push(json["series"].clone());
    }

    assert_eq!(series[0], series[1]);
    // cached after the first lookup
    assert_eq!(h.provider_calls(), 1);
}
