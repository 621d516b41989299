//! Forecast response assembly

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    Crop, CurrentConditions, ForecastSeries, GeoPoint, Granularity, HeatSample, Horizon,
    Recommendation, Region,
};
use uuid::Uuid;

use crate::external::RenderedArtifacts;

/// Crop advice as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSummary {
    pub crop: Crop,
    pub irrigation: String,
    pub description: String,
}

/// Complete forecast returned by `POST /api/v1/predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub region: Region,
    pub coordinates: GeoPoint,
    pub granularity: Granularity,
    pub labels: Vec<String>,
    /// Display values, perturbed for charting
    pub series: Vec<f64>,
    /// Model output the recommendation was derived from
    pub raw_series: Vec<f64>,
    pub heatmap_points: Vec<HeatSample>,
    pub recommendation: RecommendationSummary,
    pub narrative_text: String,
    pub conditions: CurrentConditions,
    /// Base64 GeoJSON heat layer
    pub heatmap_artifact: Option<String>,
    /// Base64 SVG chart
    pub chart_artifact: Option<String>,
}

impl ForecastResponse {
    pub fn assemble(
        region: Region,
        horizon: &Horizon,
        series: &ForecastSeries,
        heatmap_points: Vec<HeatSample>,
        recommendation: Recommendation,
        conditions: CurrentConditions,
        artifacts: Option<RenderedArtifacts>,
    ) -> Self {
        let (heatmap_artifact, chart_artifact) = match artifacts {
            Some(a) => (Some(STANDARD.encode(a.heatmap)), Some(STANDARD.encode(a.chart))),
            None => (None, None),
        };

        Self {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            region,
            coordinates: region.coordinates(),
            granularity: horizon.granularity(),
            labels: series.labels(),
            series: series.display_values(),
            raw_series: series.raw_values(),
            heatmap_points,
            recommendation: RecommendationSummary {
                crop: recommendation.crop,
                irrigation: recommendation.irrigation,
                description: recommendation.description,
            },
            narrative_text: recommendation.narrative,
            conditions,
            heatmap_artifact,
            chart_artifact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use shared::{HorizonBuilder, RecommendationEngine};

    fn parts() -> (Horizon, ForecastSeries, Recommendation, CurrentConditions) {
        let horizon = HorizonBuilder::default().monthly(2025, 11, 2026, 2).unwrap();
        let raw = [21.0, 22.0, 23.0, 24.0];
        let series =
            ForecastSeries::from_raw(&horizon, &raw, 0.5, &mut StdRng::seed_from_u64(4)).unwrap();
        let recommendation = RecommendationEngine::default().recommend(&series, 10.0, 60.0);
        let conditions = CurrentConditions {
            temperature_celsius: 20.0,
            precipitation_mm: 10.0,
            humidity_percent: 60.0,
            wind_speed_mps: 2.0,
        };
        (horizon, series, recommendation, conditions)
    }

    #[test]
    fn test_assemble_without_artifacts() {
        let (horizon, series, recommendation, conditions) = parts();
        let response = ForecastResponse::assemble(
            Region::Ayacucho,
            &horizon,
            &series,
            Vec::new(),
            recommendation,
            conditions,
            None,
        );

        assert_eq!(response.granularity, Granularity::Monthly);
        assert_eq!(response.labels, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
        assert_eq!(response.raw_series, vec![21.0, 22.0, 23.0, 24.0]);
        assert_eq!(response.recommendation.crop, Crop::Beans);
        assert_eq!(response.coordinates, Region::Ayacucho.coordinates());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["chart_artifact"].is_null());
        assert!(json["heatmap_artifact"].is_null());
        assert_eq!(json["coordinates"]["lat"], -13.1584);
    }

    #[test]
    fn test_artifacts_are_base64() {
        let (horizon, series, recommendation, conditions) = parts();
        let artifacts = RenderedArtifacts {
            heatmap: b"{}".to_vec(),
            chart: b"<svg/>".to_vec(),
        };
        let response = ForecastResponse::assemble(
            Region::Puno,
            &horizon,
            &series,
            Vec::new(),
            recommendation,
            conditions,
            Some(artifacts),
        );

        assert_eq!(response.heatmap_artifact.as_deref(), Some("e30="));
        let chart = STANDARD.decode(response.chart_artifact.unwrap()).unwrap();
        assert_eq!(chart, b"<svg/>");
    }
}
