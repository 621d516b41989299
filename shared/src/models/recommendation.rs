//! Crop and irrigation recommendation rules
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | # | Condition | Crop |
//! |---|-----------|------|
//! | 1 | aggregated projected temperature > 30 °C | Maize |
//! | 2 | precipitation > 150 mm | Rice |
//! | 3 | mean projected temperature < 25 °C | Beans |
//! | 4 | otherwise | Potatoes |
//!
//! Only raw model values are considered; display fluctuation never reaches
//! this module.

use serde::{Deserialize, Serialize};

use crate::models::forecast::{max, mean, ForecastSeries};

/// Recommended crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Crop {
    Maize,
    Rice,
    Beans,
    Potatoes,
}

impl Crop {
    pub fn irrigation(&self) -> &'static str {
        match self {
            Crop::Maize => {
                "Drip irrigation in the early morning, with shade netting during peak heat hours"
            }
            Crop::Rice => "Flood-control irrigation with drainage channels to release excess water",
            Crop::Beans => "Moderate drip irrigation, keeping the soil evenly moist without saturating it",
            Crop::Potatoes => "Controlled drip irrigation that avoids standing moisture around the tubers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Crop::Maize => "Maize tolerates high temperatures and sustained heat stress.",
            Crop::Rice => "Rice tolerates waterlogged soils and heavy rainfall.",
            Crop::Beans => "Beans grow best in cool, mild climates.",
            Crop::Potatoes => {
                "Potatoes suit temperate conditions but are prone to fungal disease when moisture builds up."
            }
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crop::Maize => write!(f, "Maize"),
            Crop::Rice => write!(f, "Rice"),
            Crop::Beans => write!(f, "Beans"),
            Crop::Potatoes => write!(f, "Potatoes"),
        }
    }
}

/// Aggregate used for the heat rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    #[default]
    Mean,
    /// Legacy: peak value, over-reacts to single outliers
    Max,
}

impl AggregationPolicy {
    pub fn aggregate(&self, values: &[f64]) -> Option<f64> {
        match self {
            AggregationPolicy::Mean => mean(values),
            AggregationPolicy::Max => max(values),
        }
    }

    fn adjective(&self) -> &'static str {
        match self {
            AggregationPolicy::Mean => "mean",
            AggregationPolicy::Max => "peak",
        }
    }
}

/// Rule thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RecommendationThresholds {
    /// Rule 1: heat (°C), strictly greater than
    pub heat_celsius: f64,
    /// Rule 2: precipitation (mm), strictly greater than
    pub rainfall_mm: f64,
    /// Rule 3: cool (°C), strictly less than
    pub cool_celsius: f64,
    /// Narrative only: humidity (%) at or above which fungal pressure is mentioned
    pub humid_percent: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            heat_celsius: 30.0,
            rainfall_mm: 150.0,
            cool_celsius: 25.0,
            humid_percent: 80.0,
        }
    }
}

/// Resolved advisory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub crop: Crop,
    pub irrigation: String,
    pub description: String,
    pub narrative: String,
}

/// Evaluates the ordered rule chain
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecommendationEngine {
    thresholds: RecommendationThresholds,
    aggregation: AggregationPolicy,
}

impl RecommendationEngine {
    pub fn new(thresholds: RecommendationThresholds, aggregation: AggregationPolicy) -> Self {
        Self {
            thresholds,
            aggregation,
        }
    }

    /// Resolve the advisory for a forecast series and current conditions
    pub fn recommend(
        &self,
        series: &ForecastSeries,
        precipitation_mm: f64,
        humidity_percent: f64,
    ) -> Recommendation {
        let raw = series.raw_values();
        let labels = series.labels();
        // ForecastSeries is never empty
        let crop = self
            .resolve_crop(&raw, precipitation_mm)
            .unwrap_or(Crop::Potatoes);

        Recommendation {
            crop,
            irrigation: crop.irrigation().to_string(),
            description: crop.description().to_string(),
            narrative: self.narrative(crop, &labels, &raw, precipitation_mm, humidity_percent),
        }
    }

    /// Apply the rule chain to raw values; `None` for an empty slice
    pub fn resolve_crop(&self, raw_values: &[f64], precipitation_mm: f64) -> Option<Crop> {
        let aggregated = self.aggregation.aggregate(raw_values)?;
        let average = mean(raw_values)?;

        let crop = if aggregated > self.thresholds.heat_celsius {
            Crop::Maize
        } else if precipitation_mm > self.thresholds.rainfall_mm {
            Crop::Rice
        } else if average < self.thresholds.cool_celsius {
            Crop::Beans
        } else {
            Crop::Potatoes
        };

        Some(crop)
    }

    /// Templated paragraph restating the projection and the matched rule
    pub fn narrative(
        &self,
        crop: Crop,
        labels: &[String],
        raw_values: &[f64],
        precipitation_mm: f64,
        humidity_percent: f64,
    ) -> String {
        let projection = labels
            .iter()
            .zip(raw_values)
            .map(|(label, value)| format!("{}: {:.1} °C", label, value))
            .collect::<Vec<_>>()
            .join(", ");
        let average = mean(raw_values).unwrap_or_default();
        let aggregated = self.aggregation.aggregate(raw_values).unwrap_or_default();
        let t = &self.thresholds;

        let rationale = match crop {
            Crop::Maize => format!(
                "Because the {} projected temperature of {:.1} °C exceeds {:.0} °C, maize is recommended for its heat tolerance.",
                self.aggregation.adjective(),
                aggregated,
                t.heat_celsius
            ),
            Crop::Rice => format!(
                "Because precipitation of {:.1} mm exceeds {:.0} mm, rice is recommended for its tolerance of standing water.",
                precipitation_mm, t.rainfall_mm
            ),
            Crop::Beans => format!(
                "Because the mean projected temperature stays below {:.0} °C, beans are recommended for the cool climate.",
                t.cool_celsius
            ),
            Crop::Potatoes => "With temperate projections and moderate precipitation, potatoes are recommended; keep irrigation controlled to limit fungal risk.".to_string(),
        };

        let mut narrative = format!(
            "Projected temperatures: {}. The mean projected temperature is {:.1} °C, with current precipitation of {:.1} mm and relative humidity of {:.0}%. {}",
            projection, average, precipitation_mm, humidity_percent, rationale
        );

        if humidity_percent >= t.humid_percent {
            narrative.push_str(&format!(
                " Relative humidity at or above {:.0}% raises fungal pressure; monitor leaves closely.",
                t.humid_percent
            ));
        }

        narrative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::horizon::HorizonBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn series(raw: &[f64]) -> ForecastSeries {
        let start = 2025;
        let horizon = HorizonBuilder::default()
            .yearly(start, Some(start + raw.len() as i32))
            .unwrap();
        ForecastSeries::from_raw(&horizon, raw, 0.5, &mut StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_heat_rule_wins_first() {
        let engine = RecommendationEngine::default();
        let rec = engine.recommend(&series(&[32.0; 8]), 400.0, 50.0);
        assert_eq!(rec.crop, Crop::Maize);
        assert_eq!(rec.irrigation, Crop::Maize.irrigation());
    }

    #[test]
    fn test_rain_rule() {
        let engine = RecommendationEngine::default();
        assert_eq!(engine.recommend(&series(&[27.0; 8]), 151.0, 60.0).crop, Crop::Rice);
    }

    #[test]
    fn test_cool_rule() {
        let engine = RecommendationEngine::default();
        assert_eq!(engine.recommend(&series(&[18.0; 8]), 10.0, 60.0).crop, Crop::Beans);
    }

    #[test]
    fn test_temperate_fallback() {
        let engine = RecommendationEngine::default();
        assert_eq!(engine.recommend(&series(&[27.0; 8]), 40.0, 60.0).crop, Crop::Potatoes);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let engine = RecommendationEngine::default();
        // exactly 30 is not heat, exactly 150 is not rain, exactly 25 is not cool
        assert_eq!(engine.resolve_crop(&[30.0], 150.0), Some(Crop::Potatoes));
        assert_eq!(engine.resolve_crop(&[25.0], 0.0), Some(Crop::Potatoes));
    }

    #[test]
    fn test_mean_versus_max_aggregation() {
        let raw = [20.0, 20.0, 20.0, 35.0];
        let mean_engine = RecommendationEngine::default();
        let max_engine =
            RecommendationEngine::new(RecommendationThresholds::default(), AggregationPolicy::Max);

        assert_eq!(mean_engine.resolve_crop(&raw, 0.0), Some(Crop::Beans));
        assert_eq!(max_engine.resolve_crop(&raw, 0.0), Some(Crop::Maize));
    }

    #[test]
    fn test_empty_values_resolve_to_none() {
        assert_eq!(RecommendationEngine::default().resolve_crop(&[], 0.0), None);
    }

    #[test]
    fn test_narrative_restates_series() {
        let engine = RecommendationEngine::default();
        let rec = engine.recommend(&series(&[31.0, 33.0]), 40.0, 85.0);

        assert!(rec.narrative.contains("2025: 31.0 °C"));
        assert!(rec.narrative.contains("2026: 33.0 °C"));
        assert!(rec.narrative.contains("mean projected temperature is 32.0 °C"));
        assert!(rec.narrative.contains("heat tolerance"));
        assert!(rec.narrative.contains("fungal pressure"));
    }

    #[test]
    fn test_recommendation_ignores_display_values() {
        let engine = RecommendationEngine::default();
        let a = engine.recommend(&series(&[29.9; 8]), 0.0, 50.0);
        let b = engine.recommend(&series(&[29.9; 8]), 0.0, 50.0);
        assert_eq!(a, b);
        assert_eq!(a.crop, Crop::Potatoes);
    }
}
