//! Current weather conditions used as model features

use serde::{Deserialize, Serialize};

/// Number of features passed to a forecast model
pub const FEATURE_COUNT: usize = 5;

/// Model input: `[temperature, precipitation, humidity, wind, time]`
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Conditions observed at a region's coordinates at request time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub temperature_celsius: f64,
    /// Precipitation over the last hour; 0 when the provider reports none
    #[serde(default)]
    pub precipitation_mm: f64,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
}

impl CurrentConditions {
    /// Build the model feature vector for one time index
    pub fn features(&self, time_feature: f64) -> FeatureVector {
        [
            self.temperature_celsius,
            self.precipitation_mm,
            self.humidity_percent,
            self.wind_speed_mps,
            time_feature,
        ]
    }
}
