//! Heat-map sample synthesis
//!
//! Samples are synthetic points scattered around a region's coordinates for
//! density-map rendering. They are not observations.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::forecast::ForecastSeries;
use crate::types::GeoPoint;

/// Default jitter radius in degrees
pub const DEFAULT_JITTER_RADIUS: f64 = 0.1;

/// Default samples generated per forecast point (detailed view)
pub const DEFAULT_SAMPLES_PER_POINT: usize = 10;

/// Default flat sample budget (range view)
pub const DEFAULT_TOTAL_SAMPLES: usize = 50;

/// Upper bound on any configured sample budget
pub const MAX_HEAT_SAMPLES: usize = 10_000;

/// A synthetic geo-tagged intensity, serialized as `[lat, lon, intensity]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct HeatSample {
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
}

impl HeatSample {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl From<[f64; 3]> for HeatSample {
    fn from([latitude, longitude, intensity]: [f64; 3]) -> Self {
        Self {
            latitude,
            longitude,
            intensity,
        }
    }
}

impl From<HeatSample> for [f64; 3] {
    fn from(sample: HeatSample) -> Self {
        [sample.latitude, sample.longitude, sample.intensity]
    }
}

/// Sample budget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum HeatSamplePolicy {
    /// `n` samples for every forecast point
    PerPoint(usize),
    /// Exactly `n` samples regardless of horizon length, assigned round-robin
    FixedTotal(usize),
}

impl HeatSamplePolicy {
    /// Total samples produced for a series of `series_len` points
    pub fn sample_count(&self, series_len: usize) -> usize {
        match *self {
            HeatSamplePolicy::PerPoint(per_point) => per_point.saturating_mul(series_len),
            HeatSamplePolicy::FixedTotal(total) => total,
        }
    }
}

/// Scatter samples around `origin`, each tagged with a raw forecast value.
///
/// Latitude and longitude offsets are drawn independently from
/// `uniform(-jitter_radius, +jitter_radius)`.
pub fn synthesize<R: Rng>(
    origin: GeoPoint,
    series: &ForecastSeries,
    policy: HeatSamplePolicy,
    jitter_radius: f64,
    rng: &mut R,
) -> Vec<HeatSample> {
    let radius = jitter_radius.abs();
    let points = series.points();
    if points.is_empty() {
        return Vec::new();
    }

    let count = policy.sample_count(points.len());
    let mut samples = Vec::with_capacity(count);

    for i in 0..count {
        let intensity = match policy {
            HeatSamplePolicy::PerPoint(per_point) => points[i / per_point].raw_value,
            HeatSamplePolicy::FixedTotal(_) => points[i % points.len()].raw_value,
        };
        let position = origin.offset(
            rng.random_range(-radius..=radius),
            rng.random_range(-radius..=radius),
        );
        samples.push(HeatSample {
            latitude: position.latitude,
            longitude: position.longitude,
            intensity,
        });
    }

    samples
}
