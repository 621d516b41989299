//! Forecast series and display fluctuation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::models::horizon::{Horizon, TimeIndex};

/// Default half-width of the display band for yearly horizons, kept narrow
/// for the single-year eight-point view
pub const DEFAULT_YEARLY_FLUCTUATION: f64 = 0.1;

/// Default half-width of the display band for monthly horizons, the wider
/// band used for month ranges
pub const DEFAULT_MONTHLY_FLUCTUATION: f64 = 0.5;

/// How the forecast model is driven across a horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvocationPolicy {
    /// One model invocation per time index
    #[default]
    PerIndex,
    /// Legacy: invoke once for the first index and replicate the value
    ReplicateFirst,
}

/// One projected value of a forecast series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub index: TimeIndex,
    /// Value returned by the forecast model
    pub raw_value: f64,
    /// Raw value plus visual fluctuation; never used for recommendations
    pub display_value: f64,
}

/// Chronologically ordered, non-empty forecast series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Pair raw model outputs with the horizon and overlay display fluctuation.
    ///
    /// Each point draws its own offset from `uniform(-band, +band)`.
    pub fn from_raw<R: Rng>(
        horizon: &Horizon,
        raw_values: &[f64],
        band: f64,
        rng: &mut R,
    ) -> Result<Self, DomainError> {
        if horizon.is_empty() || horizon.len() != raw_values.len() {
            return Err(DomainError::SeriesLengthMismatch {
                expected: horizon.len(),
                actual: raw_values.len(),
            });
        }

        let points = horizon
            .iter()
            .zip(raw_values)
            .map(|(index, &raw_value)| ForecastPoint {
                index: *index,
                raw_value,
                display_value: fluctuate(raw_value, band, rng),
            })
            .collect();

        Ok(Self { points })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn raw_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.raw_value).collect()
    }

    pub fn display_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.display_value).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.index.label()).collect()
    }

    /// Mean of the raw values
    pub fn mean_raw(&self) -> f64 {
        mean(&self.raw_values()).unwrap_or_default()
    }

    /// Largest raw value
    pub fn max_raw(&self) -> f64 {
        max(&self.raw_values()).unwrap_or_default()
    }
}

/// Add a uniform offset in `[-band, +band]` to `value`
pub fn fluctuate<R: Rng>(value: f64, band: f64, rng: &mut R) -> f64 {
    let band = band.abs();
    value + rng.random_range(-band..=band)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Maximum, `None` for an empty slice
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
