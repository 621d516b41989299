//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Shift the point by the given latitude/longitude deltas
    pub fn offset(&self, delta_lat: f64, delta_lon: f64) -> Self {
        Self::new(self.latitude + delta_lat, self.longitude + delta_lon)
    }

    /// True when both axes lie within `radius` degrees of `other`
    pub fn is_within(&self, other: &GeoPoint, radius: f64) -> bool {
        (self.latitude - other.latitude).abs() <= radius
            && (self.longitude - other.longitude).abs() <= radius
    }
}
