//! Region catalog
//!
//! The set of forecastable regions is closed and fixed at compile time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::types::GeoPoint;

/// A forecastable region (Peruvian department)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "Junín")]
    Junin,
    Ayacucho,
    Cusco,
    Puno,
}

impl Region {
    /// Every region in the catalog, in display order
    pub const ALL: [Region; 4] = [Region::Junin, Region::Ayacucho, Region::Cusco, Region::Puno];

    /// Canonical region name as accepted on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Region::Junin => "Junín",
            Region::Ayacucho => "Ayacucho",
            Region::Cusco => "Cusco",
            Region::Puno => "Puno",
        }
    }

    /// Reference coordinates used for weather lookups and heat-map origins
    pub fn coordinates(&self) -> GeoPoint {
        match self {
            Region::Junin => GeoPoint::new(-11.9396, -74.5482),
            Region::Ayacucho => GeoPoint::new(-13.1584, -74.2231),
            Region::Cusco => GeoPoint::new(-13.5313, -71.9675),
            Region::Puno => GeoPoint::new(-15.8402, -69.0194),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    /// Exact, case-sensitive match against the canonical names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.name() == s)
            .ok_or_else(|| DomainError::InvalidRegion(s.to_string()))
    }
}

/// Catalog entry exposed to API clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionInfo {
    pub name: String,
    pub coordinates: GeoPoint,
}

impl From<Region> for RegionInfo {
    fn from(region: Region) -> Self {
        RegionInfo {
            name: region.name().to_string(),
            coordinates: region.coordinates(),
        }
    }
}

/// List the full region catalog
pub fn region_catalog() -> Vec<RegionInfo> {
    Region::ALL.into_iter().map(RegionInfo::from).collect()
}
