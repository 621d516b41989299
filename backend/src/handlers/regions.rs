//! Region catalog handler

use axum::Json;
use shared::{region_catalog, RegionInfo};

/// List the supported regions and their coordinates
pub async fn list_regions() -> Json<Vec<RegionInfo>> {
    Json(region_catalog())
}
