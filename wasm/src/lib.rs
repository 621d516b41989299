//! WebAssembly module for the Climate Advisor platform
//!
//! Provides client-side computation for:
//! - Region catalog lookup
//! - Forecast form validation and horizon preview
//! - Crop rule evaluation over projected temperatures

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("climate advisor wasm ready"));
}

/// Region catalog as JSON: `[{"name": .., "coordinates": {"lat": .., "lon": ..}}]`
#[wasm_bindgen]
pub fn list_regions() -> String {
    serde_json::to_string(&region_catalog()).unwrap_or_else(|_| "[]".to_string())
}

/// Whether `name` is one of the supported regions
#[wasm_bindgen]
pub fn is_supported_region(name: &str) -> bool {
    name.parse::<Region>().is_ok()
}

/// Labels of the horizon a forecast request would cover
#[wasm_bindgen]
pub fn preview_horizon(request_json: &str) -> Result<js_sys::Array, JsValue> {
    let labels = horizon_labels(request_json).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })?;
    Ok(labels.into_iter().map(JsValue::from).collect())
}

/// Number of time steps a forecast request would cover, 0 when invalid
#[wasm_bindgen]
pub fn horizon_length(request_json: &str) -> usize {
    horizon_labels(request_json).map(|l| l.len()).unwrap_or(0)
}

/// Crop recommended for projected temperatures and precipitation
#[wasm_bindgen]
pub fn recommend_crop(temperatures: &[f64], precipitation_mm: f64) -> String {
    RecommendationEngine::default()
        .resolve_crop(temperatures, precipitation_mm)
        .map(|crop| crop.to_string())
        .unwrap_or_default()
}

/// Irrigation guidance for a crop name
#[wasm_bindgen]
pub fn irrigation_for(crop: &str) -> String {
    let crop = match crop {
        "Maize" => Crop::Maize,
        "Rice" => Crop::Rice,
        "Beans" => Crop::Beans,
        "Potatoes" => Crop::Potatoes,
        _ => return String::new(),
    };
    crop.irrigation().to_string()
}

fn horizon_labels(request_json: &str) -> Result<Vec<String>, String> {
    let request: ForecastRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request JSON: {}", e))?;

    request.region().map_err(|e| e.to_string())?;
    let spec = request.horizon_spec().map_err(|e| e.to_string())?;
    let horizon = HorizonBuilder::default()
        .build(&spec)
        .map_err(|e| e.to_string())?;

    Ok(horizon.labels())
}
