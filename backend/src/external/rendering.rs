//! Forecast artifact rendering
//!
//! Produces a line chart of the display series and a density-map layer of the
//! heat samples. Bytes are base64-encoded when the response is assembled.

use serde_json::json;
use shared::{ForecastSeries, HeatSample, Region};

use crate::error::{AppError, AppResult};

/// Rendered artifacts for one forecast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    /// Density map layer
    pub heatmap: Vec<u8>,
    /// Series chart
    pub chart: Vec<u8>,
}

/// Turns a forecast into displayable artifacts
pub trait ArtifactRenderer: Send + Sync {
    fn render(
        &self,
        region: Region,
        series: &ForecastSeries,
        samples: &[HeatSample],
    ) -> AppResult<RenderedArtifacts>;
}

/// SVG chart plus GeoJSON heat layer
#[derive(Debug, Clone, Copy)]
pub struct SvgArtifactRenderer {
    width: u32,
    height: u32,
}

impl Default for SvgArtifactRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 320,
        }
    }
}

const MARGIN: f64 = 40.0;

impl SvgArtifactRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn chart(&self, region: Region, series: &ForecastSeries) -> String {
        let values = series.display_values();
        let labels = series.labels();
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        // flat series still get a visible vertical range
        let spread = if max - min > f64::EPSILON { max - min } else { 1.0 };

        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let plot_w = width - 2.0 * MARGIN;
        let plot_h = height - 2.0 * MARGIN;
        let step = if values.len() > 1 {
            plot_w / (values.len() - 1) as f64
        } else {
            0.0
        };

        let coords: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = MARGIN + step * i as f64;
                let y = MARGIN + plot_h * (1.0 - (v - min) / spread);
                (x, y)
            })
            .collect();

        let polyline = coords
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" ");

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="20" text-anchor="middle">Projected temperature, {}</text>"#,
            width / 2.0,
            region
        ));
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="teal" stroke-width="2" points="{}"/>"#,
            polyline
        ));
        for ((x, y), (label, value)) in coords.iter().zip(labels.iter().zip(&values)) {
            svg.push_str(&format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="3"><title>{}: {:.2} °C</title></circle>"#,
                x, y, label, value
            ));
        }
        svg.push_str("</svg>");
        svg
    }

    fn heat_layer(&self, region: Region, samples: &[HeatSample]) -> AppResult<Vec<u8>> {
        let features: Vec<_> = samples
            .iter()
            .map(|s| {
                json!({
                    "type": "Feature",
                    // GeoJSON positions are [lon, lat]
                    "geometry": { "type": "Point", "coordinates": [s.longitude, s.latitude] },
                    "properties": { "intensity": s.intensity },
                })
            })
            .collect();

        let collection = json!({
            "type": "FeatureCollection",
            "properties": { "region": region.name() },
            "features": features,
        });

        serde_json::to_vec(&collection)
            .map_err(|e| AppError::Rendering(format!("Failed to encode heat layer: {}", e)))
    }
}

impl ArtifactRenderer for SvgArtifactRenderer {
    fn render(
        &self,
        region: Region,
        series: &ForecastSeries,
        samples: &[HeatSample],
    ) -> AppResult<RenderedArtifacts> {
        if series.is_empty() {
            return Err(AppError::Rendering("empty forecast series".to_string()));
        }

        Ok(RenderedArtifacts {
            heatmap: self.heat_layer(region, samples)?,
            chart: self.chart(region, series).into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use shared::{synthesize, HeatSamplePolicy, HorizonBuilder};

    #[test]
    fn test_render_chart_and_heat_layer() {
        let horizon = HorizonBuilder::default().yearly(2025, None).unwrap();
        let raw: Vec<f64> = (0..8).map(|i| 20.0 + f64::from(i)).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let series = ForecastSeries::from_raw(&horizon, &raw, 0.1, &mut rng).unwrap();
        let samples = synthesize(
            Region::Cusco.coordinates(),
            &series,
            HeatSamplePolicy::PerPoint(2),
            0.1,
            &mut rng,
        );

        let artifacts = SvgArtifactRenderer::default()
            .render(Region::Cusco, &series, &samples)
            .unwrap();

        let chart = String::from_utf8(artifacts.chart).unwrap();
        assert!(chart.starts_with("<svg"));
        assert_eq!(chart.matches("<circle").count(), 8);
        assert!(chart.contains("2032"));

        let layer: serde_json::Value = serde_json::from_slice(&artifacts.heatmap).unwrap();
        assert_eq!(layer["type"], "FeatureCollection");
        assert_eq!(layer["features"].as_array().unwrap().len(), 16);
    }

    #[test]
    fn test_single_point_chart() {
        let horizon = HorizonBuilder::default().yearly(2025, Some(2025)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let series = ForecastSeries::from_raw(&horizon, &[18.0], 0.0, &mut rng).unwrap();

        let artifacts = SvgArtifactRenderer::new(200, 100)
            .render(Region::Puno, &series, &[])
            .unwrap();
        let chart = String::from_utf8(artifacts.chart).unwrap();
        assert!(chart.contains(r#"width="200""#));
        assert_eq!(chart.matches("<circle").count(), 1);
    }
}
