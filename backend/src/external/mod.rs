//! External integrations: weather conditions, forecast models and rendering

pub mod forecast_model;
pub mod rendering;
pub mod weather;

pub use forecast_model::{ForecastModel, LinearForecastModel, ModelHandle, RemoteForecastModel};
pub use rendering::{ArtifactRenderer, RenderedArtifacts, SvgArtifactRenderer};
pub use weather::{ConditionsProvider, WeatherClient};
