//! Configuration management for the Climate Advisor platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CLIMATE_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    validate_fluctuation_band, validate_jitter_radius, validate_sample_budget, AggregationPolicy,
    InvocationPolicy, RecommendationThresholds, DEFAULT_JITTER_RADIUS,
    DEFAULT_MONTHLY_FLUCTUATION, DEFAULT_SAMPLES_PER_POINT, DEFAULT_SPAN_YEARS,
    DEFAULT_TOTAL_SAMPLES, DEFAULT_YEARLY_FLUCTUATION, MAX_HEAT_SAMPLES,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Forecast model configuration
    pub model: ModelConfig,

    /// Horizon and series generation
    pub forecast: ForecastConfig,

    /// Heat-map sample synthesis
    pub heatmap: HeatmapConfig,

    /// Recommendation rule thresholds
    pub recommendation: RecommendationConfig,

    /// Current-conditions caching
    pub conditions: ConditionsConfig,

    /// Artifact rendering
    pub rendering: RenderingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Which forecast model implementation to load
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Linear coefficients loaded from a JSON file
    Linear,
    /// HTTP inference endpoint
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub kind: ModelKind,

    /// Coefficients file for the linear model
    pub path: Option<String>,

    /// Inference endpoint for the remote model
    pub endpoint: Option<String>,

    /// API key sent to the remote model
    pub api_key: Option<String>,

    /// Request timeout in seconds for the remote model
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Yearly points produced when only a start year is requested
    pub default_span_years: i32,

    /// Display band half-width for yearly horizons
    pub yearly_fluctuation: f64,

    /// Display band half-width for monthly horizons
    pub monthly_fluctuation: f64,

    /// Model invocation policy
    pub invocation: InvocationPolicy,

    /// Fixed RNG seed for reproducible display values
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeatmapConfig {
    /// Samples per forecast point for yearly horizons
    pub samples_per_point: usize,

    /// Flat sample budget for monthly horizons
    pub total_samples: usize,

    /// Jitter radius in degrees
    pub jitter_radius: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendationConfig {
    pub aggregation: AggregationPolicy,
    pub heat_celsius: f64,
    pub rainfall_mm: f64,
    pub cool_celsius: f64,
    pub humid_percent: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConditionsConfig {
    /// Seconds a fetched observation is reused; 0 disables caching
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderingConfig {
    /// Attach rendered chart and density-map artifacts to responses
    pub enabled: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CLIMATE_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let thresholds = RecommendationThresholds::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.timeout_secs", 10)?
            .set_default("model.kind", "linear")?
            .set_default("model.path", "models/forecast_model.json")?
            .set_default("model.timeout_secs", 30)?
            .set_default("forecast.default_span_years", DEFAULT_SPAN_YEARS)?
            .set_default("forecast.yearly_fluctuation", DEFAULT_YEARLY_FLUCTUATION)?
            .set_default("forecast.monthly_fluctuation", DEFAULT_MONTHLY_FLUCTUATION)?
            .set_default("forecast.invocation", "per_index")?
            .set_default("heatmap.samples_per_point", DEFAULT_SAMPLES_PER_POINT as u64)?
            .set_default("heatmap.total_samples", DEFAULT_TOTAL_SAMPLES as u64)?
            .set_default("heatmap.jitter_radius", DEFAULT_JITTER_RADIUS)?
            .set_default("recommendation.aggregation", "mean")?
            .set_default("recommendation.heat_celsius", thresholds.heat_celsius)?
            .set_default("recommendation.rainfall_mm", thresholds.rainfall_mm)?
            .set_default("recommendation.cool_celsius", thresholds.cool_celsius)?
            .set_default("recommendation.humid_percent", thresholds.humid_percent)?
            .set_default("conditions.cache_ttl_secs", 300)?
            .set_default("rendering.enabled", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CLIMATE_ prefix)
            .add_source(
                Environment::with_prefix("CLIMATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| ConfigError::Message(msg.to_string());

        validate_fluctuation_band(self.forecast.yearly_fluctuation).map_err(invalid)?;
        validate_fluctuation_band(self.forecast.monthly_fluctuation).map_err(invalid)?;
        validate_jitter_radius(self.heatmap.jitter_radius).map_err(invalid)?;
        validate_sample_budget(self.heatmap.samples_per_point, MAX_HEAT_SAMPLES)
            .map_err(|_| invalid("heatmap.samples_per_point exceeds the sample limit"))?;
        validate_sample_budget(self.heatmap.total_samples, MAX_HEAT_SAMPLES)
            .map_err(|_| invalid("heatmap.total_samples exceeds the sample limit"))?;

        if self.forecast.default_span_years < 1 {
            return Err(invalid("forecast.default_span_years must be at least 1"));
        }
        match self.model.kind {
            ModelKind::Linear if self.model.path.is_none() => {
                Err(invalid("model.path is required for the linear model"))
            }
            ModelKind::Remote if self.model.endpoint.is_none() => {
                Err(invalid("model.endpoint is required for the remote model"))
            }
            _ => Ok(()),
        }
    }

    pub fn thresholds(&self) -> RecommendationThresholds {
        RecommendationThresholds {
            heat_celsius: self.recommendation.heat_celsius,
            rainfall_mm: self.recommendation.rainfall_mm,
            cool_celsius: self.recommendation.cool_celsius,
            humid_percent: self.recommendation.humid_percent,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = RecommendationThresholds::default();
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig {
                api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
                api_key: String::new(),
                timeout_secs: 10,
            },
            model: ModelConfig {
                kind: ModelKind::Linear,
                path: Some("models/forecast_model.json".to_string()),
                endpoint: None,
                api_key: None,
                timeout_secs: 30,
            },
            forecast: ForecastConfig {
                default_span_years: DEFAULT_SPAN_YEARS,
                yearly_fluctuation: DEFAULT_YEARLY_FLUCTUATION,
                monthly_fluctuation: DEFAULT_MONTHLY_FLUCTUATION,
                invocation: InvocationPolicy::PerIndex,
                rng_seed: None,
            },
            heatmap: HeatmapConfig {
                samples_per_point: DEFAULT_SAMPLES_PER_POINT,
                total_samples: DEFAULT_TOTAL_SAMPLES,
                jitter_radius: DEFAULT_JITTER_RADIUS,
            },
            recommendation: RecommendationConfig {
                aggregation: AggregationPolicy::Mean,
                heat_celsius: thresholds.heat_celsius,
                rainfall_mm: thresholds.rainfall_mm,
                cool_celsius: thresholds.cool_celsius,
                humid_percent: thresholds.humid_percent,
            },
            conditions: ConditionsConfig { cache_ttl_secs: 300 },
            rendering: RenderingConfig { enabled: true },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
