//! Forecast pipeline
//!
//! One request runs region lookup, horizon construction, conditions lookup,
//! model invocation, heat-sample synthesis, crop recommendation, rendering and
//! response assembly, in that order. Any failure aborts the request.

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{
    synthesize, CurrentConditions, ForecastRequest, ForecastSeries, Granularity,
    HeatSamplePolicy, Horizon, HorizonBuilder, InvocationPolicy, RecommendationEngine,
};
use validator::Validate;

use crate::config::Config;
use crate::error::AppResult;
use crate::external::{ArtifactRenderer, ForecastModel, ModelHandle};
use crate::services::conditions::ConditionsService;
use crate::services::response::ForecastResponse;

/// Display band half-widths per granularity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluctuationBands {
    pub yearly: f64,
    pub monthly: f64,
}

impl FluctuationBands {
    pub fn for_granularity(&self, granularity: Granularity) -> f64 {
        match granularity {
            Granularity::Yearly => self.yearly,
            Granularity::Monthly => self.monthly,
        }
    }
}

/// Drives the forecast model across a horizon
#[derive(Debug, Clone, Copy)]
pub struct ForecastSeriesGenerator {
    policy: InvocationPolicy,
    bands: FluctuationBands,
}

impl ForecastSeriesGenerator {
    pub fn new(policy: InvocationPolicy, bands: FluctuationBands) -> Self {
        if policy == InvocationPolicy::ReplicateFirst {
            tracing::warn!(
                "Legacy invocation policy enabled: the first projection is replicated across the horizon"
            );
        }
        Self { policy, bands }
    }

    pub fn policy(&self) -> InvocationPolicy {
        self.policy
    }

    /// Raw model outputs, one per time index
    pub async fn raw_predictions(
        &self,
        model: &dyn ForecastModel,
        conditions: &CurrentConditions,
        horizon: &Horizon,
    ) -> AppResult<Vec<f64>> {
        match self.policy {
            InvocationPolicy::PerIndex => {
                let mut raw = Vec::with_capacity(horizon.len());
                for index in horizon {
                    let value = model.predict(&conditions.features(index.feature())).await?;
                    tracing::debug!("Projected {} for {}", value, index);
                    raw.push(value);
                }
                Ok(raw)
            }
            InvocationPolicy::ReplicateFirst => {
                let first = horizon.first();
                let value = model.predict(&conditions.features(first.feature())).await?;
                tracing::debug!("Projected {} for {}, replicated", value, first);
                Ok(vec![value; horizon.len()])
            }
        }
    }

    /// Model projections with display fluctuation overlaid
    pub async fn generate<R: Rng + Send>(
        &self,
        model: &dyn ForecastModel,
        conditions: &CurrentConditions,
        horizon: &Horizon,
        rng: &mut R,
    ) -> AppResult<ForecastSeries> {
        let raw = self.raw_predictions(model, conditions, horizon).await?;
        let band = self.bands.for_granularity(horizon.granularity());
        Ok(ForecastSeries::from_raw(horizon, &raw, band, rng)?)
    }
}

/// Tunables of the pipeline, resolved from configuration
#[derive(Debug, Clone, Copy)]
pub struct ForecastSettings {
    pub horizon: HorizonBuilder,
    pub generator: ForecastSeriesGenerator,
    pub yearly_samples: HeatSamplePolicy,
    pub monthly_samples: HeatSamplePolicy,
    pub jitter_radius: f64,
    pub engine: RecommendationEngine,
    pub rng_seed: Option<u64>,
}

impl ForecastSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            horizon: HorizonBuilder::new(config.forecast.default_span_years),
            generator: ForecastSeriesGenerator::new(
                config.forecast.invocation,
                FluctuationBands {
                    yearly: config.forecast.yearly_fluctuation,
                    monthly: config.forecast.monthly_fluctuation,
                },
            ),
            yearly_samples: HeatSamplePolicy::PerPoint(config.heatmap.samples_per_point),
            monthly_samples: HeatSamplePolicy::FixedTotal(config.heatmap.total_samples),
            jitter_radius: config.heatmap.jitter_radius,
            engine: RecommendationEngine::new(config.thresholds(), config.recommendation.aggregation),
            rng_seed: config.forecast.rng_seed,
        }
    }

    fn sample_policy(&self, granularity: Granularity) -> HeatSamplePolicy {
        match granularity {
            Granularity::Yearly => self.yearly_samples,
            Granularity::Monthly => self.monthly_samples,
        }
    }
}

/// Forecast service
#[derive(Clone)]
pub struct ForecastService {
    model: ModelHandle,
    conditions: ConditionsService,
    renderer: Option<Arc<dyn ArtifactRenderer>>,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(
        model: ModelHandle,
        conditions: ConditionsService,
        renderer: Option<Arc<dyn ArtifactRenderer>>,
        settings: ForecastSettings,
    ) -> Self {
        Self {
            model,
            conditions,
            renderer,
            settings,
        }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    fn rng(&self) -> StdRng {
        match self.settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Run the full pipeline for one request
    pub async fn predict(&self, request: &ForecastRequest) -> AppResult<ForecastResponse> {
        let region = request.region()?;
        request.validate()?;
        let horizon = self.settings.horizon.build(&request.horizon_spec()?)?;
        tracing::debug!(
            "Forecasting {} over {} {:?} steps from {}",
            region,
            horizon.len(),
            horizon.granularity(),
            horizon.first()
        );

        let model = self.model.model()?;
        let conditions = self.conditions.current(region).await?;

        let mut rng = self.rng();
        let series = self
            .settings
            .generator
            .generate(&**model, &conditions, &horizon, &mut rng)
            .await?;

        let samples = synthesize(
            region.coordinates(),
            &series,
            self.settings.sample_policy(horizon.granularity()),
            self.settings.jitter_radius,
            &mut rng,
        );

        let recommendation = self.settings.engine.recommend(
            &series,
            conditions.precipitation_mm,
            conditions.humidity_percent,
        );
        tracing::debug!("Recommended {} for {}", recommendation.crop, region);

        let artifacts = self
            .renderer
            .as_ref()
            .map(|renderer| renderer.render(region, &series, &samples))
            .transpose()?;

        Ok(ForecastResponse::assemble(
            region,
            &horizon,
            &series,
            samples,
            recommendation,
            conditions,
            artifacts,
        ))
    }
}
