//! Business logic services for the Climate Advisor platform

pub mod conditions;
pub mod forecast;
pub mod response;

pub use conditions::ConditionsService;
pub use forecast::{FluctuationBands, ForecastSeriesGenerator, ForecastService, ForecastSettings};
pub use response::{ForecastResponse, RecommendationSummary};
