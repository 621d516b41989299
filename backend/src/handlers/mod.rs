//! HTTP request handlers

pub mod health;
pub mod prediction;
pub mod regions;

pub use health::health_check;
pub use prediction::predict;
pub use regions::list_regions;
