//! Shared types and models for the Climate Advisor platform
//!
//! This crate contains the pure forecasting domain shared between the backend,
//! the browser client (via WASM), and the test suites. Nothing in here performs I/O.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
