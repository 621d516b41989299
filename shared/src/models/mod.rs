//! Domain models for the Climate Advisor platform

mod conditions;
mod forecast;
mod heatmap;
mod horizon;
mod recommendation;
mod region;
mod request;

pub use conditions::*;
pub use forecast::*;
pub use heatmap::*;
pub use horizon::*;
pub use recommendation::*;
pub use region::*;
pub use request::*;
