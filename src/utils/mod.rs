//! Shared numerics: moments, regression, optimization, accuracy metrics.

pub mod metrics;
pub mod ols;
pub mod optimization;
pub mod stats;

pub use metrics::{forecast_accuracy, ForecastAccuracy};
pub use ols::{ols_fit, OlsFit};
pub use optimization::{minimize, SimplexOptions, SimplexResult};
