//! # hpi-diagnostics
//!
//! Time-series diagnostics for Colombian housing-price-index quarterly
//! series.
//!
//! Runs a fixed battery over a quarterly series: ADF stationarity test,
//! ARMA(1,1) estimation, residual diagnostics (Ljung-Box, Jarque-Bera,
//! ARCH-LM), seasonality scan, stability/invertibility checks and
//! held-out forecast validation. The [`pipeline::Pipeline`] ties the
//! stages together and memoizes fits.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod utils;
pub mod validation;

pub use error::{PipelineError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, Period, Series};
    pub use crate::error::{PipelineError, Result};
    pub use crate::models::{Arma11, ArmaFit, ArmaSpec, StabilityReport};
    pub use crate::pipeline::{DiagnosticReport, ForecastValidation, ModelSummary, Pipeline};
    pub use crate::source::{MeasureId, MemorySource, SeriesSource};
    pub use crate::utils::metrics::ForecastAccuracy;
    pub use crate::validation::{AdfReport, LjungBoxBattery, SeasonalityScan};
}
