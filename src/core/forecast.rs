//! Forecast value object.

use crate::core::Period;

/// Point forecasts with confidence intervals for a fixed horizon.
///
/// Produced by [`crate::models::ArmaFit::forecast`]; the presentation
/// layer renders it, the pipeline treats it as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Period each step refers to, continuing the fitted series.
    pub periods: Vec<Period>,
    /// Forecast means, one per step.
    pub mean: Vec<f64>,
    /// Lower interval bound per step.
    pub lower: Vec<f64>,
    /// Upper interval bound per step.
    pub upper: Vec<f64>,
    /// Confidence level of the intervals, e.g. 0.95.
    pub level: f64,
}

impl Forecast {
    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.mean.len()
    }
}
