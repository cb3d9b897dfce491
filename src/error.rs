//! Error types for the hpi-diagnostics library.

use crate::core::Period;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the diagnostic pipeline.
///
/// Every variant is recoverable at the caller: a failed stage never
/// aborts the process, and independent stages may still succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// No usable observations remain after dropping missing values.
    #[error("series is empty after dropping missing values")]
    EmptySeries,

    /// Input is too short for the requested computation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The optimizer failed to fit the model.
    #[error("ARMA fit did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Periods are not strictly increasing (duplicate or out of order).
    #[error("period {period} breaks strict chronological order")]
    OutOfOrder { period: Period },

    /// The data loader has no series for the requested measure.
    #[error("no series available for measure '{0}'")]
    MeasureNotFound(String),

    /// Paired inputs disagree in length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Period;

    #[test]
    fn error_messages_are_descriptive() {
        let err = PipelineError::EmptySeries;
        assert_eq!(
            err.to_string(),
            "series is empty after dropping missing values"
        );

        let err = PipelineError::InsufficientData { needed: 10, got: 7 };
        assert_eq!(err.to_string(), "insufficient data: need at least 10, got 7");

        let err = PipelineError::NonConvergence { iterations: 1000 };
        assert_eq!(
            err.to_string(),
            "ARMA fit did not converge after 1000 iterations"
        );

        let err = PipelineError::OutOfOrder {
            period: Period::new(2021, 3).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "period 2021Q3 breaks strict chronological order"
        );

        let err = PipelineError::MeasureNotFound("total".to_string());
        assert_eq!(err.to_string(), "no series available for measure 'total'");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = PipelineError::EmptySeries;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
