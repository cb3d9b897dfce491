//! Forecast accuracy metrics.

use crate::error::{PipelineError, Result};

/// Held-out accuracy of a forecast against test actuals.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAccuracy {
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Per-point error (actual - forecast).
    pub errors: Vec<f64>,
    /// Per-point percentage error (actual - forecast) / actual * 100.
    /// `None` where the actual is exactly zero.
    pub percentage_errors: Vec<Option<f64>>,
}

/// Compare forecasts with actuals point by point.
///
/// A zero actual leaves that point's percentage error undefined rather
/// than failing the whole evaluation.
pub fn forecast_accuracy(actual: &[f64], predicted: &[f64]) -> Result<ForecastAccuracy> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(PipelineError::EmptySeries);
    }
    if actual.len() != predicted.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| a - p)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let percentage_errors: Vec<Option<f64>> = actual
        .iter()
        .zip(errors.iter())
        .map(|(&a, &e)| if a == 0.0 { None } else { Some(e / a * 100.0) })
        .collect();

    Ok(ForecastAccuracy {
        rmse,
        mae,
        errors,
        percentage_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_forecast_has_zero_error() {
        let actual = vec![100.0, 101.0, 102.0, 103.0];
        let acc = forecast_accuracy(&actual, &actual).unwrap();

        assert_relative_eq!(acc.rmse, 0.0);
        assert_relative_eq!(acc.mae, 0.0);
        assert!(acc.percentage_errors.iter().all(|p| p == &Some(0.0)));
    }

    #[test]
    fn known_errors() {
        let actual = vec![100.0, 200.0];
        let predicted = vec![110.0, 190.0];
        let acc = forecast_accuracy(&actual, &predicted).unwrap();

        assert_relative_eq!(acc.mae, 10.0);
        assert_relative_eq!(acc.rmse, 10.0);
        assert_eq!(acc.errors, vec![-10.0, 10.0]);
        assert_eq!(acc.percentage_errors[0], Some(-10.0));
        assert_relative_eq!(acc.percentage_errors[1].unwrap(), 5.0);
    }

    #[test]
    fn rmse_dominates_mae() {
        // Norm inequality: RMSE >= MAE for any error vector.
        let actual = vec![10.0, 20.0, 30.0, 40.0];
        let predicted = vec![12.0, 19.0, 35.0, 38.0];
        let acc = forecast_accuracy(&actual, &predicted).unwrap();

        assert!(acc.rmse >= acc.mae);
        assert!(acc.mae >= 0.0);
    }

    #[test]
    fn zero_actual_leaves_percentage_undefined() {
        let actual = vec![0.0, 50.0];
        let predicted = vec![1.0, 49.0];
        let acc = forecast_accuracy(&actual, &predicted).unwrap();

        assert_eq!(acc.percentage_errors[0], None);
        assert_relative_eq!(acc.percentage_errors[1].unwrap(), 2.0);
        // The aggregate metrics are still defined.
        assert!(acc.rmse.is_finite());
    }

    #[test]
    fn mismatched_lengths_rejected() {
        assert!(matches!(
            forecast_accuracy(&[1.0, 2.0], &[1.0]),
            Err(PipelineError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn empty_inputs_rejected() {
        assert!(matches!(
            forecast_accuracy(&[], &[]),
            Err(PipelineError::EmptySeries)
        ));
    }
}
