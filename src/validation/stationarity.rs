//! Augmented Dickey-Fuller unit-root test (Stage A).
//!
//! The verdict is informational: the pipeline fits the fixed-order
//! ARMA(1,1) whatever the outcome.

use crate::error::{PipelineError, Result};
use crate::utils::ols::ols_fit;

/// Minimum series length for a meaningful ADF regression.
pub const MIN_ADF_OBSERVATIONS: usize = 10;

/// Critical values at the standard significance levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    /// 1% significance.
    pub cv_1pct: f64,
    /// 5% significance.
    pub cv_5pct: f64,
    /// 10% significance.
    pub cv_10pct: f64,
}

/// Result of the ADF test.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfReport {
    /// Test statistic (t-ratio on the lagged level).
    pub statistic: f64,
    /// Approximate p-value.
    pub p_value: f64,
    /// Augmentation lags used (AIC-selected).
    pub lags: usize,
    /// Observations entering the regression.
    pub nobs: usize,
    /// MacKinnon critical values for the constant-only case.
    pub critical_values: CriticalValues,
    /// True iff the unit-root null is rejected at 5% (p < 0.05).
    pub is_stationary: bool,
}

/// Augmented Dickey-Fuller test with constant, no trend.
///
/// Tests the null hypothesis that the series has a unit root; rejection
/// implies stationarity. The augmentation lag is chosen by AIC over
/// `0..=(n-1)^(1/3)` candidate lags.
///
/// A degenerate regression (e.g. a constant series) yields NaN
/// statistic and p-value rather than an error.
pub fn adf_test(series: &[f64]) -> Result<AdfReport> {
    let n = series.len();
    if n < MIN_ADF_OBSERVATIONS {
        return Err(PipelineError::InsufficientData {
            needed: MIN_ADF_OBSERVATIONS,
            got: n,
        });
    }

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let max_lags = (((n - 1) as f64).powf(1.0 / 3.0).floor() as usize).min(n / 2 - 1);

    // AIC over candidate augmentation lags.
    let mut best: Option<(usize, f64)> = None;
    for lag in 0..=max_lags {
        if let Some(aic) = regression_aic(&diff, series, lag) {
            if best.map_or(true, |(_, best_aic)| aic < best_aic) {
                best = Some((lag, aic));
            }
        }
    }
    let lags = best.map(|(lag, _)| lag).unwrap_or(0);

    let critical_values = CriticalValues {
        cv_1pct: -3.43,
        cv_5pct: -2.86,
        cv_10pct: -2.57,
    };

    let (statistic, nobs) = match df_regression(&diff, series, lags) {
        Some((t_stat, nobs)) => (t_stat, nobs),
        None => {
            return Ok(AdfReport {
                statistic: f64::NAN,
                p_value: f64::NAN,
                lags,
                nobs: 0,
                critical_values,
                is_stationary: false,
            })
        }
    };

    let p_value = adf_p_value(statistic);

    Ok(AdfReport {
        statistic,
        p_value,
        lags,
        nobs,
        critical_values,
        is_stationary: p_value < 0.05,
    })
}

/// Build the ADF design for a lag count: target is the differenced
/// series, regressors are the lagged level plus `lag` lagged differences.
fn build_design(diff: &[f64], level: &[f64], lag: usize) -> Option<(Vec<f64>, Vec<Vec<f64>>)> {
    let m = diff.len();
    if m <= lag + 2 {
        return None;
    }

    let y = diff[lag..].to_vec();
    let mut columns = Vec::with_capacity(lag + 1);
    // level[t-1] aligned with diff[t]
    columns.push(level[lag..m].to_vec());
    for j in 1..=lag {
        columns.push(diff[lag - j..m - j].to_vec());
    }
    Some((y, columns))
}

/// AIC of the ADF regression at a given lag, None when infeasible.
fn regression_aic(diff: &[f64], level: &[f64], lag: usize) -> Option<f64> {
    let (y, columns) = build_design(diff, level, lag)?;
    let refs: Vec<&[f64]> = columns.iter().map(|c| c.as_slice()).collect();
    let fit = ols_fit(&y, &refs).ok()?;

    let nobs = fit.nobs as f64;
    if fit.rss <= 0.0 {
        return None;
    }
    let k = (lag + 2) as f64;
    Some(nobs * (fit.rss / nobs).ln() + 2.0 * k)
}

/// The t-ratio on the lagged level and the regression sample size.
fn df_regression(diff: &[f64], level: &[f64], lag: usize) -> Option<(f64, usize)> {
    let (y, columns) = build_design(diff, level, lag)?;
    let refs: Vec<&[f64]> = columns.iter().map(|c| c.as_slice()).collect();
    let fit = ols_fit(&y, &refs).ok()?;

    let beta = fit.coefficients[0];
    let se = fit.standard_errors[1];
    if !se.is_finite() || se <= 0.0 {
        return None;
    }
    Some((beta / se, fit.nobs))
}

/// Approximate p-value from the MacKinnon tau table for the
/// constant-only case.
fn adf_p_value(t_stat: f64) -> f64 {
    if t_stat.is_nan() {
        return f64::NAN;
    }

    if t_stat < -4.0 {
        0.001
    } else if t_stat < -3.43 {
        0.01
    } else if t_stat < -2.86 {
        0.05
    } else if t_stat < -2.57 {
        0.10
    } else if t_stat < -1.94 {
        0.20
    } else if t_stat < -1.62 {
        0.30
    } else if t_stat < -1.28 {
        0.40
    } else if t_stat < -0.84 {
        0.50
    } else if t_stat < 0.0 {
        0.70
    } else {
        0.90 + 0.05 * (1.0 - (-t_stat).exp())
    }
}
