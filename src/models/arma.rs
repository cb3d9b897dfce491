//! ARMA(1,1) model with constant, fitted by conditional least squares.
//!
//! The pipeline fits this one fixed-order model regardless of the
//! stationarity verdict; order selection is deliberately out of scope.

use crate::core::{Forecast, Period, Series};
use crate::error::{PipelineError, Result};
use crate::utils::optimization::{minimize, SimplexOptions};
use statrs::distribution::{ContinuousCDF, Normal};

/// Model order. Fixed at one AR lag and one MA lag plus a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArmaSpec {
    /// AR order.
    pub p: usize,
    /// MA order.
    pub q: usize,
}

impl ArmaSpec {
    /// Number of estimated parameters (AR + MA + intercept).
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }
}

impl Default for ArmaSpec {
    fn default() -> Self {
        Self { p: 1, q: 1 }
    }
}

/// Stability and invertibility of a fitted model, from the
/// characteristic roots of its AR and MA polynomials.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityReport {
    /// Root of 1 - phi*z (infinite when phi is zero).
    pub ar_root: f64,
    /// Root of 1 + theta*z (infinite when theta is zero).
    pub ma_root: f64,
    /// |ar_root|.
    pub ar_modulus: f64,
    /// |ma_root|.
    pub ma_modulus: f64,
    /// All AR root moduli strictly outside the unit circle.
    pub is_stable: bool,
    /// All MA root moduli strictly outside the unit circle.
    pub is_invertible: bool,
}

/// ARMA(1,1) estimator.
///
/// Parameters are estimated by minimizing the conditional sum of
/// squares with a bounded Nelder-Mead search. The fit is a pure
/// function of the input values, so identical series produce identical
/// coefficients.
#[derive(Debug, Clone, Default)]
pub struct Arma11 {
    options: SimplexOptions,
}

impl Arma11 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SimplexOptions) -> Self {
        Self { options }
    }

    /// Fit the model to a series.
    ///
    /// Returns [`PipelineError::NonConvergence`] when the simplex search
    /// exhausts its iteration budget without collapsing.
    pub fn fit(&self, series: &Series) -> Result<ArmaFit> {
        let values = series.values();
        let n = values.len();
        // One AR lag consumes one observation; two more are the bare
        // minimum for the optimizer to see any curvature.
        if n < 3 {
            return Err(PipelineError::InsufficientData { needed: 3, got: n });
        }

        let mean = series.mean();
        let initial = [mean, 0.1, 0.1];
        let bounds = [
            (f64::NEG_INFINITY, f64::INFINITY),
            (-0.99, 0.99),
            (-0.99, 0.99),
        ];

        let result = minimize(
            |params| css(values, params[0], params[1], params[2]),
            &initial,
            Some(&bounds),
            &self.options,
        );

        if !result.converged {
            return Err(PipelineError::NonConvergence {
                iterations: result.iterations,
            });
        }

        let intercept = result.point[0];
        let phi = result.point[1];
        let theta = result.point[2];

        let residuals = conditional_residuals(values, intercept, phi, theta);
        let n_eff = residuals.len() as f64;
        let sigma2 = residuals.iter().map(|e| e * e).sum::<f64>() / n_eff;

        // Gaussian log-likelihood at the CSS optimum. A degenerate
        // (near-constant) series keeps this finite instead of hitting
        // ln(0).
        let sigma2_safe = sigma2.max(f64::MIN_POSITIVE);
        let log_likelihood =
            -0.5 * n_eff * (1.0 + sigma2_safe.ln() + (2.0 * std::f64::consts::PI).ln());

        let k = ArmaSpec::default().num_params() as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n_eff.ln();

        Ok(ArmaFit {
            spec: ArmaSpec::default(),
            phi,
            theta,
            intercept,
            sigma2,
            log_likelihood,
            aic,
            bic,
            residuals,
            last_value: values[n - 1],
            last_period: series.periods()[n - 1],
            n,
        })
    }
}

/// Conditional sum of squares for ARMA(1,1) with constant.
fn css(values: &[f64], intercept: f64, phi: f64, theta: f64) -> f64 {
    let mut prev_residual = 0.0;
    let mut total = 0.0;
    for t in 1..values.len() {
        let pred = intercept + phi * (values[t - 1] - intercept) + theta * prev_residual;
        let error = values[t] - pred;
        total += error * error;
        prev_residual = error;
    }
    total
}

/// Residual series for given parameters, one point per observation
/// after the first (the AR lag eats the leading point).
fn conditional_residuals(values: &[f64], intercept: f64, phi: f64, theta: f64) -> Vec<f64> {
    let mut residuals = Vec::with_capacity(values.len() - 1);
    let mut prev_residual = 0.0;
    for t in 1..values.len() {
        let pred = intercept + phi * (values[t - 1] - intercept) + theta * prev_residual;
        let error = values[t] - pred;
        residuals.push(error);
        prev_residual = error;
    }
    residuals
}

/// A fitted ARMA(1,1) model.
#[derive(Debug, Clone)]
pub struct ArmaFit {
    spec: ArmaSpec,
    phi: f64,
    theta: f64,
    intercept: f64,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    residuals: Vec<f64>,
    last_value: f64,
    last_period: Period,
    n: usize,
}

impl ArmaFit {
    /// Model order.
    pub fn spec(&self) -> ArmaSpec {
        self.spec
    }

    /// AR(1) coefficient.
    pub fn ar_coefficient(&self) -> f64 {
        self.phi
    }

    /// MA(1) coefficient.
    pub fn ma_coefficient(&self) -> f64 {
        self.theta
    }

    /// Constant term.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Residual variance.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Gaussian log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        self.aic
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// In-sample residuals, length `n - 1`, aligned to the input's
    /// trailing subsequence.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Length of the fitted series.
    pub fn nobs(&self) -> usize {
        self.n
    }

    /// Root of the AR polynomial `1 - phi*z`.
    pub fn ar_root(&self) -> f64 {
        if self.phi == 0.0 {
            f64::INFINITY
        } else {
            1.0 / self.phi
        }
    }

    /// Root of the MA polynomial `1 + theta*z`.
    pub fn ma_root(&self) -> f64 {
        if self.theta == 0.0 {
            f64::INFINITY
        } else {
            -1.0 / self.theta
        }
    }

    /// Root moduli and the strict stability/invertibility verdicts.
    ///
    /// A root exactly on the unit circle fails both conditions.
    pub fn stability(&self) -> StabilityReport {
        let ar_root = self.ar_root();
        let ma_root = self.ma_root();
        let ar_modulus = ar_root.abs();
        let ma_modulus = ma_root.abs();
        StabilityReport {
            ar_root,
            ma_root,
            ar_modulus,
            ma_modulus,
            is_stable: ar_modulus > 1.0,
            is_invertible: ma_modulus > 1.0,
        }
    }

    /// H-step-ahead forecast with symmetric confidence intervals.
    ///
    /// Interval widths come from the psi-weight representation of the
    /// forecast-error variance, with the normal quantile at `level`.
    pub fn forecast(&self, horizon: usize, level: f64) -> Result<Forecast> {
        if !(0.0..1.0).contains(&level) {
            return Err(PipelineError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {level}"
            )));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| PipelineError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf((1.0 + level) / 2.0);

        let last_residual = self.residuals.last().copied().unwrap_or(0.0);

        let mut periods = Vec::with_capacity(horizon);
        let mut mean = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        let mut period = self.last_period;
        let mut prev = self.last_value;
        // psi_0 = 1, psi_j = phi^(j-1) * (phi + theta) for j >= 1
        let mut psi_sq_sum = 1.0;
        let mut psi = self.phi + self.theta;

        for step in 0..horizon {
            let pred = if step == 0 {
                // The final observed residual still feeds the first step.
                self.intercept
                    + self.phi * (prev - self.intercept)
                    + self.theta * last_residual
            } else {
                self.intercept + self.phi * (prev - self.intercept)
            };

            let se = (self.sigma2 * psi_sq_sum).sqrt();
            period = period.next();

            periods.push(period);
            mean.push(pred);
            lower.push(pred - z * se);
            upper.push(pred + z * se);

            prev = pred;
            psi_sq_sum += psi * psi;
            psi *= self.phi;
        }

        Ok(Forecast {
            periods,
            mean,
            lower,
            upper,
            level,
        })
    }
}
