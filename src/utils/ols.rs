//! Ordinary least squares on column slices.
//!
//! Used by the ARCH-LM auxiliary regression (squared residuals on their
//! own lags) and by the ADF regression augmentation.

use crate::error::{PipelineError, Result};
use crate::utils::stats::mean;

/// Fitted OLS regression with an intercept.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Intercept term.
    pub intercept: f64,
    /// Slope coefficients, one per regressor column.
    pub coefficients: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Total sum of squares around the mean of `y`.
    pub tss: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Standard errors: intercept first, then one per coefficient.
    pub standard_errors: Vec<f64>,
    /// Number of observations used.
    pub nobs: usize,
}

/// Fit `y = intercept + sum(coef_j * x_j)` over column regressors.
///
/// Solves the normal equations with a Cholesky decomposition, with a
/// small ridge term on the diagonal for numerical stability.
pub fn ols_fit(y: &[f64], columns: &[&[f64]]) -> Result<OlsFit> {
    let n = y.len();
    let k = columns.len();

    if n == 0 {
        return Err(PipelineError::InsufficientData { needed: 1, got: 0 });
    }
    for col in columns {
        if col.len() != n {
            return Err(PipelineError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }
    if n <= k + 1 {
        return Err(PipelineError::InsufficientData {
            needed: k + 2,
            got: n,
        });
    }

    // Normal equations over the design [1, x_1, ..., x_k]
    let p = k + 1;
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];

    for obs in 0..n {
        xtx[0][0] += 1.0;
        for j in 0..k {
            let xj = columns[j][obs];
            xtx[0][j + 1] += xj;
            xtx[j + 1][0] += xj;
            for i in 0..k {
                xtx[i + 1][j + 1] += columns[i][obs] * xj;
            }
        }
        xty[0] += y[obs];
        for i in 0..k {
            xty[i + 1] += columns[i][obs] * y[obs];
        }
    }

    for i in 0..p {
        xtx[i][i] += 1e-8;
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        PipelineError::InvalidParameter("OLS normal equations are not positive definite".into())
    })?;

    let intercept = beta[0];
    let coefficients = beta[1..].to_vec();

    let mut rss = 0.0;
    for obs in 0..n {
        let mut fitted = intercept;
        for j in 0..k {
            fitted += coefficients[j] * columns[j][obs];
        }
        rss += (y[obs] - fitted).powi(2);
    }

    let y_mean = mean(y);
    let tss: f64 = y.iter().map(|&v| (v - y_mean).powi(2)).sum();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };

    // Coefficient standard errors from the diagonal of sigma2 * (X'X)^-1,
    // one solve per unit vector.
    let sigma2 = rss / (n - p) as f64;
    let mut standard_errors = Vec::with_capacity(p);
    for j in 0..p {
        let mut unit = vec![0.0; p];
        unit[j] = 1.0;
        let inv_col = solve_symmetric(&xtx, &unit).ok_or_else(|| {
            PipelineError::InvalidParameter(
                "OLS normal equations are not positive definite".into(),
            )
        })?;
        standard_errors.push((sigma2 * inv_col[j]).max(0.0).sqrt());
    }

    Ok(OlsFit {
        intercept,
        coefficients,
        rss,
        tss,
        r_squared,
        standard_errors,
        nobs: n,
    })
}

/// Solve `A x = b` for symmetric positive definite `A` via Cholesky.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
