//! Pipeline orchestration and memoization.
//!
//! Each stage is a pure function of the series (or of a fitted model),
//! so the caller can compute only what its current view needs. Fits
//! are memoized by (series fingerprint, model order): refitting an
//! identical series is a cache hit, never a second optimization.

use crate::core::{Forecast, Series};
use crate::error::{PipelineError, Result};
use crate::models::{Arma11, ArmaFit, ArmaSpec, StabilityReport};
use crate::utils::metrics::{forecast_accuracy, ForecastAccuracy};
use crate::validation::residual_tests::{
    arch_lm, jarque_bera, ljung_box_battery, residual_moments, ArchTestResult,
    JarqueBeraResult, LjungBoxBattery, ResidualMoments, ARCH_LAGS, LJUNG_BOX_LAGS,
};
use crate::validation::seasonality::{seasonality_scan, SeasonalityScan};
use crate::validation::stationarity::{adf_test, AdfReport};
use std::collections::HashMap;
use std::sync::Arc;

/// Minimum usable series length. Below this the later stages (20-lag
/// Ljung-Box, 4-lag ARCH) stop being numerically meaningful.
pub const MIN_SERIES_LEN: usize = 10;

/// Held-out points for forecast validation (one year of quarters).
pub const VALIDATION_HORIZON: usize = 4;

/// Confidence level of forecast intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Presentation-facing digest of a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    /// Model order.
    pub spec: ArmaSpec,
    /// AR(1) coefficient.
    pub ar_coefficient: f64,
    /// MA(1) coefficient.
    pub ma_coefficient: f64,
    /// Constant term.
    pub intercept: f64,
    /// Gaussian log-likelihood.
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
}

impl From<&ArmaFit> for ModelSummary {
    fn from(fit: &ArmaFit) -> Self {
        Self {
            spec: fit.spec(),
            ar_coefficient: fit.ar_coefficient(),
            ma_coefficient: fit.ma_coefficient(),
            intercept: fit.intercept(),
            log_likelihood: fit.log_likelihood(),
            aic: fit.aic(),
            bic: fit.bic(),
        }
    }
}

/// The residual diagnostic battery.
///
/// Tests fail independently: a lag set the sample cannot support marks
/// only that test, the rest still report.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualDiagnostics {
    /// Descriptive moments of the residuals.
    pub moments: ResidualMoments,
    /// Ljung-Box over lags {4, 8, 12, 16, 20}.
    pub ljung_box: Result<LjungBoxBattery>,
    /// Jarque-Bera normality test.
    pub jarque_bera: Result<JarqueBeraResult>,
    /// ARCH-LM heteroscedasticity test at lag 4.
    pub arch: Result<ArchTestResult>,
}

/// Held-out forecast validation (Stage E).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastValidation {
    /// Training observations used for the refit.
    pub train_len: usize,
    /// Held-out observations.
    pub test_len: usize,
    /// Forecast over the held-out periods, with intervals.
    pub forecast: Forecast,
    /// Actual values over the held-out periods.
    pub actuals: Vec<f64>,
    /// RMSE, MAE and the per-point error table.
    pub accuracy: ForecastAccuracy,
    /// Summary of the train-only refit.
    pub model: ModelSummary,
}

/// Aggregate report over stages A through D plus the seasonality scan.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    /// Stage A: ADF stationarity test.
    pub stationarity: AdfReport,
    /// Stage B: fitted model digest.
    pub model: ModelSummary,
    /// Stage C: residual battery.
    pub residuals: ResidualDiagnostics,
    /// Stage C: seasonality scan of the original series.
    pub seasonality: SeasonalityScan,
    /// Stage D: root moduli and verdicts.
    pub stability: StabilityReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: u64,
    spec: ArmaSpec,
}

/// The diagnostic pipeline.
///
/// Owns the estimator and the fit cache. Single-threaded by design:
/// every computation runs to completion before its result is used.
#[derive(Debug, Default)]
pub struct Pipeline {
    estimator: Arma11,
    cache: HashMap<CacheKey, Arc<ArmaFit>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_usable(series: &Series) -> Result<()> {
        if series.len() < MIN_SERIES_LEN {
            return Err(PipelineError::InsufficientData {
                needed: MIN_SERIES_LEN,
                got: series.len(),
            });
        }
        Ok(())
    }

    /// Stage A: ADF stationarity test.
    ///
    /// The verdict is informational; fitting proceeds regardless.
    pub fn stationarity(&self, series: &Series) -> Result<AdfReport> {
        Self::ensure_usable(series)?;
        adf_test(series.values())
    }

    /// Stage B: fit ARMA(1,1), memoized by series content.
    pub fn fit(&mut self, series: &Series) -> Result<Arc<ArmaFit>> {
        Self::ensure_usable(series)?;
        self.fit_unchecked(series)
    }

    /// Fit without the pipeline length gate; used for the train refit,
    /// whose length is validated by the split.
    fn fit_unchecked(&mut self, series: &Series) -> Result<Arc<ArmaFit>> {
        let key = CacheKey {
            fingerprint: series.fingerprint(),
            spec: ArmaSpec::default(),
        };
        if let Some(fit) = self.cache.get(&key) {
            return Ok(Arc::clone(fit));
        }
        let fit = Arc::new(self.estimator.fit(series)?);
        self.cache.insert(key, Arc::clone(&fit));
        Ok(fit)
    }

    /// Stage C: residual battery for the full-sample fit.
    pub fn residual_diagnostics(&mut self, series: &Series) -> Result<ResidualDiagnostics> {
        let fit = self.fit(series)?;
        Ok(Self::diagnostics_for(&fit))
    }

    fn diagnostics_for(fit: &ArmaFit) -> ResidualDiagnostics {
        let residuals = fit.residuals();
        ResidualDiagnostics {
            moments: residual_moments(residuals),
            // df = lag at every tested lag; pass the model order to
            // `ljung_box` directly for the Box-Jenkins adjustment.
            ljung_box: ljung_box_battery(residuals, &LJUNG_BOX_LAGS, 0),
            jarque_bera: jarque_bera(residuals),
            arch: arch_lm(residuals, ARCH_LAGS),
        }
    }

    /// Stage C: seasonality scan of the original series (not the
    /// residuals).
    pub fn seasonality(&self, series: &Series) -> Result<SeasonalityScan> {
        Self::ensure_usable(series)?;
        Ok(seasonality_scan(series))
    }

    /// Stage D: stability and invertibility of the full-sample fit.
    pub fn stability(&mut self, series: &Series) -> Result<StabilityReport> {
        let fit = self.fit(series)?;
        Ok(fit.stability())
    }

    /// Stage E: hold out the last [`VALIDATION_HORIZON`] points, refit
    /// on the rest and score the forecast.
    ///
    /// Independent of the full-sample fit; a zero actual leaves that
    /// point's percentage error undefined without failing the stage.
    pub fn validate_forecast(&mut self, series: &Series) -> Result<ForecastValidation> {
        Self::ensure_usable(series)?;

        let min_train = MIN_SERIES_LEN - VALIDATION_HORIZON;
        let (train, test) = series.split_for_validation(VALIDATION_HORIZON, min_train)?;

        let fit = self.fit_unchecked(&train)?;
        let forecast = fit.forecast(VALIDATION_HORIZON, CONFIDENCE_LEVEL)?;
        let accuracy = forecast_accuracy(test.values(), &forecast.mean)?;

        Ok(ForecastValidation {
            train_len: train.len(),
            test_len: test.len(),
            forecast,
            actuals: test.values().to_vec(),
            accuracy,
            model: ModelSummary::from(fit.as_ref()),
        })
    }

    /// Full battery: stages A through D plus the seasonality scan.
    pub fn report(&mut self, series: &Series) -> Result<DiagnosticReport> {
        Self::ensure_usable(series)?;

        let stationarity = self.stationarity(series)?;
        let fit = self.fit(series)?;

        Ok(DiagnosticReport {
            stationarity,
            model: ModelSummary::from(fit.as_ref()),
            residuals: Self::diagnostics_for(&fit),
            seasonality: seasonality_scan(series),
            stability: fit.stability(),
        })
    }

    /// Number of distinct fits held by the cache.
    pub fn cached_fits(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached fits.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
