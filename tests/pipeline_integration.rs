//! End-to-end tests of the diagnostic pipeline on quarterly series.

use hpi_diagnostics::core::{Period, Series};
use hpi_diagnostics::error::PipelineError;
use hpi_diagnostics::models::Arma11;
use hpi_diagnostics::pipeline::{Pipeline, MIN_SERIES_LEN, VALIDATION_HORIZON};
use hpi_diagnostics::source::{MeasureId, MemorySource, SeriesSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn quarterly(values: Vec<f64>) -> Series {
    Series::from_start(Period::new(2015, 1).unwrap(), values).unwrap()
}

/// Twelve quarters of a gently trending index.
fn index_series() -> Series {
    quarterly(vec![
        100.0, 102.0, 101.0, 105.0, 107.0, 108.0, 110.0, 109.0, 112.0, 115.0, 118.0, 120.0,
    ])
}

/// Longer AR(1)-flavored series with seeded noise.
fn noisy_series(n: usize, seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(n);
    let mut level = 100.0_f64;
    for _ in 0..n {
        level = 100.0 + 0.6 * (level - 100.0) + rng.gen_range(-1.5..1.5);
        values.push(level);
    }
    quarterly(values)
}

#[test]
fn full_report_on_index_series() {
    let mut pipeline = Pipeline::new();
    let report = pipeline.report(&index_series()).unwrap();

    // Stage A ran and reported every field.
    assert!(report.stationarity.p_value.is_nan() || (0.0..=1.0).contains(&report.stationarity.p_value));
    assert!(report.stationarity.critical_values.cv_1pct < report.stationarity.critical_values.cv_10pct);

    // Stage B coefficients stayed inside the optimizer's box.
    assert!(report.model.ar_coefficient.abs() <= 0.99);
    assert!(report.model.ma_coefficient.abs() <= 0.99);
    assert!(report.model.aic.is_finite());
    assert!(report.model.bic >= report.model.aic);

    // Stage D moduli are consistent with the coefficients.
    assert_eq!(
        report.stability.is_stable,
        report.stability.ar_modulus > 1.0
    );
    assert_eq!(
        report.stability.is_invertible,
        report.stability.ma_modulus > 1.0
    );

    // The scan covers the original series, not the residuals.
    assert_eq!(report.seasonality.acf[0], 1.0);
}

#[test]
fn validation_holds_out_the_last_year() {
    let mut pipeline = Pipeline::new();
    let series = index_series();
    let validation = pipeline.validate_forecast(&series).unwrap();

    assert_eq!(validation.train_len + validation.test_len, series.len());
    assert_eq!(validation.test_len, VALIDATION_HORIZON);
    assert_eq!(validation.actuals, series.values()[8..].to_vec());
    assert_eq!(validation.forecast.periods, series.periods()[8..].to_vec());

    assert!(validation.accuracy.rmse.is_finite());
    assert!(validation.accuracy.rmse >= validation.accuracy.mae);
    assert_eq!(validation.accuracy.errors.len(), VALIDATION_HORIZON);

    // Intervals bracket the point forecasts.
    for i in 0..VALIDATION_HORIZON {
        assert!(validation.forecast.lower[i] <= validation.forecast.mean[i]);
        assert!(validation.forecast.mean[i] <= validation.forecast.upper[i]);
    }
}

#[test]
fn percentage_error_is_undefined_on_zero_actuals() {
    let mut pipeline = Pipeline::new();
    // The last held-out actual is exactly zero.
    let series = quarterly(vec![
        5.0, 4.0, 6.0, 5.0, 7.0, 6.0, 8.0, 7.0, 6.0, 5.0, 4.0, 0.0,
    ]);

    let validation = pipeline.validate_forecast(&series).unwrap();
    let pct = &validation.accuracy.percentage_errors;

    assert_eq!(pct.len(), 4);
    assert!(pct[3].is_none());
    assert!(pct[..3].iter().all(|e| e.is_some()));
    // RMSE and MAE are unaffected by the undefined point.
    assert!(validation.accuracy.rmse.is_finite());
}

#[test]
fn refit_on_identical_series_is_a_cache_hit() {
    let mut pipeline = Pipeline::new();
    let series = noisy_series(40, 7);

    let first = pipeline.fit(&series).unwrap();
    pipeline.report(&series).unwrap();
    pipeline.residual_diagnostics(&series).unwrap();
    let last = pipeline.fit(&series).unwrap();

    assert_eq!(pipeline.cached_fits(), 1);
    assert!(Arc::ptr_eq(&first, &last));
}

#[test]
fn train_refit_is_deterministic() {
    let series = noisy_series(32, 11);
    let (train, _) = series
        .split_for_validation(VALIDATION_HORIZON, MIN_SERIES_LEN - VALIDATION_HORIZON)
        .unwrap();

    let mut pipeline = Pipeline::new();
    let validation = pipeline.validate_forecast(&series).unwrap();
    let standalone = Arma11::new().fit(&train).unwrap();

    assert_eq!(validation.model.ar_coefficient, standalone.ar_coefficient());
    assert_eq!(validation.model.ma_coefficient, standalone.ma_coefficient());
    assert_eq!(validation.model.log_likelihood, standalone.log_likelihood());
}

#[test]
fn constant_series_runs_without_panicking() {
    let mut pipeline = Pipeline::new();
    let series = quarterly(vec![250.0; 20]);

    let report = pipeline.report(&series).unwrap();
    assert!(!report.stationarity.is_stationary);
    assert!(report.residuals.moments.skewness.is_nan());

    let validation = pipeline.validate_forecast(&series).unwrap();
    assert!(validation.accuracy.rmse.is_finite());
}

#[test]
fn short_series_reports_the_shortfall() {
    let mut pipeline = Pipeline::new();
    let series = quarterly(vec![100.0, 101.0, 103.0]);

    let err = pipeline.report(&series).unwrap_err();
    assert_eq!(
        err,
        PipelineError::InsufficientData { needed: 10, got: 3 }
    );
}

#[test]
fn seasonal_series_is_flagged_at_its_period() {
    let mut pipeline = Pipeline::new();
    let values: Vec<f64> = (0..48)
        .map(|i| 100.0 + 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 4.0).cos())
        .collect();
    let series = quarterly(values);

    let scan = pipeline.seasonality(&series).unwrap();
    assert!(scan.is_seasonal());
    assert!(scan.flagged_lags.contains(&4));
    assert_eq!(scan.implied_period, Some(4));
}

#[test]
fn source_feeds_the_pipeline_by_measure_key() {
    let mut source = MemorySource::new();
    source.insert(MeasureId::new("hpi_bogota_total"), index_series());

    let series = source.load(&MeasureId::new("hpi_bogota_total")).unwrap();
    let mut pipeline = Pipeline::new();
    assert!(pipeline.report(&series).is_ok());

    let missing = source.load(&MeasureId::new("hpi_medellin_total"));
    assert!(matches!(missing, Err(PipelineError::MeasureNotFound(_))));
}

#[test]
fn white_noise_residuals_pass_the_battery() {
    let mut pipeline = Pipeline::new();
    let series = noisy_series(80, 3);

    let diag = pipeline.residual_diagnostics(&series).unwrap();
    let battery = diag.ljung_box.unwrap();

    // All five candidate lags fit a 79-residual sample.
    assert_eq!(battery.results.len(), 5);
    for result in &battery.results {
        assert!((0.0..=1.0).contains(&result.p_value));
        assert!(result.statistic >= 0.0);
    }

    let jb = diag.jarque_bera.unwrap();
    assert!(jb.statistic >= 0.0);
    let arch = diag.arch.unwrap();
    assert!((0.0..=1.0).contains(&arch.lm_p_value));
}
