//! Statistical validation: stationarity, residual diagnostics,
//! seasonality.
//!
//! # Example
//!
//! ```
//! use hpi_diagnostics::validation::{adf_test, ljung_box_battery, LJUNG_BOX_LAGS};
//!
//! let series: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
//! let adf = adf_test(&series).unwrap();
//! println!("ADF statistic {:.3}, p-value {:.3}", adf.statistic, adf.p_value);
//!
//! let residuals: Vec<f64> = (0..40).map(|i| ((i * 17 + 3) % 13) as f64 / 13.0 - 0.5).collect();
//! let battery = ljung_box_battery(&residuals, &LJUNG_BOX_LAGS, 2).unwrap();
//! if battery.no_autocorrelation {
//!     println!("residuals look like white noise");
//! }
//! ```

pub mod seasonality;
pub mod stationarity;

pub use residual_tests::{
    arch_lm, jarque_bera, ljung_box, ljung_box_battery, residual_moments, ArchTestResult,
    JarqueBeraResult, LjungBoxBattery, LjungBoxResult, ResidualMoments, ARCH_LAGS,
    LJUNG_BOX_LAGS,
};
pub use seasonality::{
    seasonality_scan, SeasonalityScan, MAX_SCAN_LAG, SEASONAL_ACF_THRESHOLD,
    SEASONAL_CANDIDATE_LAGS,
};
pub use stationarity::{adf_test, AdfReport, CriticalValues, MIN_ADF_OBSERVATIONS};
