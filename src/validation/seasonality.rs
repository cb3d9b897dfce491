//! Seasonality scan on the original series (Stage C).
//!
//! Quarterly data repeats on multiples of 4 lags; the scan flags the
//! annual-cycle candidates the ACF supports.

use crate::core::Series;
use crate::utils::stats::{acf, pacf};

/// Lags inspected for a quarterly seasonal cycle.
pub const SEASONAL_CANDIDATE_LAGS: [usize; 5] = [4, 8, 12, 16, 20];

/// ACF magnitude above which a candidate lag is flagged.
pub const SEASONAL_ACF_THRESHOLD: f64 = 0.3;

/// Highest lag the autocorrelation functions are computed to.
pub const MAX_SCAN_LAG: usize = 24;

/// Outcome of the seasonality scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityScan {
    /// Autocorrelation function, lags 0..=24 (shorter for short series).
    pub acf: Vec<f64>,
    /// Partial autocorrelation function over the same lags.
    pub pacf: Vec<f64>,
    /// Candidate lags whose |acf| exceeds the threshold.
    pub flagged_lags: Vec<usize>,
    /// Smallest flagged lag, the implied seasonal period in quarters.
    pub implied_period: Option<usize>,
}

impl SeasonalityScan {
    /// True when any candidate lag was flagged, suggesting a seasonal
    /// model would fit better than plain ARMA.
    pub fn is_seasonal(&self) -> bool {
        self.implied_period.is_some()
    }
}

/// Scan the original series for a quarterly seasonal pattern.
pub fn seasonality_scan(series: &Series) -> SeasonalityScan {
    let values = series.values();
    let acf_values = acf(values, MAX_SCAN_LAG);
    let pacf_values = pacf(values, MAX_SCAN_LAG);

    let flagged_lags: Vec<usize> = SEASONAL_CANDIDATE_LAGS
        .iter()
        .copied()
        .filter(|&lag| {
            acf_values
                .get(lag)
                .is_some_and(|r| r.abs() > SEASONAL_ACF_THRESHOLD)
        })
        .collect();

    let implied_period = flagged_lags.first().copied();

    SeasonalityScan {
        acf: acf_values,
        pacf: pacf_values,
        flagged_lags,
        implied_period,
    }
}
