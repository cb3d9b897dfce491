//! Moment and autocorrelation primitives shared across pipeline stages.

/// Mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Skewness (adjusted Fisher-Pearson standardized third moment).
///
/// Returns NaN for fewer than 3 points or a zero-variance input.
pub fn skewness(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let m = mean(values);
    let s = std_dev(values);
    if !(s > 1e-10) {
        return f64::NAN;
    }

    let sum_cubed: f64 = values.iter().map(|x| ((x - m) / s).powi(3)).sum();
    (n / ((n - 1.0) * (n - 2.0))) * sum_cubed
}

/// Excess kurtosis (adjusted standardized fourth moment, normal = 0).
///
/// Returns NaN for fewer than 4 points or a zero-variance input.
pub fn kurtosis(values: &[f64]) -> f64 {
    if values.len() < 4 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let m = mean(values);
    let s = std_dev(values);
    if !(s > 1e-10) {
        return f64::NAN;
    }

    let sum_fourth: f64 = values.iter().map(|x| ((x - m) / s).powi(4)).sum();
    let k = (n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0))) * sum_fourth;
    k - (3.0 * (n - 1.0).powi(2)) / ((n - 2.0) * (n - 3.0))
}

/// Autocorrelation at a single lag.
///
/// Uses the biased estimator (denominator over the full sample), the
/// convention shared by the Ljung-Box statistic and ACF charts.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return f64::NAN;
    }

    let m = mean(values);
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &x) in values.iter().enumerate() {
        denominator += (x - m).powi(2);
        if i >= lag {
            numerator += (x - m) * (values[i - lag] - m);
        }
    }

    if denominator < 1e-10 {
        return 0.0;
    }

    numerator / denominator
}

/// Autocorrelation function for lags 0..=nlags (index 0 is always 1.0).
///
/// Lags beyond the sample length are omitted.
pub fn acf(values: &[f64], nlags: usize) -> Vec<f64> {
    let max_lag = nlags.min(values.len().saturating_sub(1));
    (0..=max_lag).map(|k| autocorrelation(values, k)).collect()
}

/// Partial autocorrelation at a single lag, via Durbin-Levinson.
pub fn partial_autocorrelation(values: &[f64], lag: usize) -> f64 {
    if lag == 0 {
        return 1.0;
    }
    if values.len() <= lag {
        return f64::NAN;
    }

    let acf: Vec<f64> = (0..=lag).map(|k| autocorrelation(values, k)).collect();
    if acf.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }

    let mut phi = vec![vec![0.0; lag + 1]; lag + 1];
    phi[1][1] = acf[1];

    for k in 2..=lag {
        let mut num = acf[k];
        let mut denom = 1.0;
        for j in 1..k {
            num -= phi[k - 1][j] * acf[k - j];
            denom -= phi[k - 1][j] * acf[j];
        }
        if denom.abs() < 1e-10 {
            return f64::NAN;
        }
        phi[k][k] = num / denom;
        for j in 1..k {
            phi[k][j] = phi[k - 1][j] - phi[k][k] * phi[k - 1][k - j];
        }
    }

    phi[lag][lag]
}

/// Partial autocorrelation function for lags 0..=nlags.
pub fn pacf(values: &[f64], nlags: usize) -> Vec<f64> {
    let max_lag = nlags.min(values.len().saturating_sub(1));
    (0..=max_lag)
        .map(|k| partial_autocorrelation(values, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_variance_basic() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(variance(&values), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn moments_on_empty_and_short() {
        assert!(mean(&[]).is_nan());
        assert!(variance(&[1.0]).is_nan());
        assert!(skewness(&[1.0, 2.0]).is_nan());
        assert!(kurtosis(&[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn zero_variance_moments_are_nan() {
        let constant = vec![100.0; 20];
        assert!(skewness(&constant).is_nan());
        assert!(kurtosis(&constant).is_nan());
    }

    #[test]
    fn symmetric_data_has_near_zero_skew() {
        let values: Vec<f64> = (0..21).map(|i| i as f64 - 10.0).collect();
        assert_relative_eq!(skewness(&values), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn acf_lag_zero_is_one() {
        let values: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin()).collect();
        let acf_values = acf(&values, 10);
        assert_eq!(acf_values.len(), 11);
        assert_relative_eq!(acf_values[0], 1.0);
        for &r in &acf_values {
            assert!(r.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn acf_truncates_to_sample_length() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let acf_values = acf(&values, 24);
        assert_eq!(acf_values.len(), 4); // lags 0..=3
    }

    #[test]
    fn strong_persistence_shows_in_acf() {
        // AR(1)-like series with high positive correlation at lag 1
        let mut values = vec![1.0];
        for i in 1..200 {
            values.push(0.9 * values[i - 1] + ((i * 17) % 23) as f64 / 23.0 - 0.5);
        }
        assert!(autocorrelation(&values, 1) > 0.5);
    }

    #[test]
    fn pacf_lag_zero_is_one() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).cos()).collect();
        let pacf_values = pacf(&values, 5);
        assert_relative_eq!(pacf_values[0], 1.0);
        assert_eq!(pacf_values.len(), 6);
    }

    #[test]
    fn pacf_lag_one_equals_acf_lag_one() {
        let values: Vec<f64> = (0..60)
            .map(|i| ((i * 13 + 7) % 41) as f64 / 20.0)
            .collect();
        assert_relative_eq!(
            partial_autocorrelation(&values, 1),
            autocorrelation(&values, 1),
            epsilon = 1e-12
        );
    }
}
