//! Quarterly series data structures.
//!
//! A [`Series`] is the single input the pipeline consumes: an ordered
//! sequence of (quarter, index value) pairs, one point per calendar
//! quarter, immutable once constructed.

use crate::error::{PipelineError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// One calendar quarter, e.g. `2023Q1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    quarter: u8,
}

impl Period {
    /// Create a period. Quarter must be 1..=4.
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(PipelineError::InvalidParameter(format!(
                "quarter must be 1..=4, got {quarter}"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// The year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The quarter component (1..=4).
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// The period containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month0() / 3) + 1) as u8,
        }
    }

    /// First day of the quarter.
    pub fn start_date(&self) -> NaiveDate {
        let month = (self.quarter as u32 - 1) * 3 + 1;
        // month is 1, 4, 7 or 10; day 1 always exists
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap()
    }

    /// The following quarter.
    pub fn next(&self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for Period {
    type Err = PipelineError;

    /// Parse `"2023Q1"` or `"2023-Q1"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            || PipelineError::InvalidParameter(format!("invalid period label '{s}'"));
        let (year_part, quarter_part) = s
            .split_once(['Q', 'q'])
            .ok_or_else(invalid)?;
        let year: i32 = year_part.trim_end_matches('-').parse().map_err(|_| invalid())?;
        let quarter: u8 = quarter_part.parse().map_err(|_| invalid())?;
        Period::new(year, quarter)
    }
}

/// An ordered quarterly series of index values.
///
/// Invariants enforced at construction:
/// - periods strictly increasing, no duplicates
/// - every stored value is finite (non-finite inputs are dropped)
/// - at least one usable observation
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    periods: Vec<Period>,
    values: Vec<f64>,
}

impl Series {
    /// Build a series from (period, value) pairs.
    ///
    /// Missing values (NaN or infinite) are dropped before any ordering
    /// check, mirroring the upstream `dropna` behavior. Returns
    /// [`PipelineError::EmptySeries`] when nothing usable remains and
    /// [`PipelineError::OutOfOrder`] on a duplicate or backwards period.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Period, f64)>,
    {
        let mut periods = Vec::new();
        let mut values = Vec::new();

        for (period, value) in pairs {
            if !value.is_finite() {
                continue;
            }
            if let Some(&last) = periods.last() {
                if period <= last {
                    return Err(PipelineError::OutOfOrder { period });
                }
            }
            periods.push(period);
            values.push(value);
        }

        if values.is_empty() {
            return Err(PipelineError::EmptySeries);
        }

        Ok(Self { periods, values })
    }

    /// Build a series of consecutive quarters starting at `start`.
    pub fn from_start(start: Period, values: Vec<f64>) -> Result<Self> {
        let mut period = start;
        let mut pairs = Vec::with_capacity(values.len());
        for value in values {
            pairs.push((period, value));
            period = period.next();
        }
        Self::from_pairs(pairs)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A constructed series is never empty, so this always returns false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Observation values, in period order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Periods, in order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Mean of the values.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.len() as f64
    }

    /// Split into (train, test) where test is the last `horizon` points.
    ///
    /// The train side must keep at least `min_train` points.
    pub fn split_for_validation(
        &self,
        horizon: usize,
        min_train: usize,
    ) -> Result<(Series, Series)> {
        let needed = horizon + min_train;
        if self.len() < needed {
            return Err(PipelineError::InsufficientData {
                needed,
                got: self.len(),
            });
        }
        let cut = self.len() - horizon;
        let train = Series {
            periods: self.periods[..cut].to_vec(),
            values: self.values[..cut].to_vec(),
        };
        let test = Series {
            periods: self.periods[cut..].to_vec(),
            values: self.values[cut..].to_vec(),
        };
        Ok((train, test))
    }

    /// Fingerprint of the exact values, for memoization keys.
    ///
    /// Two series with bit-identical values share a fingerprint; periods
    /// do not participate since the fit only sees values.
    pub fn fingerprint(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.values.len().hash(&mut hasher);
        for v in &self.values {
            v.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}
