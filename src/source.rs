//! Loader boundary between the pipeline and the data layer.
//!
//! The loader owns file discovery, sheet matching and cleaning; the
//! pipeline only asks it for a series by an already-validated key.

use crate::core::Series;
use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use std::fmt;

/// Opaque identifier of a measure (the aggregate index or one of the
/// dwelling-type/geography sub-indices).
///
/// Resolution from user input to a valid key happens in the loader,
/// once; the pipeline never performs fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureId(String);

impl MeasureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeasureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeasureId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Supplies cleaned series to the pipeline.
pub trait SeriesSource {
    /// Return the series for a measure, or a typed load failure.
    fn load(&self, measure: &MeasureId) -> Result<Series>;
}

/// In-process source backed by a map, used by tests and demos and as
/// the cache target for any upstream reader.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    series: HashMap<MeasureId, Series>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series under a measure key.
    pub fn insert(&mut self, measure: MeasureId, series: Series) {
        self.series.insert(measure, series);
    }

    /// Registered measure keys, in no particular order.
    pub fn measures(&self) -> impl Iterator<Item = &MeasureId> {
        self.series.keys()
    }
}

impl SeriesSource for MemorySource {
    fn load(&self, measure: &MeasureId) -> Result<Series> {
        self.series
            .get(measure)
            .cloned()
            .ok_or_else(|| PipelineError::MeasureNotFound(measure.to_string()))
    }
}
