//! Core data structures for the diagnostic pipeline.

mod forecast;
mod series;

pub use forecast::Forecast;
pub use series::{Period, Series};
