//! Model fitting.

mod arma;

pub use arma::{Arma11, ArmaFit, ArmaSpec, StabilityReport};
