//! Mathematical utilities: polar summation of station readings.

pub mod polar;

pub use polar::*;
