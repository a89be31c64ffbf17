//! Reporting utilities: display rounding, result summaries and batch tables.

pub mod format;

pub use format::*;
