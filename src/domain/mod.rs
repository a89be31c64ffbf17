//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the eight indicator stations (`Station`) and their readings (`Readings`)
//! - solver input/output records (`AlignmentInput`, `AlignmentResult`)
//! - run settings (`LengthPolicy`, `RunConfig`)

pub mod types;

pub use types::*;
