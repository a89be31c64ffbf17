//! Input/output helpers.
//!
//! - form coercion + batch CSV ingest (`ingest`)
//! - report/batch exports (JSON/CSV) (`export`)
//! - job JSON read/write (`job`)

pub mod export;
pub mod ingest;
pub mod job;

pub use export::*;
pub use ingest::*;
pub use job::*;
