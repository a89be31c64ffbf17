//! The alignment solver.
//!
//! Converts two sets of eight dial-indicator readings into the four correction
//! values shown to the technician:
//!
//! 1. `diff[i] = ugb[i] - pgb[i]` per station
//! 2. vector-sum the differences along the station bearings (`i * 45°`)
//! 3. `resultantR = |sum|`, `runout = resultantR / 2`
//! 4. `angle` = bearing of the sum in `[0, 360)`
//! 5. `shimThickness = diameter * runout * 0.01 / length`
//!
//! The solver is a pure function: no state, no I/O, no logging.
//!
//! Readings that cancel leave floating-point residue in the sum (around
//! `1e-15`). The resultant then rounds to zero for display, but `angle` is the
//! bearing of that residue rather than 0. Only an exactly-zero sum reports 0°.

use thiserror::Error;

use crate::domain::{AlignmentInput, AlignmentResult, LengthPolicy};
use crate::math::{bearing_degrees, station_vector_sum};

/// Proportionality factor between runout and shim thickness.
pub const SHIM_FACTOR: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Span length is zero, negative or NaN.
    #[error("length must be positive (got {length})")]
    NonPositiveLength { length: f64 },
}

/// Solve with the default policy (reject non-positive lengths).
pub fn compute(input: &AlignmentInput) -> Result<AlignmentResult, SolveError> {
    solve(input, LengthPolicy::default())
}

/// Solve with an explicit zero-length policy.
pub fn solve(input: &AlignmentInput, policy: LengthPolicy) -> Result<AlignmentResult, SolveError> {
    if policy == LengthPolicy::Reject && !(input.length > 0.0) {
        return Err(SolveError::NonPositiveLength {
            length: input.length,
        });
    }

    let sum = station_vector_sum(&input.differences());
    let resultant_r = sum.norm();
    let runout = resultant_r / 2.0;
    let angle = bearing_degrees(&sum);
    let shim_thickness = (input.diameter * runout * SHIM_FACTOR) / input.length;

    Ok(AlignmentResult {
        resultant_r,
        runout,
        angle,
        shim_thickness,
    })
}
