//! Polar vector helpers for station readings.
//!
//! Each station value is treated as a vector of that magnitude pointing along
//! the station bearing (`i * 45°`). The sum is a plain `Vector2` whose `x` axis
//! is the 0° reference and whose `y` axis is the 90° station.
//!
//! Numerical notes:
//! - The bearing of an exactly-zero vector is defined as 0° (`atan2(0, 0)`).
//! - Bearings are folded into `[0, 360)`; `-0.0` and values that round up to
//!   `360.0` after the `+360` shift both come out as `0.0`.

use nalgebra::Vector2;

use crate::domain::{STATION_COUNT, Station};

/// Sum per-station values as vectors along each station's bearing.
pub fn station_vector_sum(values: &[f64; STATION_COUNT]) -> Vector2<f64> {
    Station::ALL.iter().fold(Vector2::zeros(), |acc, station| {
        let theta = station.angle_radians();
        let v = values[station.index()];
        acc + Vector2::new(v * theta.cos(), v * theta.sin())
    })
}

/// Bearing of `v` in degrees, in `[0, 360)`.
pub fn bearing_degrees(v: &Vector2<f64>) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    normalize_degrees(v.y.atan2(v.x).to_degrees())
}

/// Fold an angle from `(-360, 360)` into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let shifted = if deg < 0.0 { deg + 360.0 } else { deg };
    if shifted >= 360.0 {
        return 0.0;
    }
    // `-0.0 + 0.0` is `+0.0`.
    shifted + 0.0
}
