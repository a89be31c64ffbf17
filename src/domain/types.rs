//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built fresh by the form/CLI for every calculation
//! - read from job files and batch CSVs
//! - exported to JSON/CSV

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of indicator stations around the shaft.
pub const STATION_COUNT: usize = 8;

/// Angular spacing between stations, in degrees.
pub const STATION_STEP_DEG: f64 = 45.0;

/// Default shaft diameter (mm) used by the form.
pub const DEFAULT_DIAMETER: f64 = 675.0;

/// Default indicator span length (mm) used by the form.
pub const DEFAULT_LENGTH: f64 = 1464.0;

/// One of the eight angular reading positions.
///
/// Stations are measured clockwise from the reference mark: `Station(0)` is 0°,
/// `Station(1)` is 45°, ... `Station(7)` is 315°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Station(usize);

impl Station {
    pub const ALL: [Station; STATION_COUNT] = [
        Station(0),
        Station(1),
        Station(2),
        Station(3),
        Station(4),
        Station(5),
        Station(6),
        Station(7),
    ];

    pub fn new(index: usize) -> Option<Self> {
        (index < STATION_COUNT).then_some(Station(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn angle_degrees(self) -> f64 {
        self.0 as f64 * STATION_STEP_DEG
    }

    pub fn angle_radians(self) -> f64 {
        self.angle_degrees().to_radians()
    }

    /// Label used on form fields and in tables (`"45°"`).
    pub fn label(self) -> String {
        format!("{}°", self.0 * STATION_STEP_DEG as usize)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Eight dial-indicator readings, index-aligned to `Station::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readings([f64; STATION_COUNT]);

impl Readings {
    pub const ZERO: Readings = Readings([0.0; STATION_COUNT]);

    pub fn new(values: [f64; STATION_COUNT]) -> Self {
        Self(values)
    }

    /// Build from a slice, which must hold exactly one value per station.
    pub fn from_slice(values: &[f64]) -> Result<Self, String> {
        let values: [f64; STATION_COUNT] = values.try_into().map_err(|_| {
            format!(
                "expected {STATION_COUNT} readings (0°..315°), got {}",
                values.len()
            )
        })?;
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; STATION_COUNT] {
        &self.0
    }

    pub fn get(&self, station: Station) -> f64 {
        self.0[station.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Station, f64)> + '_ {
        Station::ALL.into_iter().map(|s| (s, self.0[s.index()]))
    }

    pub fn scaled(&self, k: f64) -> Self {
        Self(self.0.map(|v| v * k))
    }
}

/// Inputs for one alignment calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentInput {
    /// Shaft diameter in mm.
    pub diameter: f64,
    /// Indicator span length in mm.
    pub length: f64,
    /// PGB side readings.
    pub pgb: Readings,
    /// UGB side readings.
    pub ugb: Readings,
}

impl AlignmentInput {
    pub fn new(diameter: f64, length: f64, pgb: Readings, ugb: Readings) -> Self {
        Self {
            diameter,
            length,
            pgb,
            ugb,
        }
    }

    /// Per-station `ugb - pgb`.
    pub fn differences(&self) -> [f64; STATION_COUNT] {
        let pgb = self.pgb.values();
        let ugb = self.ugb.values();
        std::array::from_fn(|i| ugb[i] - pgb[i])
    }

    /// The same input with the two reading sets exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            diameter: self.diameter,
            length: self.length,
            pgb: self.ugb,
            ugb: self.pgb,
        }
    }
}

impl Default for AlignmentInput {
    fn default() -> Self {
        Self::new(DEFAULT_DIAMETER, DEFAULT_LENGTH, Readings::ZERO, Readings::ZERO)
    }
}

/// Solver output. Values are unrounded; see `report` for display rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentResult {
    /// Magnitude of the summed difference vector (mm).
    pub resultant_r: f64,
    /// Half the resultant (mm).
    pub runout: f64,
    /// Bearing of the resultant in degrees, `[0, 360)`.
    pub angle: f64,
    /// Corrective shim estimate (mm).
    pub shim_thickness: f64,
}

/// Results rendered for display: 3/3/2/4 decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResult {
    pub resultant_r: String,
    pub runout: String,
    pub angle: String,
    pub shim_thickness: String,
}

/// What the solver does when the span length is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LengthPolicy {
    /// Fail with a domain error.
    #[default]
    Reject,
    /// Let IEEE-754 semantics through (`inf` / `NaN` shim thickness).
    Propagate,
}

/// A named input, as read from a job file or a batch CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(flatten)]
    pub input: AlignmentInput,
}

/// A full run's settings as understood by the pipeline.
///
/// This is derived from the config file plus CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub length_policy: LengthPolicy,
    pub default_diameter: f64,
    pub default_length: f64,
    /// Dial plot height in rows.
    pub plot_size: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            length_policy: LengthPolicy::Reject,
            default_diameter: DEFAULT_DIAMETER,
            default_length: DEFAULT_LENGTH,
            plot_size: 21,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stations_cover_circle_in_45_degree_steps() {
        let angles: Vec<f64> = Station::ALL.iter().map(|s| s.angle_degrees()).collect();
        assert_eq!(angles, vec![0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]);
        assert_eq!(Station::ALL[3].label(), "135°");
        assert!(Station::new(8).is_none());
    }

    #[test]
    fn readings_from_slice_requires_eight_values() {
        assert!(Readings::from_slice(&[1.0; 8]).is_ok());
        let err = Readings::from_slice(&[1.0; 7]).unwrap_err();
        assert!(err.contains("got 7"), "{err}");
        assert!(Readings::from_slice(&[1.0; 9]).is_err());
    }

    #[test]
    fn differences_are_ugb_minus_pgb() {
        let input = AlignmentInput::new(
            675.0,
            1464.0,
            Readings::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
            Readings::new([2.0, 2.0, 0.0, 4.0, 5.5, 6.0, 7.0, -8.0]),
        );
        assert_eq!(input.differences(), [1.0, 0.0, -3.0, 0.0, 0.5, 0.0, 0.0, -16.0]);
        let swapped = input.swapped();
        assert_eq!(swapped.differences(), [-1.0, 0.0, 3.0, 0.0, -0.5, 0.0, 0.0, 16.0]);
    }

    #[test]
    fn result_serializes_with_camel_case_names() {
        let result = AlignmentResult {
            resultant_r: 8.0,
            runout: 4.0,
            angle: 0.0,
            shim_thickness: 0.01844,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"resultantR\":8.0"), "{json}");
        assert!(json.contains("\"shimThickness\""), "{json}");
    }

    #[test]
    fn job_json_rejects_short_reading_lists() {
        let ok = r#"{"id":"a","diameter":1.0,"length":2.0,"pgb":[0,0,0,0,0,0,0,0],"ugb":[1,0,0,0,0,0,0,0]}"#;
        let job: Job = serde_json::from_str(ok).unwrap();
        assert_eq!(job.input.ugb.get(Station::ALL[0]), 1.0);

        let short = r#"{"id":"a","diameter":1.0,"length":2.0,"pgb":[0,0,0],"ugb":[1,0,0,0,0,0,0,0]}"#;
        assert!(serde_json::from_str::<Job>(short).is_err());
    }
}
