//! Display rounding and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the solver stays free of presentation concerns
//! - output changes are localized (important for snapshot-style tests)
//!
//! Rounding follows fixed-point formatting of the exact binary value: `1.005`
//! is really `1.00499999...` and formats as `1.00`, while exact ties such as
//! `0.125` round away from zero (`0.13`).

use crate::app::pipeline::JobOutcome;
use crate::domain::{AlignmentInput, AlignmentResult, FormattedResult};
use crate::io::ingest::RowError;

/// Decimal places for `resultantR` and `runout`.
pub const LENGTH_PLACES: usize = 3;
/// Decimal places for `angle`.
pub const ANGLE_PLACES: usize = 2;
/// Decimal places for `shimThickness`.
pub const SHIM_PLACES: usize = 4;

/// Extra digits used to decide whether a value sits exactly on a rounding tie.
const TIE_PROBE_DIGITS: usize = 80;

/// Format `value` with exactly `places` decimals.
///
/// Non-finite values render as `Infinity`, `-Infinity` and `NaN`.
pub fn to_fixed(value: f64, places: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    let digits = if is_exact_tie(magnitude, places) {
        let exact = format!("{magnitude:.prec$}", prec = places + 1);
        increment_last_digit(&exact[..exact.len() - 1], places)
    } else {
        format!("{magnitude:.places$}")
    };

    if value < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Numeric value of `to_fixed(value, places)`.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    to_fixed(value, places).parse().unwrap_or(value)
}

fn is_exact_tie(magnitude: f64, places: usize) -> bool {
    let probe = format!("{magnitude:.prec$}", prec = places + TIE_PROBE_DIGITS);
    let Some((_, frac)) = probe.split_once('.') else {
        return false;
    };
    let mut rest = frac[places..].chars();
    rest.next() == Some('5') && rest.all(|c| c == '0')
}

/// Add one unit in the last place of a plain decimal string (`"0.12"` -> `"0.13"`).
fn increment_last_digit(truncated: &str, places: usize) -> String {
    let mut digits: Vec<char> = truncated.chars().filter(|c| *c != '.').collect();

    let mut i = digits.len();
    loop {
        if i == 0 {
            digits.insert(0, '1');
            break;
        }
        i -= 1;
        match digits[i].to_digit(10) {
            Some(9) => digits[i] = '0',
            Some(d) => {
                digits[i] = char::from_digit(d + 1, 10).unwrap_or('0');
                break;
            }
            None => break,
        }
    }

    let mut out: String = digits.into_iter().collect();
    if places > 0 {
        out.insert(out.len() - places, '.');
    }
    out
}

fn fold_full_turn(angle: String) -> String {
    let full_turn = format!("{:.ANGLE_PLACES$}", 360.0);
    if angle == full_turn {
        format!("{:.ANGLE_PLACES$}", 0.0)
    } else {
        angle
    }
}

impl AlignmentResult {
    /// Display strings: 3/3/2/4 decimals.
    pub fn formatted(&self) -> FormattedResult {
        FormattedResult {
            resultant_r: to_fixed(self.resultant_r, LENGTH_PLACES),
            runout: to_fixed(self.runout, LENGTH_PLACES),
            angle: fold_full_turn(to_fixed(self.angle, ANGLE_PLACES)),
            shim_thickness: to_fixed(self.shim_thickness, SHIM_PLACES),
        }
    }

    /// The same values rounded the way they are displayed.
    pub fn rounded(&self) -> AlignmentResult {
        let angle = round_to(self.angle, ANGLE_PLACES);
        AlignmentResult {
            resultant_r: round_to(self.resultant_r, LENGTH_PLACES),
            runout: round_to(self.runout, LENGTH_PLACES),
            angle: if angle >= 360.0 { 0.0 } else { angle },
            shim_thickness: round_to(self.shim_thickness, SHIM_PLACES),
        }
    }
}

/// Format the full single-calculation report (inputs, per-station table, results).
pub fn format_summary(input: &AlignmentInput, result: &AlignmentResult) -> String {
    let mut out = String::new();

    out.push_str("=== align - Combined Alignment Calculator ===\n");
    out.push_str(&format!(
        "Diameter: {} mm | Length: {} mm\n",
        fmt_reading(input.diameter),
        fmt_reading(input.length),
    ));
    out.push('\n');

    out.push_str(
        format!("{:<8} {:>12} {:>12} {:>12}\n", "station", "pgb", "ugb", "diff").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<8} {:-<12} {:-<12} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');

    let diffs = input.differences();
    for (station, pgb) in input.pgb.iter() {
        out.push_str(
            format!(
                "{:<8} {:>12} {:>12} {:>12}\n",
                station.label(),
                fmt_reading(pgb),
                fmt_reading(input.ugb.get(station)),
                fmt_reading(diffs[station.index()]),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format_results(result));
    out
}

/// Format just the four result lines.
pub fn format_results(result: &AlignmentResult) -> String {
    let f = result.formatted();
    let mut out = String::new();
    out.push_str("Calculation results:\n");
    out.push_str(&format!("- Resultant (R) : {} mm\n", f.resultant_r));
    out.push_str(&format!("- Runout        : {} mm\n", f.runout));
    out.push_str(&format!("- Angle         : {}°\n", f.angle));
    out.push_str(&format!("- Shim thickness: {} mm\n", f.shim_thickness));
    out
}

/// Format batch outcomes as a table, failed jobs last with their reason.
pub fn format_batch_table(outcomes: &[JobOutcome]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>12} {:>12} {:>10} {:>12}\n",
            "id", "resultant", "runout", "angle", "shim"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<20} {:-<12} {:-<12} {:-<10} {:-<12}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    let mut failed = Vec::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => {
                let f = result.formatted();
                out.push_str(
                    format!(
                        "{:<20} {:>12} {:>12} {:>10} {:>12}\n",
                        truncate(&outcome.id, 20),
                        f.resultant_r,
                        f.runout,
                        f.angle,
                        f.shim_thickness,
                    )
                    .trim_end(),
                );
                out.push('\n');
            }
            Err(err) => failed.push((outcome.id.as_str(), err.to_string())),
        }
    }

    if !failed.is_empty() {
        out.push_str("\nFailed jobs:\n");
        for (id, reason) in failed {
            out.push_str(&format!("- {id}: {reason}\n"));
        }
    }

    out
}

/// Format CSV rows that were skipped during ingest.
pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = format!("Skipped rows ({}):\n", errors.len());
    for err in errors {
        match &err.id {
            Some(id) => out.push_str(&format!("- line {} ({id}): {}\n", err.line, err.message)),
            None => out.push_str(&format!("- line {}: {}\n", err.line, err.message)),
        }
    }
    out
}

fn fmt_reading(v: f64) -> String {
    to_fixed(v, LENGTH_PLACES)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
