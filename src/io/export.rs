//! Export results to JSON reports and batch CSVs.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::app::pipeline::JobOutcome;
use crate::domain::{AlignmentInput, AlignmentResult, FormattedResult};
use crate::error::AppError;

/// A saved single-calculation report (JSON).
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub tool: String,
    pub generated: String,
    pub input: AlignmentInput,
    pub result: AlignmentResult,
    pub formatted: FormattedResult,
}

impl ReportFile {
    pub fn new(input: &AlignmentInput, result: &AlignmentResult) -> Self {
        Self {
            tool: "align".to_string(),
            generated: Local::now().to_rfc3339(),
            input: input.clone(),
            result: *result,
            formatted: result.formatted(),
        }
    }
}

/// Write a single-calculation report to a JSON file.
pub fn write_report_json(
    path: &Path,
    input: &AlignmentInput,
    result: &AlignmentResult,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::runtime(format!("Failed to create report JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, &ReportFile::new(input, result))
        .map_err(|e| AppError::runtime(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Write batch outcomes to a CSV file.
pub fn write_batch_csv(path: &Path, outcomes: &[JobOutcome]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_batch_csv_to(file, outcomes)
}

/// Write batch outcomes as CSV to any writer.
pub fn write_batch_csv_to<W: Write>(writer: W, outcomes: &[JobOutcome]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "id",
        "diameter",
        "length",
        "resultant_r",
        "runout",
        "angle",
        "shim_thickness",
        "resultant_r_display",
        "runout_display",
        "angle_display",
        "shim_thickness_display",
        "error",
    ])
    .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for outcome in outcomes {
        let mut row = vec![
            outcome.id.clone(),
            outcome.input.diameter.to_string(),
            outcome.input.length.to_string(),
        ];
        match &outcome.result {
            Ok(result) => {
                let f = result.formatted();
                row.extend([
                    format!("{:.10}", result.resultant_r),
                    format!("{:.10}", result.runout),
                    format!("{:.10}", result.angle),
                    format!("{:.10}", result.shim_thickness),
                    f.resultant_r,
                    f.runout,
                    f.angle,
                    f.shim_thickness,
                    String::new(),
                ]);
            }
            Err(err) => {
                row.extend(std::iter::repeat_n(String::new(), 8));
                row.push(err.to_string());
            }
        }
        wtr.write_record(&row)
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
