//! Reading ingest: form-field coercion and batch CSV parsing.
//!
//! This module is responsible for turning user-typed text and job CSVs into
//! well-formed `AlignmentInput`s. The solver assumes finite, well-formed
//! floats; everything that can go wrong with text happens here.
//!
//! Design goals:
//! - **Strict schema** for required CSV columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep file order)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::{AlignmentInput, Job, Readings, STATION_COUNT};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed jobs + row errors.
#[derive(Debug, Clone)]
pub struct IngestedJobs {
    pub jobs: Vec<Job>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Coerce a form field to a number.
///
/// Empty or blank text is 0, and so is anything that does not parse: the
/// form never refuses a keystroke, it just computes with 0.
pub fn coerce_reading(text: &str) -> f64 {
    parse_reading(text).unwrap_or(0.0)
}

/// Strictly parse one reading. Empty or blank text is 0.
///
/// `nan`, `inf` and `infinity` parse as `f64` but are rejected here.
pub fn parse_reading(text: &str) -> Result<f64, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| format!("'{trimmed}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("'{trimmed}' is not a finite number"));
    }
    Ok(value)
}

/// Column names of a batch CSV.
pub fn csv_header() -> Vec<String> {
    let mut cols = vec!["id".to_string(), "diameter".to_string(), "length".to_string()];
    cols.extend((0..STATION_COUNT).map(|i| format!("pgb_{i}")));
    cols.extend((0..STATION_COUNT).map(|i| format!("ugb_{i}")));
    cols
}

/// Load jobs from a batch CSV file.
pub fn load_jobs_csv(path: &Path) -> Result<IngestedJobs, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_jobs_csv(file)?;
    if ingested.jobs.is_empty() {
        return Err(AppError::input(format!(
            "No valid rows in '{}' ({} read, {} rejected).",
            path.display(),
            ingested.rows_read,
            ingested.row_errors.len()
        )));
    }
    Ok(ingested)
}

/// Parse jobs from any CSV reader.
pub fn read_jobs_csv<R: Read>(reader: R) -> Result<IngestedJobs, AppError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV header: {e}")))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut jobs = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, record) in rdr.records().enumerate() {
        rows_read += 1;
        // Header is line 1.
        let fallback_line = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        let id = columns
            .id
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{line}"));

        match columns.parse_row(&record) {
            Ok(input) => jobs.push(Job { id, input }),
            Err(message) => row_errors.push(RowError {
                line,
                id: Some(id),
                message,
            }),
        }
    }

    Ok(IngestedJobs {
        jobs,
        row_errors,
        rows_read,
    })
}

struct ColumnMap {
    id: Option<usize>,
    diameter: usize,
    length: usize,
    pgb: [usize; STATION_COUNT],
    ugb: [usize; STATION_COUNT],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, AppError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.to_ascii_lowercase(), i))
            .collect();

        let mut missing = Vec::new();
        let mut require = |name: String| -> usize {
            match index.get(&name) {
                Some(&i) => i,
                None => {
                    missing.push(name);
                    0
                }
            }
        };

        let diameter = require("diameter".to_string());
        let length = require("length".to_string());
        let pgb: [usize; STATION_COUNT] = std::array::from_fn(|i| require(format!("pgb_{i}")));
        let ugb: [usize; STATION_COUNT] = std::array::from_fn(|i| require(format!("ugb_{i}")));

        if !missing.is_empty() {
            return Err(AppError::input(format!(
                "CSV is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            id: index.get("id").copied(),
            diameter,
            length,
            pgb,
            ugb,
        })
    }

    fn parse_row(&self, record: &StringRecord) -> Result<AlignmentInput, String> {
        let field = |col: usize, name: &str| -> Result<f64, String> {
            parse_reading(record.get(col).unwrap_or("")).map_err(|e| format!("{name}: {e}"))
        };

        let diameter = field(self.diameter, "diameter")?;
        let length = field(self.length, "length")?;

        let mut pgb = [0.0; STATION_COUNT];
        let mut ugb = [0.0; STATION_COUNT];
        for i in 0..STATION_COUNT {
            pgb[i] = field(self.pgb[i], &format!("pgb_{i}"))?;
            ugb[i] = field(self.ugb[i], &format!("ugb_{i}"))?;
        }

        Ok(AlignmentInput::new(
            diameter,
            length,
            Readings::new(pgb),
            Readings::new(ugb),
        ))
    }
}
