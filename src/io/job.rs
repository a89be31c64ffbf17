//! Read/write single-job JSON files.
//!
//! A job file is the portable form of one set of readings:
//!
//! ```json
//! { "id": "pump-3", "diameter": 675, "length": 1464,
//!   "pgb": [0, 0, 0, 0, 0, 0, 0, 0], "ugb": [8, 0, 0, 0, 0, 0, 0, 0] }
//! ```
//!
//! `id` is optional; the file stem is used when it is missing.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{AlignmentInput, Job};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct JobFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    input: AlignmentInput,
}

/// Read a job JSON file.
pub fn read_job_json(path: &Path) -> Result<Job, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open job JSON '{}': {e}", path.display()))
    })?;
    let parsed: JobFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid job JSON '{}': {e}", path.display())))?;

    let id = parsed.id.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "job".to_string())
    });
    Ok(Job {
        id,
        input: parsed.input,
    })
}

/// Write a job JSON file.
pub fn write_job_json(path: &Path, job: &Job) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::runtime(format!("Failed to create job JSON '{}': {e}", path.display()))
    })?;
    let doc = JobFile {
        id: Some(job.id.clone()),
        input: job.input.clone(),
    };
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::runtime(format!("Failed to write job JSON: {e}")))?;
    Ok(())
}
