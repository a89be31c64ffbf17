//! Shared solve pipeline used by the CLI, batch and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! input -> solver (with the configured length policy) -> outcome
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{AlignmentInput, AlignmentResult, Job, LengthPolicy, RunConfig};
use crate::error::AppError;
use crate::solver::{SolveError, solve};

/// Outcome of one job in a batch run.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub id: String,
    pub input: AlignmentInput,
    pub result: Result<AlignmentResult, SolveError>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Solve a single input with the run's length policy.
pub fn run_single(input: &AlignmentInput, config: &RunConfig) -> Result<AlignmentResult, AppError> {
    debug!(
        diameter = input.diameter,
        length = input.length,
        policy = ?config.length_policy,
        "solving alignment"
    );
    let result = solve(input, config.length_policy)?;
    debug!(
        resultant = result.resultant_r,
        angle = result.angle,
        "solved alignment"
    );
    Ok(result)
}

/// Solve every job independently. Outcomes keep the input order.
pub fn run_batch(jobs: &[Job], policy: LengthPolicy) -> Vec<JobOutcome> {
    let outcomes: Vec<JobOutcome> = jobs
        .par_iter()
        .map(|job| JobOutcome {
            id: job.id.clone(),
            input: job.input.clone(),
            result: solve(&job.input, policy),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(jobs = outcomes.len(), failed, "batch solved");
    for outcome in outcomes.iter().filter(|o| !o.is_ok()) {
        if let Err(err) = &outcome.result {
            warn!(id = %outcome.id, "job failed: {err}");
        }
    }

    outcomes
}
