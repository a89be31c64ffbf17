//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the config file and sets up logging
//! - builds solver inputs from flags, job files or CSVs
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Cli, Command, PolicyArgs, SampleArgs, SolveArgs, TuiArgs};
use crate::config::{AlignConfig, LogLevel};
use crate::data::{SampleSpec, generate_readings};
use crate::domain::{AlignmentInput, Job, Readings, RunConfig};
use crate::error::{AppError, EXIT_DOMAIN};
use crate::io::export::ReportFile;

pub mod pipeline;

/// Entry point for the `align` binary.
pub fn run() -> Result<(), AppError> {
    // We want `align` and `align -d 500` to behave like `align tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let file_config = crate::config::load_config(cli.config.as_deref())?;

    // The TUI owns the terminal; log lines would corrupt it.
    if !matches!(cli.command, Command::Tui(_)) {
        setup_tracing(&cli, file_config.shared.log_level);
    }

    match cli.command {
        Command::Solve(args) => handle_solve(args, &file_config),
        Command::Batch(args) => handle_batch(args, &file_config),
        Command::Sample(args) => handle_sample(args, &file_config),
        Command::Tui(args) => handle_tui(args, &file_config),
    }
}

/// Setup tracing subscriber based on CLI flags and the configured level.
fn setup_tracing(cli: &Cli, level: LogLevel) {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::from(level)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if cli.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn handle_solve(args: SolveArgs, file_config: &AlignConfig) -> Result<(), AppError> {
    let config = run_config_from_args(file_config, &args.policy);
    let input = solve_input_from_args(&args, &config)?;
    let result = pipeline::run_single(&input, &config)?;
    info!(
        resultant = %result.formatted().resultant_r,
        angle = %result.formatted().angle,
        "calculation done"
    );

    if args.json {
        let report = ReportFile::new(&input, &result);
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::runtime(format!("Failed to encode result JSON: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", crate::report::format_summary(&input, &result));
    }

    if args.plot {
        println!("{}", crate::plot::render_dial(&input, &result, config.plot_size));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_report_json(path, &input, &result)?;
        info!(path = %path.display(), "wrote report");
    }

    Ok(())
}

fn handle_batch(args: BatchArgs, file_config: &AlignConfig) -> Result<(), AppError> {
    let config = run_config_from_args(file_config, &args.policy);
    let ingested = crate::io::ingest::load_jobs_csv(&args.file)?;
    info!(
        file = %args.file.display(),
        rows = ingested.rows_read,
        jobs = ingested.jobs.len(),
        rejected = ingested.row_errors.len(),
        "loaded jobs"
    );
    for err in &ingested.row_errors {
        warn!(line = err.line, id = ?err.id, "row rejected: {}", err.message);
    }

    let outcomes = pipeline::run_batch(&ingested.jobs, config.length_policy);

    println!("{}", crate::report::format_batch_table(&outcomes));
    if !ingested.row_errors.is_empty() {
        println!("{}", crate::report::format_row_errors(&ingested.row_errors));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_batch_csv(path, &outcomes)?;
        info!(path = %path.display(), "wrote batch results");
    }

    batch_status(&outcomes)
}

/// Exit status of a batch run: a domain error when no job could be solved.
fn batch_status(outcomes: &[pipeline::JobOutcome]) -> Result<(), AppError> {
    if outcomes.iter().any(pipeline::JobOutcome::is_ok) {
        return Ok(());
    }
    Err(AppError::new(
        EXIT_DOMAIN,
        format!("All {} job(s) failed to solve.", outcomes.len()),
    ))
}

fn handle_sample(args: SampleArgs, file_config: &AlignConfig) -> Result<(), AppError> {
    let config = file_config.run_config();
    let spec = SampleSpec {
        offset: args.offset,
        bearing: args.bearing,
        noise: args.noise,
        base: args.base,
        seed: args.seed,
        diameter: args.diameter.unwrap_or(config.default_diameter),
        length: args.length.unwrap_or(config.default_length),
    };
    let input = generate_readings(&spec)?;
    let job = Job {
        id: format!("sample-{}", spec.seed),
        input,
    };

    if args.json {
        let text = serde_json::to_string_pretty(&job)
            .map_err(|e| AppError::runtime(format!("Failed to encode job JSON: {e}")))?;
        println!("{text}");
    } else {
        let result = pipeline::run_single(&job.input, &config)?;
        println!(
            "Target: offset {:.3} at {:.2}° (noise σ={}, seed={})\n",
            spec.offset, spec.bearing, spec.noise, spec.seed
        );
        println!("{}", crate::report::format_summary(&job.input, &result));
    }

    if let Some(path) = &args.export {
        crate::io::job::write_job_json(path, &job)?;
        info!(path = %path.display(), "wrote sample job");
    }

    Ok(())
}

fn handle_tui(args: TuiArgs, file_config: &AlignConfig) -> Result<(), AppError> {
    let mut config = run_config_from_args(file_config, &args.policy);
    if let Some(d) = args.diameter {
        config.default_diameter = d;
    }
    if let Some(l) = args.length {
        config.default_length = l;
    }
    crate::tui::run(config)
}

/// Config-file settings with CLI overrides applied.
pub fn run_config_from_args(file_config: &AlignConfig, policy: &PolicyArgs) -> RunConfig {
    let mut config = file_config.run_config();
    if let Some(p) = policy.zero_length {
        config.length_policy = p;
    }
    config
}

/// Build the solver input for `align solve` from a job file and/or flags.
///
/// Flags win over job-file values; missing readings default to all zero.
pub fn solve_input_from_args(
    args: &SolveArgs,
    config: &RunConfig,
) -> Result<AlignmentInput, AppError> {
    let mut input = match &args.job {
        Some(path) => crate::io::job::read_job_json(path)?.input,
        None => AlignmentInput::new(
            config.default_diameter,
            config.default_length,
            readings_from_flag("--pgb", &args.pgb)?,
            readings_from_flag("--ugb", &args.ugb)?,
        ),
    };
    if let Some(d) = args.diameter {
        input.diameter = d;
    }
    if let Some(l) = args.length {
        input.length = l;
    }
    Ok(input)
}

fn readings_from_flag(flag: &str, values: &[f64]) -> Result<Readings, AppError> {
    if values.is_empty() {
        return Ok(Readings::ZERO);
    }
    Readings::from_slice(values).map_err(|e| AppError::input(format!("{flag}: {e}")))
}

/// Rewrite argv so `align` defaults to `align tui`.
///
/// Rules:
/// - `align`                      -> `align tui`
/// - `align -d 500 ...`           -> `align tui -d 500 ...`
/// - `align --help/--version/-h`  -> unchanged (show top-level help/version)
/// - any argv naming a subcommand -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "solve" | "batch" | "sample" | "tui"));
    if names_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LengthPolicy;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn solve_args(extra: &[&str]) -> SolveArgs {
        let mut items = vec!["align", "solve"];
        items.extend_from_slice(extra);
        match Cli::parse_from(items).command {
            Command::Solve(args) => args,
            other => panic!("expected solve, got {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(argv(&["align"])), argv(&["align", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["align", "-d", "500"])),
            argv(&["align", "tui", "-d", "500"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        for items in [
            &["align", "solve", "-d", "1"][..],
            &["align", "--config", "a.toml", "batch", "-f", "x.csv"][..],
            &["align", "--help"][..],
            &["align", "-V"][..],
        ] {
            assert_eq!(rewrite_args(argv(items)), argv(items));
        }
    }

    #[test]
    fn cli_overrides_config_policy() {
        let file_config = AlignConfig::default();
        let keep = run_config_from_args(&file_config, &PolicyArgs::default());
        assert_eq!(keep.length_policy, LengthPolicy::Reject);

        let policy = PolicyArgs {
            zero_length: Some(LengthPolicy::Propagate),
        };
        let over = run_config_from_args(&file_config, &policy);
        assert_eq!(over.length_policy, LengthPolicy::Propagate);
    }

    #[test]
    fn solve_input_uses_defaults_and_flags() {
        let config = RunConfig::default();
        let input = solve_input_from_args(&solve_args(&[]), &config).unwrap();
        assert_eq!(input, AlignmentInput::default());

        let args = solve_args(&["-l", "1000", "--ugb", "8,0,0,0,0,0,0,0"]);
        let input = solve_input_from_args(&args, &config).unwrap();
        assert_eq!(input.diameter, 675.0);
        assert_eq!(input.length, 1000.0);
        assert_eq!(input.ugb.values()[0], 8.0);
        assert_eq!(input.pgb, Readings::ZERO);
    }

    #[test]
    fn solve_input_rejects_wrong_reading_count() {
        let args = solve_args(&["--pgb", "1,2,3"]);
        let err = solve_input_from_args(&args, &RunConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().starts_with("--pgb: expected 8 readings"), "{err}");
    }

    #[test]
    fn batch_fails_only_when_every_job_fails() {
        let job = |id: &str, length: f64| Job {
            id: id.to_string(),
            input: AlignmentInput {
                length,
                ..AlignmentInput::default()
            },
        };

        let all_bad = pipeline::run_batch(&[job("a", 0.0)], LengthPolicy::Reject);
        let err = batch_status(&all_bad).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DOMAIN);
        assert_eq!(err.message(), "All 1 job(s) failed to solve.");

        let mixed = pipeline::run_batch(&[job("a", 0.0), job("b", 1464.0)], LengthPolicy::Reject);
        assert!(batch_status(&mixed).is_ok());

        let propagated = pipeline::run_batch(&[job("a", 0.0)], LengthPolicy::Propagate);
        assert!(batch_status(&propagated).is_ok());
    }

    #[test]
    fn job_file_values_can_be_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(
            &path,
            r#"{"diameter": 500, "length": 1000, "pgb": [0,0,0,0,0,0,0,0], "ugb": [2,0,0,0,0,0,0,0]}"#,
        )
        .unwrap();
        let path_str = path.to_string_lossy().into_owned();
        let args = solve_args(&["--job", &path_str, "-d", "650"]);
        let input = solve_input_from_args(&args, &RunConfig::default()).unwrap();
        assert_eq!(input.diameter, 650.0);
        assert_eq!(input.length, 1000.0);
        assert_eq!(input.ugb.values()[0], 2.0);
    }
}
