//! Command-line parsing for the alignment calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the solver code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::LengthPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "align", version, about = "Combined shaft alignment calculator")]
pub struct Cli {
    /// Config file (TOML). Defaults to $ALIGN_CONFIG, then ./align.toml.
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Debug-level logging (stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve one set of readings and print the results.
    Solve(SolveArgs),
    /// Solve every row of a jobs CSV.
    Batch(BatchArgs),
    /// Generate synthetic readings for a known offset and bearing, then solve them.
    Sample(SampleArgs),
    /// Launch the interactive form.
    Tui(TuiArgs),
}

/// Options shared by commands that call the solver.
#[derive(Debug, Args, Clone, Default)]
pub struct PolicyArgs {
    /// What to do when length is zero or negative (default from config: reject).
    #[arg(long, value_enum)]
    pub zero_length: Option<LengthPolicy>,
}

/// Options for solving one set of readings.
#[derive(Debug, Args, Clone)]
pub struct SolveArgs {
    /// Shaft diameter (mm).
    #[arg(short, long)]
    pub diameter: Option<f64>,

    /// Indicator span length (mm).
    #[arg(short, long)]
    pub length: Option<f64>,

    /// PGB readings at 0°,45°,...,315° (comma separated, 8 values; default all 0).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub pgb: Vec<f64>,

    /// UGB readings at 0°,45°,...,315° (comma separated, 8 values; default all 0).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub ugb: Vec<f64>,

    /// Read the inputs from a job JSON file instead of flags.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["pgb", "ugb"])]
    pub job: Option<PathBuf>,

    /// Print the result as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Draw the dial diagram under the report.
    #[arg(long)]
    pub plot: bool,

    /// Write a JSON report (inputs, raw and formatted results).
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Options for batch solving.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Jobs CSV: id,diameter,length,pgb_0..pgb_7,ugb_0..ugb_7
    #[arg(short, long, value_name = "CSV")]
    pub file: PathBuf,

    /// Export per-job results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Options for synthetic readings.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Target resultant magnitude.
    #[arg(long)]
    pub offset: f64,

    /// Target bearing in degrees, clockwise from the reference mark.
    #[arg(long, allow_hyphen_values = true)]
    pub bearing: f64,

    /// Gauge noise standard deviation.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Common PGB reading level.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub base: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Shaft diameter (mm).
    #[arg(short, long)]
    pub diameter: Option<f64>,

    /// Indicator span length (mm).
    #[arg(short, long)]
    pub length: Option<f64>,

    /// Print the generated job as JSON.
    #[arg(long)]
    pub json: bool,

    /// Save the generated job to a JSON file (usable with `align solve --job`).
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for the interactive form.
#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Initial diameter (mm).
    #[arg(short, long)]
    pub diameter: Option<f64>,

    /// Initial length (mm).
    #[arg(short, long)]
    pub length: Option<f64>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_reading_lists_with_negatives() {
        let cli = Cli::parse_from([
            "align",
            "solve",
            "-d",
            "675",
            "-l",
            "1464",
            "--pgb",
            "-1,0,0,0,0,0,0,0",
            "--ugb",
            "10,0,-10,0,10,0,-10,0",
            "--zero-length",
            "propagate",
        ]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.pgb.len(), 8);
        assert_eq!(args.pgb[0], -1.0);
        assert_eq!(args.ugb, vec![10.0, 0.0, -10.0, 0.0, 10.0, 0.0, -10.0, 0.0]);
        assert_eq!(args.policy.zero_length, Some(LengthPolicy::Propagate));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["align", "batch", "-f", "jobs.csv", "-v", "--config", "x.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn job_conflicts_with_inline_readings() {
        let res = Cli::try_parse_from(["align", "solve", "--job", "a.json", "--pgb", "1,2"]);
        assert!(res.is_err());
    }
}
