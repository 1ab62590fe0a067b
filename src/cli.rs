//! CLI argument parsing for xgotop-validate

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table (default)
    Text,
    /// JSON document for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "xgotop-validate")]
#[command(version)]
#[command(about = "Validate xgotop per-event sampling rates against a baseline capture", long_about = None)]
pub struct Cli {
    /// Enable debug tracing on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare a sampled capture against a baseline capture
    Validate(ValidateArgs),

    /// Summarize metrics files and check for per-type event counts
    Inspect {
        /// Metrics JSON files
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Baseline metrics JSON file (no sampling)
    #[arg(value_name = "BASELINE")]
    pub baseline: PathBuf,

    /// Sampled metrics JSON file
    #[arg(value_name = "SAMPLED")]
    pub sampled: PathBuf,

    /// Sampling rates (e.g., "newgoroutine:0.1,makemap:0.2")
    #[arg(value_name = "RATES")]
    pub rates: Option<String>,

    /// Error tolerance percentage [default: 10]
    #[arg(long, value_name = "PCT", allow_negative_numbers = true)]
    pub tolerance: Option<f64>,

    /// TOML file with default tolerance and rates (command-line values win)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exit with status 2 on a failed verdict and 3 when nothing could be evaluated
    #[arg(long)]
    pub strict: bool,
}
