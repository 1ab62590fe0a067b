use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xgotop_validate::cli::{Cli, Command, OutputFormat, ValidateArgs};
use xgotop_validate::config::ValidationConfig;
use xgotop_validate::report::{self, JsonReport};
use xgotop_validate::{extract_file, inspect, validate_captures, SamplingRateSpec, Verdict};

/// Initialize tracing subscriber; warnings always, everything with --debug
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve tolerance and rates from the config file and command line
fn resolve_config(args: &ValidateArgs) -> Result<ValidationConfig> {
    let mut config = match &args.config {
        Some(path) => ValidationConfig::from_file(path)?,
        None => ValidationConfig::default(),
    };

    if let Some(spec) = &args.rates {
        let cli_rates: SamplingRateSpec = spec.parse().context("Invalid sampling rates")?;
        config.rates = config.rates.merged(&cli_rates);
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }

    config.check()?;
    Ok(config)
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode> {
    let config = resolve_config(&args)?;

    if config.rates.is_empty() {
        tracing::warn!("no sampling rates provided; every event type is expected at rate 1.0 (full capture)");
    }
    for name in config.rates.unrecognized() {
        tracing::warn!("ignoring rate for unknown event type {:?}", name);
    }

    let baseline = extract_file(&args.baseline).with_context(|| {
        format!("Error reading metrics file {}", args.baseline.display())
    })?;
    let sampled = extract_file(&args.sampled)
        .with_context(|| format!("Error reading metrics file {}", args.sampled.display()))?;

    let report = validate_captures(
        &baseline,
        &sampled,
        &config.rates,
        config.tolerance_fraction(),
    )?;

    match args.format {
        OutputFormat::Text => print!("{}", report::render_text(&report)),
        OutputFormat::Json => println!("{}", JsonReport::new(&report).to_json()?),
    }

    let code = match (&report.verdict, args.strict) {
        (_, false) | (Verdict::Pass, true) => ExitCode::SUCCESS,
        (Verdict::Fail { .. }, true) => ExitCode::from(2),
        (Verdict::NoEvaluableData { .. }, true) => ExitCode::from(3),
    };
    Ok(code)
}

fn run_inspect(files: &[PathBuf]) -> ExitCode {
    let mut failures = 0;
    for path in files {
        match inspect::inspect_file(path) {
            Ok(summary) => println!("{}", summary.render()),
            Err(e) => {
                failures += 1;
                println!("{}", "=".repeat(60));
                println!("File: {}", path.display());
                println!("{}", "=".repeat(60));
                println!("ERROR: {e}\n");
            }
        }
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match args.command {
        Command::Validate(validate_args) => run_validate(validate_args),
        Command::Inspect { files } => Ok(run_inspect(&files)),
    }
}
