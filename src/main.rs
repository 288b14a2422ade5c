//! imgmeta - Extract embedded image metadata from the command line.
//!
//! Results go to stdout; logs go to stderr.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgmeta::{
    config::{Cli, Command, DetectConfig, OutputFormat, ParseConfig},
    detect_format, read_prefix, supported_formats, FileReport,
};

fn main() -> ExitCode {
    let (command, verbose) = Cli::parse().into_command();
    init_logging(verbose);

    match command {
        Command::Parse(config) => run_parse(config),
        Command::Detect(config) => run_detect(config),
        Command::Formats => run_formats(),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "imgmeta=debug"
    } else {
        "imgmeta=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Parse Command
// =============================================================================

fn run_parse(config: ParseConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let reports: Vec<FileReport> = config
        .files
        .iter()
        .map(|path| FileReport::from_path(path, config.max_size))
        .collect();

    for report in reports.iter().filter(|r| r.fatal) {
        debug!(file = %report.file, "file failed");
    }

    match config.output {
        OutputFormat::Json => match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize results: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", report.to_text());
            }
        }
    }

    if reports.iter().any(|r| r.fatal) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// =============================================================================
// Detect Command
// =============================================================================

/// Every signature lies within the first 12 bytes.
const DETECT_PREFIX_LEN: u64 = 12;

fn run_detect(config: DetectConfig) -> ExitCode {
    let mut failed = false;

    for path in &config.files {
        match read_prefix(path, DETECT_PREFIX_LEN) {
            Ok(data) => println!("{}: {}", path.display(), detect_format(&data)),
            Err(e) => {
                error!("{}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// =============================================================================
// Formats Command
// =============================================================================

fn run_formats() -> ExitCode {
    for format in supported_formats() {
        println!("{}", format);
    }
    ExitCode::SUCCESS
}
