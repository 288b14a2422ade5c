//! Command-line configuration for the `imgmeta` binary.
//!
//! Options can be given as flags or through environment variables with the
//! `IMGMETA_` prefix:
//!
//! - `IMGMETA_OUTPUT` - Output format for `parse` (default: json)
//! - `IMGMETA_MAX_SIZE` - Largest file `parse` will read, in bytes (default: 64 MiB)
//!
//! Logging follows `RUST_LOG` when set.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// =============================================================================
// Default Values
// =============================================================================

/// Default upper bound on input file size (64 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 64 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// imgmeta - Extract embedded metadata from JPEG, TIFF, PNG and WebP files.
///
/// Reads EXIF, text, color-profile and animation descriptors straight from the
/// container structure without decoding any pixels.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgmeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Split into the subcommand, carrying the global flags along.
    pub fn into_command(self) -> (Command, bool) {
        (self.command, self.verbose)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract metadata from one or more image files.
    Parse(ParseConfig),

    /// Print the detected container format of each file.
    Detect(DetectConfig),

    /// List the formats metadata can be extracted from.
    Formats,
}

/// How `parse` prints its results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON, one object per file
    #[default]
    Json,
    /// `key: value` lines under a per-file heading
    Text,
}

#[derive(Args, Debug, Clone)]
pub struct ParseConfig {
    /// Image files to read.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Json, env = "IMGMETA_OUTPUT")]
    pub output: OutputFormat,

    /// Refuse files larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE, env = "IMGMETA_MAX_SIZE")]
    pub max_size: u64,
}

impl ParseConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() {
            return Err("At least one input file is required".to_string());
        }

        if self.max_size == 0 {
            return Err(
                "max_size must be greater than 0. Set --max-size or IMGMETA_MAX_SIZE".to_string(),
            );
        }

        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct DetectConfig {
    /// Image files to inspect.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================
