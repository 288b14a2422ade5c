//! Per-file results for the command-line host.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::{IoError, ParseError};
use crate::format::{detect_format, ImageFormat};
use crate::metadata::MetadataMap;
use crate::parser::parse_image;

/// Read a whole file, refusing anything larger than `max_size` bytes.
pub fn read_image(path: &Path, max_size: u64) -> Result<Vec<u8>, IoError> {
    let display = path.display().to_string();
    let read_error = |e: std::io::Error| IoError::Read {
        path: display.clone(),
        message: e.to_string(),
    };

    let size = fs::metadata(path).map_err(read_error)?.len();
    if size > max_size {
        return Err(IoError::TooLarge {
            path: display.clone(),
            size,
            max: max_size,
        });
    }

    fs::read(path).map_err(read_error)
}

/// Read at most the first `len` bytes of a file.
pub fn read_prefix(path: &Path, len: u64) -> Result<Vec<u8>, IoError> {
    let read_error = |e: std::io::Error| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut data = Vec::new();
    File::open(path)
        .map_err(read_error)?
        .take(len)
        .read_to_end(&mut data)
        .map_err(read_error)?;
    Ok(data)
}

/// Either the extracted map or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutcome {
    Metadata(MetadataMap),
    Error(String),
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub format: ImageFormat,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
    /// Set when the file could not be read or hit a hard parse error.
    #[serde(skip)]
    pub fatal: bool,
}

impl FileReport {
    /// Read and parse the file at `path`.
    pub fn from_path(path: &Path, max_size: u64) -> Self {
        let file = path.display().to_string();
        match read_image(path, max_size) {
            Ok(data) => Self::from_bytes(file, &data),
            Err(e) => Self {
                file,
                format: ImageFormat::Unknown,
                outcome: ReportOutcome::Error(e.to_string()),
                fatal: true,
            },
        }
    }

    /// Parse an in-memory buffer, labelling the report with `file`.
    ///
    /// An image that simply carries no metadata is reported but not fatal.
    pub fn from_bytes(file: impl Into<String>, data: &[u8]) -> Self {
        let format = detect_format(data);
        let (outcome, fatal) = match parse_image(data) {
            Ok(map) => (ReportOutcome::Metadata(map), false),
            Err(e @ ParseError::NoMetadataFound { .. }) => {
                (ReportOutcome::Error(e.to_string()), false)
            }
            Err(e) => (ReportOutcome::Error(e.to_string()), true),
        };

        Self {
            file: file.into(),
            format,
            outcome,
            fatal,
        }
    }

    /// Render as a heading line followed by `key: value` lines.
    pub fn to_text(&self) -> String {
        let mut out = format!("{} ({})\n", self.file, self.format);
        match &self.outcome {
            ReportOutcome::Metadata(map) => {
                for (key, value) in map {
                    out.push_str(&format!("  {}: {}\n", key, value));
                }
            }
            ReportOutcome::Error(message) => {
                out.push_str(&format!("  error: {}\n", message));
            }
        }
        out
    }
}
