//! # imgmeta
//!
//! Extract embedded metadata from raw image bytes without decoding pixels.
//!
//! The container format is sniffed from the leading bytes, then walked
//! directly: JPEG segments, PNG chunks (with CRC-32 checks and inflated text)
//! and WebP RIFF chunks. Every EXIF payload, wherever it is embedded, goes
//! through one shared TIFF/IFD walker. HEIF is recognized but not decoded.
//!
//! ## Architecture
//!
//! - [`io`] - Bounds-checked byte reads over the input buffer
//! - [`mod@format`] - Signature detection and the per-container walkers
//! - [`parser`] - Decoder trait, static registry and dispatch
//! - [`metadata`] - The flat field map every decoder fills
//! - [`report`] - Per-file results for the command-line host
//! - [`config`] - CLI configuration types
//!
//! Malformed input never panics. A truncated or inconsistent structure stops
//! the walk and whatever was decoded up to that point is returned.
//!
//! ## Example
//!
//! ```rust,no_run
//! use imgmeta::{parse_image, ParseError};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! match parse_image(&bytes) {
//!     Ok(metadata) => {
//!         for (field, value) in &metadata {
//!             println!("{}: {}", field, value);
//!         }
//!     }
//!     Err(ParseError::NoMetadataFound { format }) => println!("{} without metadata", format),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod metadata;
pub mod parser;
pub mod report;

// Re-export commonly used types
pub use config::{Cli, Command, DetectConfig, OutputFormat, ParseConfig};
pub use error::{IoError, ParseError, TiffError, WalkError};
pub use format::tiff::{parse_tiff, ByteOrder, ExifTag, FieldType, GpsTag, TiffHeader};
pub use format::{detect_format, is_tiff_header, ImageFormat, WalkOutcome};
pub use metadata::MetadataMap;
pub use parser::{
    get_parser, parse_image, supported_formats, ExifDecoder, HeifDecoder, MetadataDecoder,
    PngDecoder, WebpDecoder,
};
pub use report::{read_image, read_prefix, FileReport, ReportOutcome};
