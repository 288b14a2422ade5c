use thiserror::Error;

use crate::format::ImageFormat;

/// Top-level errors returned by [`crate::parse_image`] and by every decoder.
///
/// Only signature failures and format-level conditions surface here. Anomalies
/// inside a container walk degrade to partial results instead (see [`WalkError`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Leading magic bytes do not match the format the decoder expects
    #[error("Invalid {format} signature")]
    InvalidSignature { format: ImageFormat },

    /// No container signature matched at all
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: ImageFormat },

    /// The walk finished (or stopped early) without extracting a single field
    #[error("No metadata found in {format} file")]
    NoMetadataFound { format: ImageFormat },

    /// Format is recognized but has no decoder implementation
    #[error("{format} format not yet implemented")]
    NotImplemented { format: ImageFormat },

    /// Standalone TIFF input whose header could not be read
    #[error("Invalid TIFF header: {0}")]
    InvalidTiffHeader(#[from] TiffError),
}

/// Errors that can occur when reading a TIFF header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// Region is too small to contain a TIFF header
    #[error("Header too short: need at least {required} bytes, got {actual}")]
    HeaderTooShort { required: usize, actual: usize },

    /// Byte-order marker is neither II nor MM
    #[error("Invalid TIFF byte order: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),
}

/// Local anomalies found while walking a container.
///
/// These never escape [`crate::parse_image`]: a truncation stops the walk and
/// keeps what was decoded, a decompression failure skips one field, and a
/// checksum mismatch becomes an informational field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    /// A header or declared length runs past the end of the buffer
    #[error("Truncated data at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An inflate stream could not be decoded
    #[error("Decompression failed for {field}: {reason}")]
    DecompressionFailure { field: String, reason: String },

    /// Stored chunk CRC differs from the one computed over type and data
    #[error("CRC mismatch in {chunk} chunk at offset {offset}: stored 0x{stored:08X}, computed 0x{computed:08X}")]
    ChecksumMismatch {
        chunk: String,
        offset: usize,
        stored: u32,
        computed: u32,
    },
}

impl WalkError {
    /// Build a truncation error for a read of `needed` bytes at `offset`.
    pub fn truncated(offset: usize, needed: usize, data_len: usize) -> Self {
        WalkError::TruncatedData {
            offset,
            needed,
            available: data_len.saturating_sub(offset),
        }
    }
}

/// Errors reading an input file before any decoding happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    /// The file could not be opened or read
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// The file exceeds the configured size limit
    #[error("File too large: {path} is {size} bytes, limit is {max}")]
    TooLarge { path: String, size: u64, max: u64 },
}
