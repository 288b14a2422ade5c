//! Format detection for raw image bytes.
//!
//! This module classifies a buffer by its leading magic bytes alone. No
//! container structure is walked here; that is left to the decoders.
//!
//! Signatures are checked in a fixed priority order and the first match wins:
//!
//! - **JPEG**: `FF D8 FF`
//! - **TIFF**: `49 49 2A 00` (II) or `4D 4D 00 2A` (MM)
//! - **PNG**: `89 50 4E 47 0D 0A 1A 0A`
//! - **WebP**: `RIFF` at bytes 0-3 and `WEBP` at bytes 8-11
//! - **HEIF**: `ftyp` at bytes 4-7

use std::fmt;

use serde::Serialize;

// =============================================================================
// ImageFormat
// =============================================================================

/// Detected container format.
///
/// The set is closed: every buffer maps to exactly one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormat {
    /// No known signature matched
    Unknown,
    /// JPEG segment stream
    #[serde(rename = "JPEG")]
    Jpeg,
    /// Bare TIFF (EXIF-structured) file
    #[serde(rename = "TIFF")]
    Tiff,
    /// PNG chunk stream
    #[serde(rename = "PNG")]
    Png,
    /// WebP RIFF container
    WebP,
    /// HEIF/HEIC ISO-BMFF container (recognized, not decoded)
    #[serde(rename = "HEIF")]
    Heif,
}

impl ImageFormat {
    /// All variants, in detection priority order (Unknown last).
    pub const ALL: [ImageFormat; 6] = [
        ImageFormat::Jpeg,
        ImageFormat::Tiff,
        ImageFormat::Png,
        ImageFormat::WebP,
        ImageFormat::Heif,
        ImageFormat::Unknown,
    ];

    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            ImageFormat::Unknown => "Unknown",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Png => "PNG",
            ImageFormat::WebP => "WebP",
            ImageFormat::Heif => "HEIF",
        }
    }

    /// Whether a decoder actually extracts metadata for this format.
    pub const fn is_implemented(&self) -> bool {
        !matches!(self, ImageFormat::Unknown | ImageFormat::Heif)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Format Detection
// =============================================================================

/// Minimum bytes needed to recognize a JPEG.
const MIN_JPEG_BYTES: usize = 3;

/// Minimum bytes needed for every other signature.
const MIN_HEADER_BYTES: usize = 12;

const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const TIFF_LE_SIGNATURE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
const TIFF_BE_SIGNATURE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WEBP_TAG: &[u8; 4] = b"WEBP";
const FTYP_TAG: &[u8; 4] = b"ftyp";

/// Detect the container format of a buffer from its leading bytes.
///
/// Total and pure: buffers that are too short or match nothing yield
/// [`ImageFormat::Unknown`].
pub fn detect_format(data: &[u8]) -> ImageFormat {
    if data.len() >= MIN_JPEG_BYTES && data[..3] == JPEG_SIGNATURE {
        return ImageFormat::Jpeg;
    }

    if data.len() < MIN_HEADER_BYTES {
        return ImageFormat::Unknown;
    }

    if is_tiff_header(data) {
        ImageFormat::Tiff
    } else if data[..8] == PNG_SIGNATURE {
        ImageFormat::Png
    } else if &data[0..4] == RIFF_TAG && &data[8..12] == WEBP_TAG {
        ImageFormat::WebP
    } else if &data[4..8] == FTYP_TAG {
        ImageFormat::Heif
    } else {
        ImageFormat::Unknown
    }
}

/// Check if bytes start with a classic TIFF header (byte order plus version 42).
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && (bytes[..4] == TIFF_LE_SIGNATURE || bytes[..4] == TIFF_BE_SIGNATURE)
}

// =============================================================================
// Tests
// =============================================================================
