//! Container decoders for still-image formats.
//!
//! Each container is walked directly over the input buffer. Every walker
//! funnels embedded EXIF payloads through the shared [`tiff`] decoder, which
//! writes into the same [`MetadataMap`](crate::MetadataMap) as the container.
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to identify a buffer by its leading bytes:
//!
//! - **JPEG**: `FF D8 FF`
//! - **TIFF**: `II*\0` or `MM\0*`
//! - **PNG**: the 8-byte PNG signature
//! - **WebP**: `RIFF` container with `WEBP` form type
//! - **HEIF**: `ftyp` box at offset 4 (recognized only)

pub mod detect;
pub mod heif;
pub mod jpeg;
pub mod png;
pub mod tiff;
pub mod walk;
pub mod webp;

pub use detect::{detect_format, is_tiff_header, ImageFormat, PNG_SIGNATURE};
pub use heif::walk_heif;
pub use jpeg::walk_jpeg;
pub use png::walk_png;
pub use walk::{WalkOutcome, EXIF_PARSE_ERROR_FIELD};
pub use webp::walk_webp;
