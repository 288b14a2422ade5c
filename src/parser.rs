//! Decoder registry and top-level dispatch.
//!
//! The set of decoders is closed: one static instance per container family,
//! looked up by [`ImageFormat`]. JPEG and TIFF share a decoder because both
//! are EXIF carriers that end in the same IFD walk.

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::format::jpeg::SOI;
use crate::format::tiff::parse_tiff;
use crate::format::walk::finish;
use crate::format::{
    detect_format, is_tiff_header, walk_heif, walk_jpeg, walk_png, walk_webp, ImageFormat,
};
use crate::metadata::MetadataMap;

/// A metadata decoder for one or more container formats.
///
/// Decoders hold no state; every call to [`parse`](Self::parse) builds a fresh
/// map and returns it to the caller.
pub trait MetadataDecoder: Send + Sync {
    /// Decode all metadata the container carries.
    ///
    /// # Errors
    /// `InvalidSignature` if the buffer is not this decoder's container,
    /// `NoMetadataFound` if the walk produced no fields.
    fn parse(&self, data: &[u8]) -> Result<MetadataMap, ParseError>;

    /// Whether this decoder handles `format`.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Short human-readable decoder name.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Decoders
// =============================================================================

/// JPEG segment walker, also accepting standalone TIFF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifDecoder;

impl MetadataDecoder for ExifDecoder {
    fn parse(&self, data: &[u8]) -> Result<MetadataMap, ParseError> {
        let mut map = MetadataMap::new();

        if data.starts_with(&SOI) {
            let outcome = walk_jpeg(data, &mut map)?;
            return finish(ImageFormat::Jpeg, map, outcome);
        }

        if is_tiff_header(data) {
            // Offsets in a standalone TIFF are relative to the file start.
            parse_tiff(data, &mut map)?;
            if map.is_empty() {
                return Err(ParseError::NoMetadataFound {
                    format: ImageFormat::Tiff,
                });
            }
            return Ok(map);
        }

        Err(ParseError::InvalidSignature {
            format: ImageFormat::Jpeg,
        })
    }

    fn supports(&self, format: ImageFormat) -> bool {
        matches!(format, ImageFormat::Jpeg | ImageFormat::Tiff)
    }

    fn name(&self) -> &'static str {
        "EXIF"
    }
}

/// PNG chunk walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngDecoder;

impl MetadataDecoder for PngDecoder {
    fn parse(&self, data: &[u8]) -> Result<MetadataMap, ParseError> {
        let mut map = MetadataMap::new();
        let outcome = walk_png(data, &mut map)?;
        finish(ImageFormat::Png, map, outcome)
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Png
    }

    fn name(&self) -> &'static str {
        "PNG"
    }
}

/// WebP RIFF chunk walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpDecoder;

impl MetadataDecoder for WebpDecoder {
    fn parse(&self, data: &[u8]) -> Result<MetadataMap, ParseError> {
        let mut map = MetadataMap::new();
        let outcome = walk_webp(data, &mut map)?;
        finish(ImageFormat::WebP, map, outcome)
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::WebP
    }

    fn name(&self) -> &'static str {
        "WebP"
    }
}

/// Recognizes HEIF so callers can report it as unsupported rather than unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeifDecoder;

impl MetadataDecoder for HeifDecoder {
    fn parse(&self, data: &[u8]) -> Result<MetadataMap, ParseError> {
        let mut map = MetadataMap::new();
        walk_heif(data, &mut map)?;
        Ok(map)
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Heif
    }

    fn name(&self) -> &'static str {
        "HEIF"
    }
}

// =============================================================================
// Registry
// =============================================================================

static EXIF_DECODER: ExifDecoder = ExifDecoder;
static PNG_DECODER: PngDecoder = PngDecoder;
static WEBP_DECODER: WebpDecoder = WebpDecoder;
static HEIF_DECODER: HeifDecoder = HeifDecoder;

/// Look up the decoder for `format`. `None` only for [`ImageFormat::Unknown`].
pub fn get_parser(format: ImageFormat) -> Option<&'static dyn MetadataDecoder> {
    match format {
        ImageFormat::Jpeg | ImageFormat::Tiff => Some(&EXIF_DECODER),
        ImageFormat::Png => Some(&PNG_DECODER),
        ImageFormat::WebP => Some(&WEBP_DECODER),
        ImageFormat::Heif => Some(&HEIF_DECODER),
        ImageFormat::Unknown => None,
    }
}

/// Formats whose decoder actually extracts metadata.
pub fn supported_formats() -> Vec<ImageFormat> {
    ImageFormat::ALL
        .into_iter()
        .filter(ImageFormat::is_implemented)
        .collect()
}

/// Detect the container format and decode its metadata.
///
/// # Errors
/// `UnsupportedFormat` when no signature matches; otherwise whatever the
/// format's decoder returns.
pub fn parse_image(data: &[u8]) -> Result<MetadataMap, ParseError> {
    let format = detect_format(data);
    let Some(decoder) = get_parser(format) else {
        debug!(len = data.len(), "no signature matched");
        return Err(ParseError::UnsupportedFormat { format });
    };

    trace!(%format, decoder = decoder.name(), "dispatching");
    decoder.parse(data)
}

// =============================================================================
// Tests
// =============================================================================
