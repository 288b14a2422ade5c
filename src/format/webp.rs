//! WebP RIFF container decoding.
//!
//! ```text
//! Bytes 0-3:   "RIFF"
//! Bytes 4-7:   RIFF size (little-endian, excludes the first 8 bytes)
//! Bytes 8-11:  "WEBP"
//! Bytes 12..:  chunks of FourCC, little-endian size, payload, pad to even
//! ```

use tracing::{debug, trace};

use crate::error::{ParseError, WalkError};
use crate::io::{read_fourcc, read_u16_le, read_u24_le, read_u32_le, slice_at};
use crate::metadata::MetadataMap;

use super::walk::{merge_exif, WalkOutcome};
use super::ImageFormat;

const RIFF_HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;

/// JPEG-style APP1 prefix some writers leave in front of the TIFF header.
const EXIF_PREFIX: &[u8] = b"Exif\0\0";

/// A chunk type the decoder knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkKind {
    Exif,
    Xmp,
    Vp8x,
    Iccp,
    Anim,
    Vp8,
    Vp8l,
}

impl ChunkKind {
    fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"EXIF" => Some(Self::Exif),
            b"XMP " => Some(Self::Xmp),
            b"VP8X" => Some(Self::Vp8x),
            b"ICCP" => Some(Self::Iccp),
            b"ANIM" => Some(Self::Anim),
            b"VP8 " => Some(Self::Vp8),
            b"VP8L" => Some(Self::Vp8l),
            _ => None,
        }
    }
}

/// Feature bits of the VP8X flags byte, in the order they are reported.
const VP8X_FEATURES: [(u8, &str); 5] = [
    (0x20, "ICC"),
    (0x10, "Alpha"),
    (0x08, "EXIF"),
    (0x04, "XMP"),
    (0x02, "Animation"),
];

/// Flags byte, 3 reserved bytes, then two 24-bit canvas fields.
const VP8X_MIN_SIZE: usize = 10;
/// Background color (u32) and loop count (u16).
const ANIM_MIN_SIZE: usize = 6;

/// Walk the chunks of a WebP RIFF container, accumulating metadata into `map`.
///
/// The walk is bounded by the declared RIFF size as well as the buffer, so
/// trailing bytes after the container are ignored.
///
/// # Errors
/// `InvalidSignature` if the `RIFF`/`WEBP` header is missing.
pub fn walk_webp(data: &[u8], map: &mut MetadataMap) -> Result<WalkOutcome, ParseError> {
    let riff_size = match (read_fourcc(data, 0), read_u32_le(data, 4), read_fourcc(data, 8)) {
        (Some(riff), Some(size), Some(webp)) if &riff == b"RIFF" && &webp == b"WEBP" => size,
        _ => {
            return Err(ParseError::InvalidSignature {
                format: ImageFormat::WebP,
            })
        }
    };

    let end = data.len().min((riff_size as usize).saturating_add(8));
    let container = &data[..end];

    let mut pos = RIFF_HEADER_SIZE;
    while pos < end {
        let (Some(fourcc), Some(size)) = (read_fourcc(container, pos), read_u32_le(container, pos + 4))
        else {
            return Ok(WalkOutcome::stopped(WalkError::truncated(
                pos,
                CHUNK_HEADER_SIZE,
                end,
            )));
        };
        let size = size as usize;
        let payload_offset = pos + CHUNK_HEADER_SIZE;
        let Some(payload) = slice_at(container, payload_offset, size) else {
            return Ok(WalkOutcome::stopped(WalkError::truncated(
                payload_offset,
                size,
                end,
            )));
        };

        trace!(
            fourcc = %String::from_utf8_lossy(&fourcc),
            offset = pos,
            size,
            "WebP chunk"
        );
        if let Some(kind) = ChunkKind::from_fourcc(&fourcc) {
            decode_chunk(kind, payload, map);
        }

        pos = payload_offset + size + (size & 1);
    }

    Ok(WalkOutcome::complete())
}

fn decode_chunk(kind: ChunkKind, payload: &[u8], map: &mut MetadataMap) {
    match kind {
        ChunkKind::Exif => {
            merge_exif(payload.strip_prefix(EXIF_PREFIX).unwrap_or(payload), map);
        }
        ChunkKind::Xmp => {
            map.insert("XMP_Metadata", String::from_utf8_lossy(payload).into_owned());
        }
        ChunkKind::Vp8x => decode_vp8x(payload, map),
        ChunkKind::Iccp => {
            map.insert("ICC_Profile", format!("present ({} bytes)", payload.len()));
        }
        ChunkKind::Anim => decode_anim(payload, map),
        ChunkKind::Vp8 => map.insert("WebP_Format", "Lossy (VP8)"),
        ChunkKind::Vp8l => map.insert("WebP_Format", "Lossless (VP8L)"),
    }
}

fn decode_vp8x(payload: &[u8], map: &mut MetadataMap) {
    if payload.len() < VP8X_MIN_SIZE {
        debug!(size = payload.len(), "VP8X chunk too short");
        return;
    }

    let flags = payload[0];
    let features: Vec<&str> = VP8X_FEATURES
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    if !features.is_empty() {
        map.insert("WebP_Features", features.join(" "));
    }

    if let (Some(width), Some(height)) = (read_u24_le(payload, 4), read_u24_le(payload, 7)) {
        // Canvas dimensions are stored minus one.
        map.insert("WebP_Canvas_Width", (width + 1).to_string());
        map.insert("WebP_Canvas_Height", (height + 1).to_string());
    }
}

fn decode_anim(payload: &[u8], map: &mut MetadataMap) {
    let (Some(bg_color), Some(loop_count)) = (read_u32_le(payload, 0), read_u16_le(payload, 4))
    else {
        debug!(size = payload.len(), min = ANIM_MIN_SIZE, "ANIM chunk too short");
        return;
    };
    map.insert("WebP_Animation_BgColor", format!("0x{:08X}", bg_color));
    map.insert("WebP_Animation_LoopCount", loop_count.to_string());
}
