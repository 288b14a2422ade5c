//! JPEG segment stream decoding.
//!
//! A JPEG is a sequence of marker segments:
//!
//! ```text
//! FF D8                          Start Of Image (no length)
//! FF xx  LL LL  payload...       Segment; LL LL is big-endian and counts itself
//! ...
//! FF DA  ...                     Start Of Scan: entropy-coded data follows
//! ```
//!
//! Metadata lives entirely before the first SOS, so the walk stops there.
//! APP1 `Exif\0\0` payloads are handed to the TIFF decoder; the other APPn
//! and COM segments are summarized by their well-known prefixes.

use tracing::trace;

use crate::error::{ParseError, WalkError};
use crate::io::{read_u16_be, slice_at};
use crate::metadata::MetadataMap;

use super::walk::{merge_exif, WalkOutcome};
use super::ImageFormat;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// Marker prefix byte (also used as fill byte)
const MARKER_PREFIX: u8 = 0xFF;

/// Temporary marker for arithmetic coding (standalone)
const TEM: u8 = 0x01;
/// Restart markers RST0..RST7 (standalone)
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;
/// Start Of Image (standalone)
const SOI_CODE: u8 = 0xD8;
/// End Of Image
const EOI: u8 = 0xD9;
/// Start Of Scan
const SOS: u8 = 0xDA;
/// Comment
const COM: u8 = 0xFE;

const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const APP2: u8 = 0xE2;
const APP3: u8 = 0xE3;
const APP12: u8 = 0xEC;
const APP13: u8 = 0xED;
const APP14: u8 = 0xEE;
const APP15: u8 = 0xEF;

// =============================================================================
// Segment Prefixes
// =============================================================================

const JFIF_PREFIX: &[u8] = b"JFIF\0";
const JFXX_PREFIX: &[u8] = b"JFXX\0";
const EXIF_PREFIX: &[u8] = b"Exif\0\0";
const XMP_PREFIX: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const ICC_PREFIX: &[u8] = b"ICC_PROFILE\0";
const FPXR_PREFIX: &[u8] = b"FPXR\0\0";
const PHOTOSHOP_PREFIX: &[u8] = b"Photoshop 3.0\0";
const ADOBE_PREFIX: &[u8] = b"Adobe";

/// Shortest APP2 payload treated as an ICC chunk: prefix plus sequence/count bytes.
const MIN_ICC_SEGMENT: usize = ICC_PREFIX.len() + 2;

// =============================================================================
// Segment Walk
// =============================================================================

/// Walk the segments of a JPEG stream, accumulating metadata into `map`.
///
/// # Errors
/// `InvalidSignature` if the buffer does not start with SOI. Everything after
/// the signature degrades: a truncated segment stops the walk with what has
/// been decoded so far.
pub fn walk_jpeg(data: &[u8], map: &mut MetadataMap) -> Result<WalkOutcome, ParseError> {
    if !data.starts_with(&SOI) {
        return Err(ParseError::InvalidSignature {
            format: ImageFormat::Jpeg,
        });
    }

    let mut pos = SOI.len();
    loop {
        let Some(marker) = slice_at(data, pos, 2) else {
            return Ok(WalkOutcome::complete());
        };

        if marker[0] != MARKER_PREFIX {
            pos += 2;
            continue;
        }

        let code = marker[1];
        match code {
            MARKER_PREFIX => {
                // Fill byte before the real marker
                pos += 1;
                continue;
            }
            SOS | EOI => return Ok(WalkOutcome::complete()),
            TEM | SOI_CODE | RST0..=RST7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let Some(length) = read_u16_be(data, pos + 2) else {
            return Ok(WalkOutcome::stopped(WalkError::truncated(pos + 2, 2, data.len())));
        };
        let length = length as usize;
        if length < 2 {
            return Ok(WalkOutcome::stopped(WalkError::TruncatedData {
                offset: pos + 2,
                needed: 2,
                available: length,
            }));
        }

        let payload_offset = pos + 4;
        let Some(payload) = slice_at(data, payload_offset, length - 2) else {
            return Ok(WalkOutcome::stopped(WalkError::truncated(
                payload_offset,
                length - 2,
                data.len(),
            )));
        };

        trace!(marker = code, offset = pos, length, "JPEG segment");
        decode_segment(code, payload, map);

        pos += 2 + length;
    }
}

/// Decode one segment payload by marker.
fn decode_segment(code: u8, payload: &[u8], map: &mut MetadataMap) {
    match code {
        COM => map.insert("JPEG_Comment", String::from_utf8_lossy(payload)),
        APP0 => decode_app0(payload, map),
        APP1 => decode_app1(payload, map),
        APP2 => decode_app2(payload, map),
        APP3..=APP12 | APP15 => {
            let key = format!("APP{}_Data", code - APP0);
            map.insert(key, printable_or_size(payload));
        }
        APP13 => {
            if payload.starts_with(PHOTOSHOP_PREFIX) {
                map.insert("Photoshop_IRB", present_with_size(payload));
            } else if !payload.is_empty() {
                map.insert("APP13_Data", byte_count(payload));
            }
        }
        APP14 => {
            if payload.starts_with(ADOBE_PREFIX) {
                map.insert("Adobe_APP14", "present");
            } else if !payload.is_empty() {
                map.insert("APP14_Data", byte_count(payload));
            }
        }
        _ => {}
    }
}

fn decode_app0(payload: &[u8], map: &mut MetadataMap) {
    if payload.starts_with(JFIF_PREFIX) && payload.len() >= JFIF_PREFIX.len() + 2 {
        let major = payload[JFIF_PREFIX.len()];
        let minor = payload[JFIF_PREFIX.len() + 1];
        map.insert("JFIF_Version", format!("{}.{:02}", major, minor));
    } else if payload.starts_with(JFXX_PREFIX) {
        map.insert("JFXX_Extension", "present");
    } else if !payload.is_empty() {
        map.insert("APP0_Data", byte_count(payload));
    }
}

fn decode_app1(payload: &[u8], map: &mut MetadataMap) {
    if let Some(tiff) = payload.strip_prefix(EXIF_PREFIX) {
        merge_exif(tiff, map);
    } else if let Some(xmp) = payload.strip_prefix(XMP_PREFIX) {
        map.insert("XMP_Metadata", String::from_utf8_lossy(xmp));
    } else if !payload.is_empty() {
        map.insert("APP1_Data", byte_count(payload));
    }
}

fn decode_app2(payload: &[u8], map: &mut MetadataMap) {
    if payload.len() >= MIN_ICC_SEGMENT && payload.starts_with(ICC_PREFIX) {
        map.insert("ICC_Profile", present_with_size(payload));
    } else if payload.starts_with(FPXR_PREFIX) {
        map.insert("FlashPix", "present");
    } else if !payload.is_empty() {
        map.insert("APP2_Data", byte_count(payload));
    }
}

// =============================================================================
// Rendering Helpers
// =============================================================================

/// Whether at least 80% of the bytes are printable ASCII or common whitespace.
fn is_mostly_printable(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    let printable = data
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r'))
        .count();
    printable * 5 >= data.len() * 4
}

fn printable_or_size(payload: &[u8]) -> String {
    if is_mostly_printable(payload) {
        String::from_utf8_lossy(payload).into_owned()
    } else {
        format!("({} bytes binary)", payload.len())
    }
}

fn byte_count(payload: &[u8]) -> String {
    format!("({} bytes)", payload.len())
}

fn present_with_size(payload: &[u8]) -> String {
    format!("present ({} bytes)", payload.len())
}

// =============================================================================
// Tests
// =============================================================================
