//! PNG chunk stream decoding.
//!
//! After the 8-byte signature a PNG is a sequence of chunks:
//!
//! ```text
//! Bytes 0-3:      Data length N (big-endian)
//! Bytes 4-7:      Chunk type (ASCII)
//! Bytes 8..8+N:   Chunk data
//! Next 4 bytes:   CRC-32 over type + data
//! ```
//!
//! Header, text, time, physical-size and color-profile chunks are rendered
//! into the map; `eXIf` is handed to the TIFF decoder. A CRC mismatch is
//! recorded as a field and the walk carries on.

use std::io::Read;

use flate2::read::ZlibDecoder;
use flate2::Crc;
use tracing::{debug, trace};

use crate::error::{ParseError, WalkError};
use crate::io::{read_fourcc, read_u16_be, read_u32_be, slice_at, split_at_nul};
use crate::metadata::MetadataMap;

use super::detect::PNG_SIGNATURE;
use super::walk::{merge_exif, WalkOutcome};
use super::ImageFormat;

// =============================================================================
// Chunk Types
// =============================================================================

const IHDR: [u8; 4] = *b"IHDR";
const TEXT: [u8; 4] = *b"tEXt";
const ZTXT: [u8; 4] = *b"zTXt";
const ITXT: [u8; 4] = *b"iTXt";
const EXIF: [u8; 4] = *b"eXIf";
const PHYS: [u8; 4] = *b"pHYs";
const TIME: [u8; 4] = *b"tIME";
const ICCP: [u8; 4] = *b"iCCP";
const SPLT: [u8; 4] = *b"sPLT";
const IEND: [u8; 4] = *b"IEND";

/// Length + type
const CHUNK_HEADER_SIZE: usize = 8;
/// Trailing CRC-32
const CHUNK_CRC_SIZE: usize = 4;

/// The only compression method PNG defines (zlib deflate).
const COMPRESSION_DEFLATE: u8 = 0;

/// Upper bound on inflated text, so a tiny chunk cannot expand without limit.
const MAX_INFLATED_TEXT: u64 = 16 * 1024 * 1024;

/// Prefix for every PNG-specific field name.
const FIELD_PREFIX: &str = "PNG_";

// =============================================================================
// Chunk Descriptor
// =============================================================================

/// One chunk. Transient: exists only while the walk visits it.
#[derive(Debug, Clone, Copy)]
struct PngChunk<'a> {
    offset: usize,
    chunk_type: [u8; 4],
    data: &'a [u8],
    stored_crc: u32,
}

impl PngChunk<'_> {
    fn type_name(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }

    fn computed_crc(&self) -> u32 {
        let mut crc = Crc::new();
        crc.update(&self.chunk_type);
        crc.update(self.data);
        crc.sum()
    }
}

/// Read the chunk at `offset`, or describe why it does not fit.
fn read_chunk(data: &[u8], offset: usize) -> Result<PngChunk<'_>, WalkError> {
    let header_error = || WalkError::truncated(offset, CHUNK_HEADER_SIZE, data.len());
    let length = read_u32_be(data, offset).ok_or_else(header_error)? as usize;
    let chunk_type = read_fourcc(data, offset + 4).ok_or_else(header_error)?;

    let data_offset = offset + CHUNK_HEADER_SIZE;
    let body_error = || {
        WalkError::truncated(data_offset, length.saturating_add(CHUNK_CRC_SIZE), data.len())
    };
    let chunk_data = slice_at(data, data_offset, length).ok_or_else(body_error)?;
    let stored_crc = read_u32_be(data, data_offset + length).ok_or_else(body_error)?;

    Ok(PngChunk {
        offset,
        chunk_type,
        data: chunk_data,
        stored_crc,
    })
}

// =============================================================================
// Chunk Walk
// =============================================================================

/// Walk the chunks of a PNG stream, accumulating metadata into `map`.
///
/// # Errors
/// `InvalidSignature` if the buffer does not start with the PNG signature.
/// A chunk that runs past the buffer stops the walk, keeping earlier fields.
pub fn walk_png(data: &[u8], map: &mut MetadataMap) -> Result<WalkOutcome, ParseError> {
    if !data.starts_with(&PNG_SIGNATURE) {
        return Err(ParseError::InvalidSignature {
            format: ImageFormat::Png,
        });
    }

    let mut pos = PNG_SIGNATURE.len();
    while pos < data.len() {
        let chunk = match read_chunk(data, pos) {
            Ok(chunk) => chunk,
            Err(error) => return Ok(WalkOutcome::stopped(error)),
        };
        trace!(chunk = %chunk.type_name(), offset = pos, length = chunk.data.len(), "PNG chunk");

        let computed = chunk.computed_crc();
        if computed != chunk.stored_crc {
            let error = WalkError::ChecksumMismatch {
                chunk: chunk.type_name(),
                offset: chunk.offset,
                stored: chunk.stored_crc,
                computed,
            };
            debug!(%error, "PNG chunk checksum mismatch");
            map.insert(format!("PNG_CRC_Mismatch_{}", chunk.type_name()), error.to_string());
        }

        if chunk.chunk_type == IEND {
            return Ok(WalkOutcome::complete());
        }

        if let Err(error) = decode_chunk(&chunk, map) {
            debug!(%error, "skipping PNG field");
        }

        pos += CHUNK_HEADER_SIZE + chunk.data.len() + CHUNK_CRC_SIZE;
    }

    Ok(WalkOutcome::complete())
}

/// Decode one chunk. An error only drops that chunk's field.
fn decode_chunk(chunk: &PngChunk<'_>, map: &mut MetadataMap) -> Result<(), WalkError> {
    match chunk.chunk_type {
        IHDR => decode_ihdr(chunk.data, map),
        TEXT => decode_text(chunk.data, map),
        ZTXT => decode_ztxt(chunk.data, map)?,
        ITXT => decode_itxt(chunk.data, map)?,
        EXIF => merge_exif(chunk.data, map),
        PHYS => decode_phys(chunk.data, map),
        TIME => decode_time(chunk.data, map),
        ICCP => decode_iccp(chunk.data, map),
        SPLT => {
            let name = split_at_nul(chunk.data).map_or(chunk.data, |(name, _)| name);
            map.insert("PNG_SuggestedPalette", latin1(name));
        }
        _ => {}
    }
    Ok(())
}

// =============================================================================
// Chunk Decoders
// =============================================================================

fn decode_ihdr(data: &[u8], map: &mut MetadataMap) {
    let (Some(width), Some(height), Some(rest)) = (
        read_u32_be(data, 0),
        read_u32_be(data, 4),
        slice_at(data, 8, 5),
    ) else {
        debug!(length = data.len(), "IHDR chunk too short");
        return;
    };
    let (bit_depth, color_type, compression, filter, interlace) =
        (rest[0], rest[1], rest[2], rest[3], rest[4]);

    map.insert("PNG_Width", width.to_string());
    map.insert("PNG_Height", height.to_string());
    map.insert("PNG_BitDepth", bit_depth.to_string());
    map.insert("PNG_ColorType", color_type_name(color_type));
    map.insert("PNG_Compression", compression.to_string());
    map.insert("PNG_Filter", filter.to_string());
    map.insert(
        "PNG_Interlace",
        match interlace {
            0 => "None".to_string(),
            1 => "Adam7".to_string(),
            other => other.to_string(),
        },
    );
}

fn color_type_name(color_type: u8) -> String {
    match color_type {
        0 => "Grayscale".to_string(),
        2 => "RGB".to_string(),
        3 => "Indexed".to_string(),
        4 => "Grayscale+Alpha".to_string(),
        6 => "RGBA".to_string(),
        other => format!("Unknown ({})", other),
    }
}

/// `keyword\0text`, both Latin-1.
fn decode_text(data: &[u8], map: &mut MetadataMap) {
    let Some((keyword, text)) = split_at_nul(data) else {
        debug!("tEXt chunk without keyword separator");
        return;
    };
    map.insert(text_key(keyword), latin1(text));
}

/// `keyword\0`, compression method, zlib stream of Latin-1 text.
fn decode_ztxt(data: &[u8], map: &mut MetadataMap) -> Result<(), WalkError> {
    let Some((keyword, rest)) = split_at_nul(data) else {
        debug!("zTXt chunk without keyword separator");
        return Ok(());
    };
    let Some((&method, compressed)) = rest.split_first() else {
        return Ok(());
    };
    if method != COMPRESSION_DEFLATE {
        debug!(method, "zTXt uses unsupported compression method");
        return Ok(());
    }

    let key = text_key(keyword);
    let text = inflate(compressed, &key)?;
    map.insert(key, latin1(&text));
    Ok(())
}

/// `keyword\0 flag method language\0 translated\0 text`, text in UTF-8.
fn decode_itxt(data: &[u8], map: &mut MetadataMap) -> Result<(), WalkError> {
    let Some((keyword, rest)) = split_at_nul(data) else {
        debug!("iTXt chunk without keyword separator");
        return Ok(());
    };
    let (Some(&flag), Some(&method)) = (rest.first(), rest.get(1)) else {
        return Ok(());
    };
    let Some((language, rest)) = split_at_nul(&rest[2..]) else {
        return Ok(());
    };
    let Some((translated, text)) = split_at_nul(rest) else {
        return Ok(());
    };

    let mut key = text_key(keyword);
    if !language.is_empty() {
        key.push_str(&format!(" [{}]", String::from_utf8_lossy(language)));
    }
    if !translated.is_empty() {
        key.push_str(&format!(" ({})", String::from_utf8_lossy(translated)));
    }

    let value = if flag == 1 && method == COMPRESSION_DEFLATE {
        String::from_utf8_lossy(&inflate(text, &key)?).into_owned()
    } else {
        String::from_utf8_lossy(text).into_owned()
    };
    map.insert(key, value);
    Ok(())
}

fn decode_phys(data: &[u8], map: &mut MetadataMap) {
    let (Some(x), Some(y), Some(&unit)) = (read_u32_be(data, 0), read_u32_be(data, 4), data.get(8))
    else {
        debug!(length = data.len(), "pHYs chunk too short");
        return;
    };
    map.insert("PNG_PixelsPerUnitX", x.to_string());
    map.insert("PNG_PixelsPerUnitY", y.to_string());
    map.insert(
        "PNG_PixelUnit",
        match unit {
            0 => "Aspect Ratio".to_string(),
            1 => "Meter".to_string(),
            other => format!("Unknown ({})", other),
        },
    );
}

fn decode_time(data: &[u8], map: &mut MetadataMap) {
    let (Some(year), Some(rest)) = (read_u16_be(data, 0), slice_at(data, 2, 5)) else {
        debug!(length = data.len(), "tIME chunk too short");
        return;
    };
    map.insert(
        "PNG_LastModified",
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, rest[0], rest[1], rest[2], rest[3], rest[4]
        ),
    );
}

/// Profile name and compression method only; the profile is not inflated.
fn decode_iccp(data: &[u8], map: &mut MetadataMap) {
    let Some((name, rest)) = split_at_nul(data) else {
        debug!("iCCP chunk without name separator");
        return;
    };
    let method = match rest.first() {
        Some(&COMPRESSION_DEFLATE) => "deflate".to_string(),
        Some(other) => format!("unknown ({})", other),
        None => "missing".to_string(),
    };
    map.insert(
        "ICC_Profile",
        format!("present ({}, compression: {})", latin1(name), method),
    );
}

// =============================================================================
// Helpers
// =============================================================================

fn text_key(keyword: &[u8]) -> String {
    format!("{}{}", FIELD_PREFIX, latin1(keyword))
}

/// Decode ISO 8859-1 bytes; every byte maps to the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inflate a zlib stream, bounded by [`MAX_INFLATED_TEXT`].
fn inflate(compressed: &[u8], field: &str) -> Result<Vec<u8>, WalkError> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .take(MAX_INFLATED_TEXT)
        .read_to_end(&mut out)
        .map_err(|e| WalkError::DecompressionFailure {
            field: field.to_string(),
            reason: e.to_string(),
        })?;
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
