//! Test utilities for integration tests.
//!
//! Builders for synthetic TIFF/EXIF blocks and the JPEG, PNG and WebP
//! containers that carry them.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};

// =============================================================================
// TIFF Builder
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

/// A typed IFD value.
#[derive(Clone, Debug)]
pub enum Value {
    Byte(u8),
    Ascii(String),
    Short(u16),
    Long(u32),
    Rational(Vec<(u32, u32)>),
    Undefined(Vec<u8>),
}

impl Value {
    pub fn ascii(s: &str) -> Self {
        Value::Ascii(s.to_string())
    }

    pub fn rational(numerator: u32, denominator: u32) -> Self {
        Value::Rational(vec![(numerator, denominator)])
    }
}

/// Builder for one IFD's entries.
#[derive(Clone, Debug, Default)]
pub struct IfdBuilder {
    entries: Vec<(u16, Value)>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, tag: u16, value: Value) -> Self {
        self.entries.push((tag, value));
        self
    }
}

/// Builder for a TIFF region: IFD0 plus optional EXIF and GPS sub-IFDs.
///
/// Layout is header, IFD0, EXIF IFD, GPS IFD, each IFD followed by its
/// out-of-line values.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    ifd0: IfdBuilder,
    exif: Option<IfdBuilder>,
    gps: Option<IfdBuilder>,
}

const EXIF_POINTER_TAG: u16 = 0x8769;
const GPS_POINTER_TAG: u16 = 0x8825;

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            ifd0: IfdBuilder::new(),
            exif: None,
            gps: None,
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn ifd0(mut self, ifd: IfdBuilder) -> Self {
        self.ifd0 = ifd;
        self
    }

    pub fn exif(mut self, ifd: IfdBuilder) -> Self {
        self.exif = Some(ifd);
        self
    }

    pub fn gps(mut self, ifd: IfdBuilder) -> Self {
        self.gps = Some(ifd);
        self
    }

    /// Build the TIFF region.
    pub fn build(self) -> Vec<u8> {
        const HEADER_SIZE: u32 = 8;

        // Pointer entries are inline LONGs, so IFD sizes do not depend on
        // their values; encode once with placeholders to learn the layout.
        let placeholder = self.ifd0_with_pointers(0, 0);
        let ifd0_len = self.encode_ifd(&placeholder, HEADER_SIZE).len() as u32;

        let exif_offset = HEADER_SIZE + ifd0_len;
        let exif_bytes = self
            .exif
            .as_ref()
            .map(|ifd| self.encode_ifd(ifd, exif_offset))
            .unwrap_or_default();

        let gps_offset = exif_offset + exif_bytes.len() as u32;
        let gps_bytes = self
            .gps
            .as_ref()
            .map(|ifd| self.encode_ifd(ifd, gps_offset))
            .unwrap_or_default();

        let ifd0 = self.ifd0_with_pointers(exif_offset, gps_offset);

        let mut data = Vec::new();
        match self.byte_order {
            ByteOrderType::LittleEndian => data.extend_from_slice(b"II"),
            ByteOrderType::BigEndian => data.extend_from_slice(b"MM"),
        }
        data.extend_from_slice(&self.u16(42));
        data.extend_from_slice(&self.u32(HEADER_SIZE));
        data.extend(self.encode_ifd(&ifd0, HEADER_SIZE));
        data.extend(exif_bytes);
        data.extend(gps_bytes);
        data
    }

    fn ifd0_with_pointers(&self, exif_offset: u32, gps_offset: u32) -> IfdBuilder {
        let mut ifd = self.ifd0.clone();
        if self.exif.is_some() {
            ifd = ifd.entry(EXIF_POINTER_TAG, Value::Long(exif_offset));
        }
        if self.gps.is_some() {
            ifd = ifd.entry(GPS_POINTER_TAG, Value::Long(gps_offset));
        }
        ifd
    }

    /// Encode an IFD that starts at `start`, with its values appended after it.
    fn encode_ifd(&self, ifd: &IfdBuilder, start: u32) -> Vec<u8> {
        let entry_count = ifd.entries.len();
        let data_start = start + (2 + entry_count * 12 + 4) as u32;

        let mut table = Vec::new();
        let mut values = Vec::new();
        table.extend_from_slice(&self.u16(entry_count as u16));

        for (tag, value) in &ifd.entries {
            let (field_type, count, bytes) = self.encode_value(value);
            table.extend_from_slice(&self.u16(*tag));
            table.extend_from_slice(&self.u16(field_type));
            table.extend_from_slice(&self.u32(count));
            if bytes.len() <= 4 {
                let mut inline = [0u8; 4];
                inline[..bytes.len()].copy_from_slice(&bytes);
                table.extend_from_slice(&inline);
            } else {
                table.extend_from_slice(&self.u32(data_start + values.len() as u32));
                values.extend_from_slice(&bytes);
                if values.len() % 2 == 1 {
                    values.push(0);
                }
            }
        }

        // No next IFD
        table.extend_from_slice(&self.u32(0));
        table.extend(values);
        table
    }

    fn encode_value(&self, value: &Value) -> (u16, u32, Vec<u8>) {
        match value {
            Value::Byte(v) => (1, 1, vec![*v]),
            Value::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            Value::Short(v) => (3, 1, self.u16(*v).to_vec()),
            Value::Long(v) => (4, 1, self.u32(*v).to_vec()),
            Value::Rational(parts) => {
                let mut bytes = Vec::new();
                for (numerator, denominator) in parts {
                    bytes.extend_from_slice(&self.u32(*numerator));
                    bytes.extend_from_slice(&self.u32(*denominator));
                }
                (5, parts.len() as u32, bytes)
            }
            Value::Undefined(bytes) => (7, bytes.len() as u32, bytes.clone()),
        }
    }

    fn u16(&self, value: u16) -> [u8; 2] {
        match self.byte_order {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    fn u32(&self, value: u32) -> [u8; 4] {
        match self.byte_order {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A TIFF region whose IFD0 holds a single `Make` entry.
pub fn tiff_with_make(make: &str) -> Vec<u8> {
    TiffBuilder::new()
        .ifd0(IfdBuilder::new().entry(0x010F, Value::ascii(make)))
        .build()
}

// =============================================================================
// JPEG
// =============================================================================

pub const APP1: u8 = 0xE1;
pub const COM: u8 = 0xFE;

/// SOI, one length-prefixed segment per `(marker, payload)`, then EOI.
pub fn jpeg_with_segments(segments: &[(u8, Vec<u8>)]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    for (marker, payload) in segments {
        data.extend_from_slice(&jpeg_segment(*marker, payload));
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

pub fn jpeg_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0xFF, marker];
    data.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    data.extend_from_slice(payload);
    data
}

/// APP1 payload wrapping a TIFF region in the `Exif\0\0` identifier.
pub fn exif_app1(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    payload
}

// =============================================================================
// PNG
// =============================================================================

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// One chunk with a correct CRC.
pub fn png_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    let mut crc = Crc::new();
    crc.update(chunk_type);
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

/// Signature, the given chunks, then IEND.
pub fn png_with_chunks(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out.extend_from_slice(&png_chunk(b"IEND", &[]));
    out
}

pub fn png_ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut data = width.to_be_bytes().to_vec();
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
    png_chunk(b"IHDR", &data)
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

// =============================================================================
// WebP
// =============================================================================

/// One RIFF sub-chunk, padded to even length.
pub fn riff_chunk(fourcc: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = fourcc.to_vec();
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// `RIFF` header with a correct size, `WEBP`, then the chunks.
pub fn webp_with_chunks(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body = chunks.concat();
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
    out.extend_from_slice(b"WEBP");
    out.extend_from_slice(&body);
    out
}

/// VP8X chunk with raw (stored minus one) canvas fields.
pub fn vp8x_chunk(flags: u8, raw_width: u32, raw_height: u32) -> Vec<u8> {
    let mut payload = vec![flags, 0, 0, 0];
    payload.extend_from_slice(&raw_width.to_le_bytes()[..3]);
    payload.extend_from_slice(&raw_height.to_le_bytes()[..3]);
    riff_chunk(b"VP8X", &payload)
}
