//! TIFF header and IFD entry parsing.
//!
//! EXIF data is stored as a classic TIFF structure. Every offset in it is
//! relative to the start of the TIFF header, so the "region" handed to this
//! module is always the slice beginning at that header: the whole file for a
//! bare TIFF, or the payload of a JPEG APP1 / PNG `eXIf` / WebP `EXIF` chunk.
//!
//! # TIFF Header Structure
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! # IFD Entry Structure (12 bytes)
//!
//! ```text
//! Bytes 0-1:  Tag id
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Value count
//! Bytes 8-11: Value (if it fits in 4 bytes) or offset to the value
//! ```

use crate::error::TiffError;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, slice_at};

use super::tags::FieldType;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Size of classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one IFD entry in bytes
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the entry count at the start of an IFD
pub const IFD_COUNT_SIZE: usize = 2;

/// Size of the inline value/offset field in an IFD entry
pub const VALUE_FIELD_SIZE: usize = 4;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF region.
///
/// Declared once by the header; every multi-byte value in the region is read
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 at `offset`, or `None` if out of bounds.
    #[inline]
    pub fn read_u16(self, data: &[u8], offset: usize) -> Option<u16> {
        match self {
            ByteOrder::LittleEndian => read_u16_le(data, offset),
            ByteOrder::BigEndian => read_u16_be(data, offset),
        }
    }

    /// Read a u32 at `offset`, or `None` if out of bounds.
    #[inline]
    pub fn read_u32(self, data: &[u8], offset: usize) -> Option<u32> {
        match self {
            ByteOrder::LittleEndian => read_u32_le(data, offset),
            ByteOrder::BigEndian => read_u32_be(data, offset),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the region
    pub byte_order: ByteOrder,

    /// Offset to IFD0, relative to the start of the header
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse a TIFF header from the start of `bytes`.
    ///
    /// Only the byte-order marker is validated. The version field is not
    /// enforced because EXIF writers in the wild occasionally get it wrong,
    /// and an out-of-range IFD offset is caught by the walk's bounds checks.
    ///
    /// # Errors
    /// - `HeaderTooShort` if fewer than 8 bytes are available
    /// - `InvalidByteOrder` if bytes 0-1 are neither II nor MM
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::HeaderTooShort {
                required: TIFF_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        // Read as little-endian because we're checking for specific byte patterns
        let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidByteOrder(magic)),
        };

        let version = byte_order.read_u16(bytes, 2).unwrap_or_default();
        if version != VERSION_TIFF {
            tracing::debug!(version, "TIFF header has unexpected version");
        }

        let first_ifd_offset = byte_order.read_u32(bytes, 4).unwrap_or_default();

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// One 12-byte IFD entry. Transient: exists only while its IFD is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag id
    pub tag: u16,

    /// Decoded field type, `None` for types this crate does not know
    pub field_type: Option<FieldType>,

    /// Raw field type as stored
    pub field_type_raw: u16,

    /// Number of values
    pub count: u32,

    /// The raw value/offset field, still in file byte order
    pub value_offset_bytes: [u8; VALUE_FIELD_SIZE],
}

impl IfdEntry {
    /// Parse the entry starting at `offset`, or `None` if it runs past the region.
    pub fn parse(region: &[u8], offset: usize, byte_order: ByteOrder) -> Option<Self> {
        let bytes = slice_at(region, offset, IFD_ENTRY_SIZE)?;

        let tag = byte_order.read_u16(bytes, 0)?;
        let field_type_raw = byte_order.read_u16(bytes, 2)?;
        let count = byte_order.read_u32(bytes, 4)?;
        let value_offset_bytes = bytes[8..12].try_into().ok()?;

        Some(IfdEntry {
            tag,
            field_type: FieldType::from_u16(field_type_raw),
            field_type_raw,
            count,
            value_offset_bytes,
        })
    }

    /// Interpret the value field as an offset into the region.
    #[inline]
    pub fn value_offset(&self, byte_order: ByteOrder) -> usize {
        byte_order
            .read_u32(&self.value_offset_bytes, 0)
            .unwrap_or_default() as usize
    }

    /// Total size of the value in bytes, or `None` for unknown types or overflow.
    pub fn value_byte_size(&self) -> Option<usize> {
        let field_type = self.field_type?;
        field_type.size_in_bytes().checked_mul(self.count as usize)
    }

    /// Whether the value is stored inline in the entry.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.value_byte_size()
            .is_some_and(|size| size <= VALUE_FIELD_SIZE)
    }

    /// Borrow the value bytes, inline or at the pointed offset.
    ///
    /// Returns `None` for unknown types or when the pointed range leaves the region.
    pub fn value_bytes<'a>(&'a self, region: &'a [u8], byte_order: ByteOrder) -> Option<&'a [u8]> {
        let size = self.value_byte_size()?;
        if size <= VALUE_FIELD_SIZE {
            Some(&self.value_offset_bytes[..size])
        } else {
            slice_at(region, self.value_offset(byte_order), size)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
