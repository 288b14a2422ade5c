//! TIFF tag value rendering.
//!
//! Values live either inline in the IFD entry or at an offset in the TIFF
//! region. Every reader here returns `None` instead of failing: a value that
//! cannot be read (bad offset, wrong count, zero denominator) simply produces
//! no field.
//!
//! SHORT, LONG and RATIONAL are only rendered as scalars (`count == 1`).
//! Arrays of those types are left undecoded, with the single exception of the
//! GPS degree/minute/second triples.

use crate::io::{slice_at, trim_trailing_nuls};

use super::parser::{ByteOrder, IfdEntry};
use super::tags::FieldType;

/// Length of the character-code prefix of a UserComment value.
const USER_COMMENT_CHARSET_LEN: usize = 8;

/// Charset tag that needs no annotation.
const CHARSET_ASCII: &str = "ASCII";

// =============================================================================
// ValueReader
// =============================================================================

/// Reads and renders tag values from one TIFF region.
#[derive(Debug, Clone, Copy)]
pub struct ValueReader<'a> {
    region: &'a [u8],
    byte_order: ByteOrder,
}

impl<'a> ValueReader<'a> {
    pub fn new(region: &'a [u8], byte_order: ByteOrder) -> Self {
        Self { region, byte_order }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline]
    pub fn region(&self) -> &'a [u8] {
        self.region
    }

    /// Render an entry according to its field type.
    ///
    /// ASCII is rendered at any count, SHORT/LONG/RATIONAL only as scalars.
    /// UNDEFINED and every other type yield `None`; callers special-case the
    /// tags that need them.
    pub fn render(&self, entry: &IfdEntry) -> Option<String> {
        match entry.field_type? {
            FieldType::Ascii => self.ascii(entry),
            FieldType::Short | FieldType::Long => self.scalar_u32(entry).map(|v| v.to_string()),
            FieldType::Rational => self.rational(entry).map(|v| format!("{:.2}", v)),
            _ => None,
        }
    }

    /// Read an ASCII value with trailing NULs removed.
    pub fn ascii(&self, entry: &IfdEntry) -> Option<String> {
        if entry.field_type != Some(FieldType::Ascii) {
            return None;
        }
        let bytes = entry.value_bytes(self.region, self.byte_order)?;
        non_empty(String::from_utf8_lossy(trim_trailing_nuls(bytes)).into_owned())
    }

    /// Read a scalar SHORT or LONG from the inline value field.
    pub fn scalar_u32(&self, entry: &IfdEntry) -> Option<u32> {
        if entry.count != 1 {
            return None;
        }
        match entry.field_type? {
            FieldType::Short => self
                .byte_order
                .read_u16(&entry.value_offset_bytes, 0)
                .map(u32::from),
            FieldType::Long => self.byte_order.read_u32(&entry.value_offset_bytes, 0),
            _ => None,
        }
    }

    /// Read a scalar BYTE from the inline value field.
    pub fn scalar_u8(&self, entry: &IfdEntry) -> Option<u8> {
        (entry.count == 1 && entry.field_type == Some(FieldType::Byte))
            .then_some(entry.value_offset_bytes[0])
    }

    /// Read a scalar RATIONAL as a float; a zero denominator yields `None`.
    pub fn rational(&self, entry: &IfdEntry) -> Option<f64> {
        if entry.count != 1 {
            return None;
        }
        self.rationals(entry)?.first().copied()
    }

    /// Read every RATIONAL of an entry; any zero denominator yields `None`.
    pub fn rationals(&self, entry: &IfdEntry) -> Option<Vec<f64>> {
        if entry.field_type != Some(FieldType::Rational) {
            return None;
        }
        let bytes = entry.value_bytes(self.region, self.byte_order)?;
        bytes
            .chunks_exact(8)
            .map(|pair| {
                let numerator = self.byte_order.read_u32(pair, 0)?;
                let denominator = self.byte_order.read_u32(pair, 4)?;
                (denominator != 0).then(|| numerator as f64 / denominator as f64)
            })
            .collect()
    }

    /// Render a UserComment value.
    ///
    /// The first 8 bytes name the character code (`ASCII`, `JIS`, `UNICODE`
    /// or all NULs for undefined). Any charset other than ASCII or undefined
    /// is appended to the text as an annotation.
    pub fn user_comment(&self, entry: &IfdEntry) -> Option<String> {
        if entry.field_type != Some(FieldType::Undefined)
            || entry.count as usize <= USER_COMMENT_CHARSET_LEN
        {
            return None;
        }
        let bytes = slice_at(
            self.region,
            entry.value_offset(self.byte_order),
            entry.count as usize,
        )?;
        let (charset, text) = bytes.split_at(USER_COMMENT_CHARSET_LEN);

        let charset = String::from_utf8_lossy(trim_trailing_nuls(charset));
        let text = String::from_utf8_lossy(trim_trailing_nuls(text));

        let value = if charset.is_empty() || charset == CHARSET_ASCII {
            text.into_owned()
        } else {
            format!("{} (charset: {})", text, charset)
        };
        non_empty(value)
    }

    /// Render a GPS degree/minute/second triple as unsigned decimal degrees.
    pub fn gps_coordinate(&self, entry: &IfdEntry) -> Option<String> {
        if entry.count != 3 {
            return None;
        }
        let parts = self.rationals(entry)?;
        let degrees = parts[0] + parts[1] / 60.0 + parts[2] / 3600.0;
        Some(format!("{:.6}", degrees))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

// =============================================================================
// Tests
// =============================================================================
