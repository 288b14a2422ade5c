//! TIFF/EXIF decoding.
//!
//! This module is the shared primitive behind every container decoder: a bare
//! TIFF file, a JPEG APP1 `Exif` segment, a PNG `eXIf` chunk and a WebP `EXIF`
//! chunk all end up in [`parse_tiff`].
//!
//! # Key Concepts
//!
//! - **Byte order**: the region declares its endianness (II = little-endian,
//!   MM = big-endian) in its header. All multi-byte values must be read
//!   respecting this order.
//!
//! - **IFD (Image File Directory)**: a count followed by 12-byte entries.
//!   Pointer tags chain IFD0 to the EXIF and GPS sub-directories.
//!
//! - **Inline vs offset values**: values of 4 bytes or less are stored inline
//!   in the IFD entry, larger values at an offset relative to the TIFF header.

mod parser;
mod tags;
mod values;
mod walker;

pub use parser::{
    ByteOrder, IfdEntry, TiffHeader, IFD_COUNT_SIZE, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE,
};
pub use tags::{ExifTag, FieldType, GpsTag};
pub use values::ValueReader;
pub use walker::parse_tiff;
