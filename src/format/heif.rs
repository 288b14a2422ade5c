//! HEIF/HEIC is recognized by its `ftyp` box but not decoded.

use crate::error::ParseError;
use crate::metadata::MetadataMap;

use super::ImageFormat;

/// Always fails: no box walker exists for HEIF yet.
pub fn walk_heif(_data: &[u8], _map: &mut MetadataMap) -> Result<(), ParseError> {
    Err(ParseError::NotImplemented {
        format: ImageFormat::Heif,
    })
}
