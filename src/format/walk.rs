//! Shared accumulate-then-return plumbing for container walks.

use tracing::debug;

use crate::error::{ParseError, WalkError};
use crate::metadata::MetadataMap;

use super::tiff::parse_tiff;
use super::ImageFormat;

/// Field recording why an embedded EXIF block could not be decoded.
pub const EXIF_PARSE_ERROR_FIELD: &str = "EXIF_ParseError";

/// How a container walk ended.
///
/// The fields themselves are accumulated in the caller's map; the outcome only
/// says whether the walk reached the natural end of the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Set when the walk stopped before the end of the stream
    pub stopped_early: Option<WalkError>,
}

impl WalkOutcome {
    /// The walk reached the end of the stream.
    pub fn complete() -> Self {
        Self::default()
    }

    /// The walk stopped at `error`, keeping what was decoded before it.
    pub fn stopped(error: WalkError) -> Self {
        Self {
            stopped_early: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stopped_early.is_none()
    }
}

/// Turn an accumulated map into the decoder result.
///
/// Partial results are a success. An empty map, whether the walk finished or
/// stopped early, is reported as [`ParseError::NoMetadataFound`].
pub fn finish(
    format: ImageFormat,
    map: MetadataMap,
    outcome: WalkOutcome,
) -> Result<MetadataMap, ParseError> {
    if let Some(error) = &outcome.stopped_early {
        debug!(%format, fields = map.len(), %error, "walk stopped early");
    }

    if map.is_empty() {
        return Err(ParseError::NoMetadataFound { format });
    }
    Ok(map)
}

/// Decode an embedded EXIF block into `map`, recording a header failure as a field.
pub fn merge_exif(region: &[u8], map: &mut MetadataMap) {
    if let Err(error) = parse_tiff(region, map) {
        debug!(%error, "embedded EXIF block has an invalid TIFF header");
        map.insert(EXIF_PARSE_ERROR_FIELD, error.to_string());
    }
}
