//! IFD tree walk.
//!
//! Starting at IFD0, each entry is matched against the closed tag tables and
//! rendered into the caller's [`MetadataMap`]. The EXIF and GPS pointer tags
//! recurse into their sub-IFDs, merging into the same map, which is how IFD0
//! and the EXIF directory end up as one flat result.
//!
//! A failed bounds check skips the one entry (or the rest of one IFD) and
//! never aborts the walk. Sub-IFD offsets already visited are not walked
//! again, and nesting is capped, so pointer cycles terminate.

use tracing::trace;

use crate::error::TiffError;
use crate::metadata::MetadataMap;

use super::parser::{IfdEntry, TiffHeader, IFD_COUNT_SIZE, IFD_ENTRY_SIZE};
use super::tags::{ExifTag, FieldType, GpsTag};
use super::values::ValueReader;

/// Deepest sub-IFD nesting followed (IFD0 is depth 0).
const MAX_IFD_DEPTH: usize = 4;

/// Which tag table applies to an IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IfdKind {
    /// IFD0 or the EXIF sub-IFD
    Exif,
    /// The GPS sub-IFD
    Gps,
}

/// Decode a TIFF region into `out`.
///
/// `region` must start at the TIFF header; every offset inside it is relative
/// to that point.
///
/// # Errors
/// Fails only when the header itself is unreadable. Anything wrong past the
/// header degrades to fewer fields.
pub fn parse_tiff(region: &[u8], out: &mut MetadataMap) -> Result<(), TiffError> {
    let header = TiffHeader::parse(region)?;
    let mut walker = IfdWalker {
        values: ValueReader::new(region, header.byte_order),
        out,
        visited: Vec::new(),
    };
    walker.walk(header.first_ifd_offset as usize, IfdKind::Exif, 0);
    Ok(())
}

struct IfdWalker<'a, 'm> {
    values: ValueReader<'a>,
    out: &'m mut MetadataMap,
    visited: Vec<usize>,
}

impl IfdWalker<'_, '_> {
    fn walk(&mut self, offset: usize, kind: IfdKind, depth: usize) {
        if depth > MAX_IFD_DEPTH || self.visited.contains(&offset) {
            trace!(offset, depth, "skipping IFD (revisited or too deep)");
            return;
        }
        self.visited.push(offset);

        let region = self.values.region();
        let byte_order = self.values.byte_order();
        let Some(entry_count) = byte_order.read_u16(region, offset) else {
            trace!(offset, "IFD entry count out of bounds");
            return;
        };
        trace!(offset, entry_count, ?kind, "walking IFD");

        let first_entry = offset.saturating_add(IFD_COUNT_SIZE);
        for index in 0..entry_count as usize {
            let entry_offset = first_entry.saturating_add(index * IFD_ENTRY_SIZE);
            let Some(entry) = IfdEntry::parse(region, entry_offset, byte_order) else {
                trace!(entry_offset, "IFD entry out of bounds, ending IFD");
                break;
            };

            match kind {
                IfdKind::Exif => self.visit_exif_entry(&entry, depth),
                IfdKind::Gps => self.visit_gps_entry(&entry),
            }
        }
    }

    fn visit_exif_entry(&mut self, entry: &IfdEntry, depth: usize) {
        let Some(tag) = ExifTag::from_u16(entry.tag) else {
            return;
        };

        match tag {
            ExifTag::ExifIfdPointer => {
                if let Some(offset) = self.sub_ifd_offset(entry) {
                    self.walk(offset, IfdKind::Exif, depth + 1);
                }
            }
            ExifTag::GpsInfoIfdPointer => {
                if let Some(offset) = self.sub_ifd_offset(entry) {
                    self.walk(offset, IfdKind::Gps, depth + 1);
                }
            }
            ExifTag::UserComment => {
                if let Some(value) = self.values.user_comment(entry) {
                    self.out.insert("UserComment", value);
                }
            }
            _ => {
                let (Some(name), Some(value)) = (tag.field_name(), self.values.render(entry))
                else {
                    return;
                };
                self.out.insert(name, value);
            }
        }
    }

    fn visit_gps_entry(&mut self, entry: &IfdEntry) {
        let Some(tag) = GpsTag::from_u16(entry.tag) else {
            return;
        };

        let value = match tag {
            GpsTag::LatitudeRef | GpsTag::LongitudeRef => self.values.ascii(entry),
            GpsTag::Latitude | GpsTag::Longitude => self.values.gps_coordinate(entry),
            GpsTag::AltitudeRef => self.values.scalar_u8(entry).map(|v| match v {
                0 => "Above Sea Level".to_string(),
                1 => "Below Sea Level".to_string(),
                other => other.to_string(),
            }),
            GpsTag::Altitude => self.values.rational(entry).map(|v| format!("{:.2}", v)),
        };

        if let Some(value) = value {
            self.out.insert(tag.field_name(), value);
        }
    }

    /// Offset held by a sub-IFD pointer entry (a scalar LONG or IFD value).
    fn sub_ifd_offset(&self, entry: &IfdEntry) -> Option<usize> {
        let is_pointer_type = matches!(entry.field_type, Some(FieldType::Long | FieldType::Ifd));
        (is_pointer_type && entry.count == 1).then(|| entry.value_offset(self.values.byte_order()))
    }
}

// =============================================================================
// Tests
// =============================================================================
