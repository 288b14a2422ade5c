//! TIFF field types and the closed EXIF/GPS tag vocabularies.
//!
//! Only tags listed here produce output. Everything else found in an IFD is
//! dropped, not stored raw.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Only the types this crate can render or must size are defined; unknown
/// types make an entry undecodable and it is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// 8-bit ASCII character (1 byte)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Two Longs: numerator then denominator (8 bytes)
    Rational = 5,

    /// Undefined byte data (1 byte per element)
    Undefined = 7,

    /// Offset to a sub-IFD, sized like Long (4 bytes)
    Ifd = 13,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte => 1,
            FieldType::Ascii => 1,
            FieldType::Short => 2,
            FieldType::Long => 4,
            FieldType::Rational => 8,
            FieldType::Undefined => 1,
            FieldType::Ifd => 4,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported or unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            7 => Some(FieldType::Undefined),
            13 => Some(FieldType::Ifd),
            _ => None,
        }
    }
}

// =============================================================================
// EXIF Tags (IFD0 and the EXIF sub-IFD)
// =============================================================================

/// Tags decoded from IFD0 and the EXIF sub-IFD.
///
/// Both directories share one id space, so one table serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ExifTag {
    // -------------------------------------------------------------------------
    // IFD0
    // -------------------------------------------------------------------------
    ImageDescription = 0x010E,
    Make = 0x010F,
    Model = 0x0110,
    Orientation = 0x0112,
    Software = 0x0131,
    DateTime = 0x0132,
    Artist = 0x013B,
    Copyright = 0x8298,

    // -------------------------------------------------------------------------
    // Sub-IFD pointers
    // -------------------------------------------------------------------------
    /// Offset of the EXIF sub-IFD
    ExifIfdPointer = 0x8769,

    /// Offset of the GPS sub-IFD
    GpsInfoIfdPointer = 0x8825,

    // -------------------------------------------------------------------------
    // EXIF sub-IFD
    // -------------------------------------------------------------------------
    ExposureTime = 0x829A,
    FNumber = 0x829D,
    IsoSpeedRatings = 0x8827,
    DateTimeOriginal = 0x9003,
    DateTimeDigitized = 0x9004,
    Flash = 0x9209,
    FocalLength = 0x920A,

    /// Character-set prefixed comment (UNDEFINED type)
    UserComment = 0x9286,

    WhiteBalance = 0xA403,
    ImageUniqueId = 0xA420,
    CameraOwnerName = 0xA430,
    BodySerialNumber = 0xA431,
    LensMake = 0xA433,
    LensModel = 0xA434,
    LensSerialNumber = 0xA435,
}

impl ExifTag {
    /// Create an ExifTag from its numeric value.
    ///
    /// Returns `None` for tags outside the vocabulary; those are dropped.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x010E => Some(ExifTag::ImageDescription),
            0x010F => Some(ExifTag::Make),
            0x0110 => Some(ExifTag::Model),
            0x0112 => Some(ExifTag::Orientation),
            0x0131 => Some(ExifTag::Software),
            0x0132 => Some(ExifTag::DateTime),
            0x013B => Some(ExifTag::Artist),
            0x8298 => Some(ExifTag::Copyright),
            0x8769 => Some(ExifTag::ExifIfdPointer),
            0x8825 => Some(ExifTag::GpsInfoIfdPointer),
            0x829A => Some(ExifTag::ExposureTime),
            0x829D => Some(ExifTag::FNumber),
            0x8827 => Some(ExifTag::IsoSpeedRatings),
            0x9003 => Some(ExifTag::DateTimeOriginal),
            0x9004 => Some(ExifTag::DateTimeDigitized),
            0x9209 => Some(ExifTag::Flash),
            0x920A => Some(ExifTag::FocalLength),
            0x9286 => Some(ExifTag::UserComment),
            0xA403 => Some(ExifTag::WhiteBalance),
            0xA420 => Some(ExifTag::ImageUniqueId),
            0xA430 => Some(ExifTag::CameraOwnerName),
            0xA431 => Some(ExifTag::BodySerialNumber),
            0xA433 => Some(ExifTag::LensMake),
            0xA434 => Some(ExifTag::LensModel),
            0xA435 => Some(ExifTag::LensSerialNumber),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Output field name, or `None` for pointer tags that only steer the walk.
    pub const fn field_name(self) -> Option<&'static str> {
        let name = match self {
            ExifTag::ImageDescription => "ImageDescription",
            ExifTag::Make => "Make",
            ExifTag::Model => "Model",
            ExifTag::Orientation => "Orientation",
            ExifTag::Software => "Software",
            ExifTag::DateTime => "DateTime",
            ExifTag::Artist => "Artist",
            ExifTag::Copyright => "Copyright",
            ExifTag::ExposureTime => "ExposureTime",
            ExifTag::FNumber => "FNumber",
            ExifTag::IsoSpeedRatings => "ISO",
            ExifTag::DateTimeOriginal => "DateTimeOriginal",
            ExifTag::DateTimeDigitized => "DateTimeDigitized",
            ExifTag::Flash => "Flash",
            ExifTag::FocalLength => "FocalLength",
            ExifTag::UserComment => "UserComment",
            ExifTag::WhiteBalance => "WhiteBalance",
            ExifTag::ImageUniqueId => "ImageUniqueID",
            ExifTag::CameraOwnerName => "CameraOwnerName",
            ExifTag::BodySerialNumber => "BodySerialNumber",
            ExifTag::LensMake => "LensMake",
            ExifTag::LensModel => "LensModel",
            ExifTag::LensSerialNumber => "LensSerialNumber",
            ExifTag::ExifIfdPointer | ExifTag::GpsInfoIfdPointer => return None,
        };
        Some(name)
    }
}

// =============================================================================
// GPS Tags
// =============================================================================

/// Tags decoded from the GPS sub-IFD.
///
/// GPS ids overlap the IFD0 id space (0x0001.. are small numbers), which is
/// why they get their own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum GpsTag {
    LatitudeRef = 0x0001,
    Latitude = 0x0002,
    LongitudeRef = 0x0003,
    Longitude = 0x0004,
    AltitudeRef = 0x0005,
    Altitude = 0x0006,
}

impl GpsTag {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(GpsTag::LatitudeRef),
            0x0002 => Some(GpsTag::Latitude),
            0x0003 => Some(GpsTag::LongitudeRef),
            0x0004 => Some(GpsTag::Longitude),
            0x0005 => Some(GpsTag::AltitudeRef),
            0x0006 => Some(GpsTag::Altitude),
            _ => None,
        }
    }

    pub const fn field_name(self) -> &'static str {
        match self {
            GpsTag::LatitudeRef => "GPSLatitudeRef",
            GpsTag::Latitude => "GPSLatitude",
            GpsTag::LongitudeRef => "GPSLongitudeRef",
            GpsTag::Longitude => "GPSLongitude",
            GpsTag::AltitudeRef => "GPSAltitudeRef",
            GpsTag::Altitude => "GPSAltitude",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
