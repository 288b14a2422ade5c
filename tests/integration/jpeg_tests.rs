//! JPEG integration tests.
//!
//! Tests verify:
//! - Embedded EXIF lands in the same map as segment fields
//! - APPn and COM segments are summarized by prefix
//! - Truncated or corrupt segments keep earlier results

use imgmeta::{parse_image, ImageFormat, ParseError};

use super::test_utils::{
    exif_app1, jpeg_segment, jpeg_with_segments, tiff_with_make, ByteOrderType, IfdBuilder,
    TiffBuilder, Value, APP1, COM,
};

const APP0: u8 = 0xE0;
const APP2: u8 = 0xE2;
const APP5: u8 = 0xE5;
const APP13: u8 = 0xED;
const APP14: u8 = 0xEE;

// =============================================================================
// EXIF Tests
// =============================================================================

#[test]
fn test_exif_make_only() {
    let data = jpeg_with_segments(&[(APP1, exif_app1(&tiff_with_make("Acme")))]);

    let map = parse_image(&data).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("Make"), Some("Acme"));
}

#[test]
fn test_exif_offsets_are_relative_to_tiff_header() {
    // A comment before the APP1 shifts the TIFF region within the file.
    let tiff = TiffBuilder::new()
        .with_byte_order(ByteOrderType::BigEndian)
        .ifd0(IfdBuilder::new().entry(0x010F, Value::ascii("A much longer maker name")))
        .build();
    let data = jpeg_with_segments(&[
        (COM, b"leading comment".to_vec()),
        (APP1, exif_app1(&tiff)),
    ]);

    let map = parse_image(&data).unwrap();
    assert_eq!(map.get("Make"), Some("A much longer maker name"));
    assert_eq!(map.get("JPEG_Comment"), Some("leading comment"));
}

#[test]
fn test_invalid_embedded_tiff_is_recorded() {
    let data = jpeg_with_segments(&[
        (APP1, b"Exif\0\0QQ\0\x2A\0\0\0\x08".to_vec()),
        (COM, b"still here".to_vec()),
    ]);

    let map = parse_image(&data).unwrap();
    assert!(map
        .get("EXIF_ParseError")
        .is_some_and(|v| v.contains("Invalid TIFF byte order")));
    assert_eq!(map.get("JPEG_Comment"), Some("still here"));
}

// =============================================================================
// Segment Tests
// =============================================================================

#[test]
fn test_app_segments() {
    let mut icc = b"ICC_PROFILE\0\x01\x01".to_vec();
    icc.extend_from_slice(&[0u8; 20]);

    let data = jpeg_with_segments(&[
        (APP0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00".to_vec()),
        (APP1, b"http://ns.adobe.com/xap/1.0/\0<x:xmpmeta/>".to_vec()),
        (APP2, icc),
        (APP5, b"vendor notes".to_vec()),
        (APP13, b"Photoshop 3.0\08BIM".to_vec()),
        (APP14, b"Adobe\0\x64\0\0\0\0\x01".to_vec()),
    ]);

    let map = parse_image(&data).unwrap();
    assert_eq!(map.get("JFIF_Version"), Some("1.02"));
    assert_eq!(map.get("XMP_Metadata"), Some("<x:xmpmeta/>"));
    assert_eq!(map.get("ICC_Profile"), Some("present (34 bytes)"));
    assert_eq!(map.get("APP5_Data"), Some("vendor notes"));
    assert_eq!(map.get("Photoshop_IRB"), Some("present (18 bytes)"));
    assert_eq!(map.get("Adobe_APP14"), Some("present"));
}

#[test]
fn test_binary_app_segment_reports_size() {
    let data = jpeg_with_segments(&[(APP5, vec![0x00, 0x01, 0x02, 0x03, b'a'])]);
    let map = parse_image(&data).unwrap();
    assert_eq!(map.get("APP5_Data"), Some("(5 bytes binary)"));
}

#[test]
fn test_walk_stops_at_start_of_scan() {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&jpeg_segment(COM, b"before"));
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
    data.extend_from_slice(&jpeg_segment(COM, b"after"));

    let map = parse_image(&data).unwrap();
    assert_eq!(map.get("JPEG_Comment"), Some("before"));
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_truncated_segment_keeps_earlier_fields() {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&jpeg_segment(COM, b"complete"));
    // APP1 claims 1000 bytes but only a few follow.
    data.extend_from_slice(&[0xFF, APP1, 0x03, 0xE8, b'E', b'x']);

    let map = parse_image(&data).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("JPEG_Comment"), Some("complete"));
}

#[test]
fn test_truncated_first_segment_is_no_metadata() {
    let data = [0xFF, 0xD8, 0xFF, APP1, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(
        parse_image(&data),
        Err(ParseError::NoMetadataFound {
            format: ImageFormat::Jpeg
        })
    );
}

#[test]
fn test_zero_length_segment_stops_walk() {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&jpeg_segment(COM, b"kept"));
    data.extend_from_slice(&[0xFF, COM, 0x00, 0x00]);
    data.extend_from_slice(&jpeg_segment(APP5, b"never reached"));

    let map = parse_image(&data).unwrap();
    assert_eq!(map.get("JPEG_Comment"), Some("kept"));
    assert!(!map.contains_key("APP5_Data"));
}
