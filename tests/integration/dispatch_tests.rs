//! Dispatch integration tests.
//!
//! Tests verify:
//! - Detection picks the right decoder for every container
//! - Unknown and unimplemented formats report the right error
//! - Parsing is deterministic across calls
//! - File reports read from disk

use std::io::Write;

use imgmeta::{
    detect_format, get_parser, parse_image, supported_formats, FileReport, ImageFormat,
    ParseError, ReportOutcome,
};

use super::test_utils::{
    exif_app1, jpeg_with_segments, png_chunk, png_ihdr, png_with_chunks, tiff_with_make,
    vp8x_chunk, webp_with_chunks, APP1,
};

fn sample_files() -> Vec<(ImageFormat, Vec<u8>)> {
    vec![
        (
            ImageFormat::Jpeg,
            jpeg_with_segments(&[(APP1, exif_app1(&tiff_with_make("Acme")))]),
        ),
        (ImageFormat::Tiff, tiff_with_make("Acme")),
        (
            ImageFormat::Png,
            png_with_chunks(&[png_ihdr(8, 8, 8, 3), png_chunk(b"tEXt", b"k\0v")]),
        ),
        (ImageFormat::WebP, webp_with_chunks(&[vp8x_chunk(0x04, 1, 1)])),
    ]
}

// =============================================================================
// Detection and Dispatch
// =============================================================================

#[test]
fn test_every_sample_detects_and_parses() {
    for (format, data) in sample_files() {
        assert_eq!(detect_format(&data), format);
        let decoder = get_parser(format).unwrap();
        assert!(decoder.supports(format));
        let map = parse_image(&data).unwrap();
        assert!(!map.is_empty(), "{} sample produced no fields", format);
    }
}

#[test]
fn test_empty_and_unrecognized_buffers() {
    let unsupported = Err(ParseError::UnsupportedFormat {
        format: ImageFormat::Unknown,
    });
    assert_eq!(parse_image(&[]), unsupported);
    assert_eq!(parse_image(&[0xFF, 0xD8]), unsupported);
    assert_eq!(parse_image(b"GIF89a\x01\x00\x01\x00\x00\x00"), unsupported);
    assert_eq!(parse_image(&[0u8; 4096]), unsupported);
}

#[test]
fn test_heif_is_recognized_but_not_implemented() {
    let data = b"\x00\x00\x00\x1cftypheic\x00\x00\x00\x00mif1heic";
    assert_eq!(detect_format(data), ImageFormat::Heif);
    assert_eq!(
        parse_image(data),
        Err(ParseError::NotImplemented {
            format: ImageFormat::Heif
        })
    );
    assert!(!supported_formats().contains(&ImageFormat::Heif));
}

#[test]
fn test_parse_is_idempotent() {
    for (_, data) in sample_files() {
        let first = parse_image(&data).unwrap();
        let second = parse_image(&data).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_truncated_prefixes_never_panic() {
    for (_, data) in sample_files() {
        for len in 0..data.len() {
            let _ = parse_image(&data[..len]);
        }
    }
}

#[test]
fn test_metadata_serializes_as_flat_object() {
    let data = jpeg_with_segments(&[(APP1, exif_app1(&tiff_with_make("Acme")))]);
    let map = parse_image(&data).unwrap();
    assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"Make":"Acme"}"#);
}

// =============================================================================
// File Reports
// =============================================================================

#[test]
fn test_file_report_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&tiff_with_make("Acme")).unwrap();

    let report = FileReport::from_path(file.path(), 1024 * 1024);
    assert!(!report.fatal);
    assert_eq!(report.format, ImageFormat::Tiff);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["format"], "TIFF");
    assert_eq!(json["metadata"]["Make"], "Acme");
}

#[test]
fn test_file_report_respects_size_limit() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&tiff_with_make("Acme")).unwrap();

    let report = FileReport::from_path(file.path(), 8);
    assert!(report.fatal);
    assert!(matches!(
        report.outcome,
        ReportOutcome::Error(ref message) if message.starts_with("File too large")
    ));
}
