//! Shared test utilities for the lan-file-distributor test suite.
//!
//! Provides synthetic image encoders, an EXIF orientation injector, and a
//! small on-disk library that mimics a NAS share.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let lib = setup_library();
//! let artifact = fetch_one(
//!     &RustBackend::new(),
//!     lib.path(),
//!     "/photos/landscape.jpg",
//!     DimensionRequest::native(),
//!     FetchOptions::default(),
//! )
//! .unwrap();
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// A valid baseline JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// A valid PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Write a JPEG of the given size to `path`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Insert an APP1 EXIF segment carrying only an orientation tag.
///
/// The segment goes straight after SOI: big-endian TIFF header, one IFD
/// with a single SHORT entry for tag `0x0112`.
pub fn with_exif_orientation(jpeg: Vec<u8>, orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no IFD1

    let mut payload = b"Exif\x00\x00".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

// =========================================================================
// Fixture library
// =========================================================================

/// Build a throwaway share and return it.
///
/// ```text
/// photos/
/// ├── album/inner.jpg   40x40
/// ├── graphic.png       30x20
/// ├── landscape.jpg     64x48
/// ├── notes.txt
/// ├── portrait.jpg      48x64
/// └── rotated.jpg       stored 64x48, EXIF orientation 6
/// damaged/
/// └── broken.jpg        text, not image data
/// ```
pub fn setup_library() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let photos = tmp.path().join("photos");
    let damaged = tmp.path().join("damaged");
    std::fs::create_dir_all(photos.join("album")).unwrap();
    std::fs::create_dir_all(&damaged).unwrap();

    create_test_jpeg(&photos.join("album/inner.jpg"), 40, 40);
    std::fs::write(photos.join("graphic.png"), png_bytes(30, 20)).unwrap();
    create_test_jpeg(&photos.join("landscape.jpg"), 64, 48);
    std::fs::write(photos.join("notes.txt"), "shopping list").unwrap();
    create_test_jpeg(&photos.join("portrait.jpg"), 48, 64);
    std::fs::write(
        photos.join("rotated.jpg"),
        with_exif_orientation(jpeg_bytes(64, 48), 6),
    )
    .unwrap();
    std::fs::write(damaged.join("broken.jpg"), "this is not a jpeg").unwrap();
    tmp
}
