//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three pixel operations every
//! backend must support: decode, resize, and encode. Everything around them
//! (path resolution, format validation, orientation, dimension policy) lives
//! outside the backend so it can be tested against a mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, built on the
//! `image` crate.

use super::format::SourceFormat;
use super::params::{DecodeOptions, Quality};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("unrecognized image signature")]
    UnknownSignature,
    #[error("unsupported image format: {0}")]
    UnsupportedSignature(String),
    #[error("failed to decode {format} data: {message}")]
    DecodeFailed {
        format: SourceFormat,
        message: String,
    },
    #[error("encoding failed: {0}")]
    EncodeFailed(String),
    #[error("target size {width}x{height} exceeds the allocation limit")]
    TargetTooLarge { width: u32, height: u32 },
}

/// Width and height of a pixel buffer or image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &DynamicImage) -> Self {
        Self::new(image.width(), image.height())
    }

    /// Dimensions after a quarter-turn rotation.
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// A decoded image tagged with the format its bytes were sniffed as.
///
/// `native` is the size of the encoded image. `image` may be smaller when
/// the decoder drafted it down (see [`DecodeOptions::draft`]).
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub format: SourceFormat,
    pub native: Dimensions,
    pub image: DynamicImage,
}

/// Trait for image processing backends.
///
/// `Sync` because batches share one backend across rayon workers.
pub trait ImageBackend: Sync {
    /// Sniff and decode raw file bytes.
    fn decode(&self, bytes: &[u8], options: &DecodeOptions) -> Result<DecodedImage, BackendError>;

    /// Rescale to exactly `width × height`.
    fn resize(&self, image: DynamicImage, width: u32, height: u32) -> DynamicImage;

    /// Encode a pixel buffer as baseline JPEG.
    fn encode_jpeg(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
