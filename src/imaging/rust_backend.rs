//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff | `image::guess_format` → [`SourceFormat`] |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory_with_format` |
//! | Draft scaling | `DynamicImage::thumbnail_exact` (area averaging) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, DecodedImage, Dimensions, ImageBackend};
use super::calculations::draft_dimensions;
use super::format::SourceFormat;
use super::params::{DecodeOptions, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Identify the format from the leading bytes, restricted to the allow-list.
fn sniff(bytes: &[u8]) -> Result<SourceFormat, BackendError> {
    let detected = image::guess_format(bytes).map_err(|_| BackendError::UnknownSignature)?;
    SourceFormat::from_image_format(detected)
        .ok_or_else(|| BackendError::UnsupportedSignature(format!("{detected:?}")))
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8], options: &DecodeOptions) -> Result<DecodedImage, BackendError> {
        let format = sniff(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format.image_format()).map_err(
            |e| BackendError::DecodeFailed {
                format,
                message: e.to_string(),
            },
        )?;
        let native = Dimensions::of(&image);

        let image = match options
            .effective_draft()
            .and_then(|target| draft_dimensions(native, target))
        {
            Some(draft) => image.thumbnail_exact(draft.width, draft.height),
            None => image,
        };

        Ok(DecodedImage {
            format,
            native,
            image,
        })
    }

    fn resize(&self, image: DynamicImage, width: u32, height: u32) -> DynamicImage {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn encode_jpeg(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        // JPEG has no alpha channel; flatten everything to RGB8 first
        let rgb = image.to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.value() as u8)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| BackendError::EncodeFailed(e.to_string()))?;
        Ok(out)
    }
}
