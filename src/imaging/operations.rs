//! High-level image operations.
//!
//! [`transform`] is the single-image pipeline: orientation lookup, decode,
//! rotation, dimension policy, resize. It works on bytes already in memory,
//! so everything about *where* the bytes came from stays in
//! [`fetch`](crate::fetch).

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{exceeds_alloc_limit, resize_target};
use super::format::SourceFormat;
use super::orientation::{Rotation, read_orientation};
use super::params::{DecodeMode, DecodeOptions, DimensionRequest};
use image::DynamicImage;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// An upright, resized image ready to become an artifact.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub format: SourceFormat,
    /// Source size after orientation correction.
    pub native: Dimensions,
    pub rotation: Rotation,
    pub image: DynamicImage,
}

/// Decode options for a request, with the draft target expressed in the
/// stored orientation the decoder sees.
pub fn plan_decode(request: DimensionRequest, rotation: Rotation, mode: DecodeMode) -> DecodeOptions {
    DecodeOptions {
        mode,
        draft: request.exact().map(|target| rotation.apply_dimensions(target)),
    }
}

/// Run the full single-image pipeline over raw file bytes.
///
/// Orientation is corrected *before* the target size is computed, so a
/// portrait photo stored sideways is sized as a portrait.
pub fn transform(
    backend: &impl ImageBackend,
    bytes: &[u8],
    request: DimensionRequest,
    mode: DecodeMode,
) -> Result<Transformed> {
    let rotation = Rotation::from_exif(read_orientation(bytes));
    let options = plan_decode(request, rotation, mode);
    let decoded = backend.decode(bytes, &options)?;

    let native = rotation.apply_dimensions(decoded.native);
    let image = rotation.apply(decoded.image);
    let current = Dimensions::of(&image);

    let image = match resize_target(native, current, request.width, request.height) {
        Some(target) if exceeds_alloc_limit(target) => {
            return Err(BackendError::TargetTooLarge {
                width: target.width,
                height: target.height,
            });
        }
        Some(target) => {
            debug!(
                from_w = current.width,
                from_h = current.height,
                to_w = target.width,
                to_h = target.height,
                "resizing"
            );
            backend.resize(image, target.width, target.height)
        }
        None => image,
    };

    Ok(Transformed {
        format: decoded.format,
        native,
        rotation,
        image,
    })
}
