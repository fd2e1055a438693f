//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Default target for landscape sources when no size is requested.
pub const DEFAULT_LANDSCAPE: (u32, u32) = (1920, 1080);
/// Default target for portrait and square sources when no size is requested.
pub const DEFAULT_PORTRAIT: (u32, u32) = (1080, 1920);

/// Compute the target size for a request against a source's native size.
///
/// A requested dimension of `0` means "auto".
///
/// - both auto → [`DEFAULT_LANDSCAPE`] when `native_w > native_h`, else [`DEFAULT_PORTRAIT`]
/// - only height → width derived from the native aspect ratio
/// - only width → height derived from the native aspect ratio
/// - both given → used verbatim, even if that distorts the image
///
/// A derived axis is never smaller than 1px.
///
/// # Examples
/// ```
/// # use lan_file_distributor::imaging::adjust_dimensions;
/// // 1000x2000 portrait, height 500 requested → 250x500
/// assert_eq!(adjust_dimensions(1000, 2000, 0, 500), (250, 500));
///
/// // landscape source, nothing requested → 1920x1080
/// assert_eq!(adjust_dimensions(4000, 3000, 0, 0), (1920, 1080));
/// ```
pub fn adjust_dimensions(
    native_w: u32,
    native_h: u32,
    req_w: u32,
    req_h: u32,
) -> (u32, u32) {
    match (req_w, req_h) {
        (0, 0) if native_w > native_h => DEFAULT_LANDSCAPE,
        (0, 0) => DEFAULT_PORTRAIT,
        (0, h) => (scale_axis(native_w, h, native_h), h),
        (w, 0) => (w, scale_axis(native_h, w, native_w)),
        (w, h) => (w, h),
    }
}

/// `round(value * numerator / denominator)`, floored at 1.
fn scale_axis(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return numerator.max(1);
    }
    let scaled = (value as f64 * numerator as f64 / denominator as f64).round();
    (scaled as u32).max(1)
}

/// Decide the final size of a buffer, or `None` when it should be left alone.
///
/// Resizing happens only when at least one dimension was requested and the
/// computed target differs from the buffer's current size. `native` must be
/// the decoded, orientation-corrected size of the source.
pub fn resize_target(
    native: Dimensions,
    current: Dimensions,
    req_w: u32,
    req_h: u32,
) -> Option<Dimensions> {
    if req_w == 0 && req_h == 0 {
        return None;
    }
    let (w, h) = adjust_dimensions(native.width, native.height, req_w, req_h);
    let target = Dimensions::new(w, h);
    (target != current).then_some(target)
}

/// Size a decoder may draft down to before the final resample.
///
/// Drafting only makes sense when the target is known before decoding
/// (both dimensions requested) and the source is more than twice as large
/// on both axes. The draft keeps a 2× margin for the Lanczos pass.
pub fn draft_dimensions(source: Dimensions, target: Dimensions) -> Option<Dimensions> {
    if target.width == 0 || target.height == 0 {
        return None;
    }
    let draft = Dimensions::new(
        target.width.saturating_mul(2),
        target.height.saturating_mul(2),
    );
    (source.width > draft.width && source.height > draft.height).then_some(draft)
}

/// Bytes per pixel while resampling: Lanczos works on RGBA `f32`.
const WORKING_BYTES_PER_PIXEL: u64 = 16;

/// Whether resampling to `target` would need more memory than the `image`
/// crate's default decoding allowance.
pub fn exceeds_alloc_limit(target: Dimensions) -> bool {
    let needed = u64::from(target.width) * u64::from(target.height) * WORKING_BYTES_PER_PIXEL;
    image::Limits::default()
        .max_alloc
        .is_some_and(|max| needed > max)
}
