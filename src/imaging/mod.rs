//! Image processing: pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff + decode** | `image::guess_format` + `load_from_memory_with_format` |
//! | **Orientation** | `kamadak-exif` tag lookup + `DynamicImage::rotate*` |
//! | **Dimension policy** | pure functions in `calculations` |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode** | JPEG via `image::codecs::jpeg` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Format**: the closed allow-list of accepted raster formats
//! - **Orientation**: EXIF orientation lookup and rotation
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: the single-image pipeline combining all of the above

pub mod backend;
mod calculations;
pub mod format;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, Dimensions, ImageBackend};
pub use calculations::{
    DEFAULT_LANDSCAPE, DEFAULT_PORTRAIT, adjust_dimensions, draft_dimensions, exceeds_alloc_limit,
    resize_target,
};
pub use format::{SourceFormat, is_supported, supported_extensions};
pub use operations::{Transformed, transform};
pub use orientation::{Rotation, correct_orientation, read_orientation};
pub use params::{DecodeMode, DecodeOptions, DimensionRequest, Quality};
pub use rust_backend::RustBackend;
