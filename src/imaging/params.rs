//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipeline in [`operations`](super::operations) and
//! the [`backend`](super::backend) that does the pixel work.
//!
//! ## Types
//!
//! - [`DimensionRequest`]: requested output size, `0` meaning "auto" per axis.
//! - [`Quality`]: JPEG encoding quality (1-100, default 75). Clamped on construction.
//! - [`DecodeMode`]: speed/quality trade-off for decoding.
//! - [`DecodeOptions`]: mode plus an optional draft target.

use super::backend::Dimensions;

/// Requested output size. A zero axis is derived (or defaulted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionRequest {
    pub width: u32,
    pub height: u32,
}

impl DimensionRequest {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Request that leaves the source at its native size.
    pub fn native() -> Self {
        Self::default()
    }

    /// The exact output size, when both axes were given.
    pub fn exact(self) -> Option<Dimensions> {
        (self.width != 0 && self.height != 0).then(|| Dimensions::new(self.width, self.height))
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// How much work the decoder may skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Draft-scale large sources when the final size is already known.
    #[default]
    Fast,
    /// Always hand the full-resolution buffer to the resizer.
    Exact,
}

/// Options passed to [`ImageBackend::decode`](super::ImageBackend::decode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub mode: DecodeMode,
    /// Final output size in the *stored* (pre-rotation) orientation.
    ///
    /// Only honored in [`DecodeMode::Fast`]. The decoder may return a buffer
    /// as small as twice this size; it never goes below it.
    pub draft: Option<Dimensions>,
}

impl DecodeOptions {
    /// The draft size actually in effect.
    pub fn effective_draft(&self) -> Option<Dimensions> {
        match self.mode {
            DecodeMode::Fast => self.draft,
            DecodeMode::Exact => None,
        }
    }
}
