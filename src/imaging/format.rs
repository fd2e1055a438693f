//! The closed set of raster formats the server accepts.
//!
//! Formats are recognized twice: by file extension before any bytes are
//! read (cheap rejection of `.txt`, `.heic`, …), and by signature when the
//! bytes are decoded. Both paths map into the same [`SourceFormat`] enum, so
//! decoder dispatch is a `match`, never an open-ended lookup.

use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// A raster format on the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Tiff,
    WebP,
}

/// Extension → format table. Lookups are case-insensitive.
const EXTENSIONS: &[(&str, SourceFormat)] = &[
    ("jpg", SourceFormat::Jpeg),
    ("jpeg", SourceFormat::Jpeg),
    ("png", SourceFormat::Png),
    ("tif", SourceFormat::Tiff),
    ("tiff", SourceFormat::Tiff),
    ("webp", SourceFormat::WebP),
];

/// Returns every accepted file extension, lowercase.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    EXTENSIONS.iter().map(|(ext, _)| *ext)
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(_, fmt)| *fmt)
    }

    /// Classify a path by its extension.
    ///
    /// The `Err` carries the offending extension (empty when the path has
    /// none) so callers can report exactly what was refused.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ext.to_lowercase())
    }

    /// Map a sniffed `image` format onto the allow-list.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Tiff => Some(Self::Tiff),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Tiff => ImageFormat::Tiff,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Tiff => "TIFF",
            Self::WebP => "WebP",
        })
    }
}

/// True when `path` has an allow-listed extension.
pub fn is_supported(path: &Path) -> bool {
    SourceFormat::from_path(path).is_ok()
}
