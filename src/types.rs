//! Shared types handed across the repository boundary.
//!
//! [`File`] and [`EncodedArtifact`] serialize to JSON for whatever sits in
//! front of the repository; [`ImageArtifact`] holds raw pixels and never
//! leaves the process.

use crate::imaging::{BackendError, ImageBackend, Quality};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

pub use crate::imaging::DimensionRequest;

/// One directory entry, as returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    /// Logical path, usable as input to `get_file`.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
}

/// A decoded, upright, resized image.
///
/// Width and height are read from the pixel buffer itself, so they can never
/// disagree with it. The buffer is owned until [`ImageArtifact::into_encoded`]
/// consumes it.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    source_path: String,
    name: String,
    size: u64,
    pixels: DynamicImage,
}

impl ImageArtifact {
    pub fn new(source_path: String, name: String, size: u64, pixels: DynamicImage) -> Self {
        Self {
            source_path,
            name,
            size,
            pixels,
        }
    }

    /// Logical path of the source file.
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// File name of the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the source file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Encode to JPEG, dropping the pixel buffer.
    pub fn into_encoded(
        self,
        backend: &impl ImageBackend,
        quality: Quality,
    ) -> Result<EncodedArtifact, BackendError> {
        let data = backend.encode_jpeg(&self.pixels, quality)?;
        Ok(EncodedArtifact {
            width: self.width(),
            height: self.height(),
            source_path: self.source_path,
            name: self.name,
            size: self.size,
            data,
        })
    }
}

/// An artifact after the encode step: metadata plus JPEG bytes.
#[derive(Debug, Clone, Serialize)]
pub struct EncodedArtifact {
    #[serde(rename = "path")]
    pub source_path: String,
    pub name: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub data: Vec<u8>,
}
