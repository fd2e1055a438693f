//! Image retrieval: one file or a whole batch, concurrently.
//!
//! ## Single file
//!
//! ```text
//! logical path ─ resolve ─ extension check ─ read ─ transform ─ ImageArtifact
//! ```
//!
//! The extension is checked before the file is opened, so an off-list file
//! costs one `stat` and nothing more.
//!
//! ## Batches
//!
//! [`fetch_many`] runs [`fetch_one`] for every path on the rayon pool.
//! Results come back in input order regardless of completion order. The
//! batch is all-or-nothing: every task runs to completion, and if any of
//! them failed the caller gets the first failure (in completion order) and
//! no artifacts at all.

use crate::imaging::{
    BackendError, DecodeMode, DimensionRequest, ImageBackend, SourceFormat, transform,
};
use crate::resolve::{ResolveError, normalize_logical, resolve};
use crate::types::ImageArtifact;
use rayon::prelude::*;
use std::io;
use std::path::Path;
use std::sync::mpsc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    NotFound(#[from] ResolveError),
    #[error("{path}: unsupported image format \"{extension}\"")]
    UnsupportedFormat { path: String, extension: String },
    #[error("{path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: BackendError,
    },
    #[error("{path}: requested size {width}x{height} is too large")]
    TooLarge { path: String, width: u32, height: u32 },
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// The logical path the failure belongs to.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound(e) => e.path(),
            Self::UnsupportedFormat { path, .. }
            | Self::Decode { path, .. }
            | Self::TooLarge { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    fn from_backend(path: String, source: BackendError) -> Self {
        match source {
            BackendError::UnsupportedSignature(signature) => Self::UnsupportedFormat {
                path,
                extension: signature.to_lowercase(),
            },
            BackendError::TargetTooLarge { width, height } => Self::TooLarge {
                path,
                width,
                height,
            },
            source => Self::Decode { path, source },
        }
    }
}

/// Knobs that apply to every item of a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub decode_mode: DecodeMode,
}

/// Retrieve one image and bring it to the requested size.
#[instrument(level = "debug", skip(backend, root, options), fields(path = logical))]
pub fn fetch_one(
    backend: &impl ImageBackend,
    root: &Path,
    logical: &str,
    request: DimensionRequest,
    options: FetchOptions,
) -> Result<ImageArtifact, FetchError> {
    let absolute = resolve(root, logical)?;
    let source_path = normalize_logical(logical).unwrap_or_else(|| logical.to_string());

    SourceFormat::from_path(&absolute).map_err(|extension| FetchError::UnsupportedFormat {
        path: source_path.clone(),
        extension,
    })?;

    let io_error = |source| FetchError::Io {
        path: source_path.clone(),
        source,
    };
    let size = std::fs::metadata(&absolute).map_err(io_error)?.len();
    let bytes = std::fs::read(&absolute).map_err(io_error)?;

    let transformed = transform(backend, &bytes, request, options.decode_mode)
        .map_err(|e| FetchError::from_backend(source_path.clone(), e))?;
    debug!(
        format = %transformed.format,
        width = transformed.image.width(),
        height = transformed.image.height(),
        "fetched"
    );

    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageArtifact::new(source_path, name, size, transformed.image))
}

/// Retrieve a batch of images concurrently, all or nothing.
///
/// On success the result has one artifact per path, at the same index.
#[instrument(level = "debug", skip_all, fields(count = paths.len()))]
pub fn fetch_many<S>(
    backend: &impl ImageBackend,
    root: &Path,
    paths: &[S],
    request: DimensionRequest,
    options: FetchOptions,
) -> Result<Vec<ImageArtifact>, FetchError>
where
    S: AsRef<str> + Sync,
{
    // one slot per task, so reporting a failure never waits on the receiver
    let (errors_tx, errors_rx) = mpsc::sync_channel(paths.len());

    let slots: Vec<Option<ImageArtifact>> = paths
        .par_iter()
        .map(
            |path| match fetch_one(backend, root, path.as_ref(), request, options) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    warn!(path = path.as_ref(), error = %e, "batch item failed");
                    // the receiver outlives every task and has room for all of them
                    let _ = errors_tx.send(e);
                    None
                }
            },
        )
        .collect();
    drop(errors_tx);

    if let Ok(first) = errors_rx.recv() {
        return Err(first);
    }
    Ok(slots.into_iter().flatten().collect())
}
