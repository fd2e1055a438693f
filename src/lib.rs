//! # LAN File Distributor
//!
//! Serves images from a shared directory tree (typically a NAS mount) to
//! clients on the local network. Clients name images by *logical* path,
//! relative to the share root, and get them back decoded, turned upright and
//! resized to whatever they asked for.
//!
//! # Architecture: One Pipeline, Many Callers
//!
//! Every image goes through the same single-item pipeline:
//!
//! ```text
//! logical path → resolve → decode → orient → resize → ImageArtifact
//! ```
//!
//! Batches (an explicit list or a random sample of a folder) run that
//! pipeline once per path on the rayon pool and either return every artifact,
//! in request order, or fail with the first error.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`repository`] | The public surface: listing, single, batch and random fetches |
//! | [`fetch`] | Single-image pipeline and the concurrent all-or-nothing batch |
//! | [`resolve`] | Logical path → filesystem path, never leaving the share root |
//! | [`imaging`] | Decode, EXIF orientation, dimension policy, resize, JPEG encode |
//! | [`sample`] | Thread-safe random selection without replacement |
//! | [`config`] | `config.toml` loading, validation and environment overrides |
//! | [`types`] | Types handed to callers (`File`, `ImageArtifact`, `EncodedArtifact`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Upright Before Resize
//!
//! EXIF orientation is applied before the target size is computed, so a
//! portrait photo stored sideways is treated as portrait by the dimension
//! policy. Missing or unreadable orientation metadata is never an error.
//!
//! ## All-Or-Nothing Batches
//!
//! A batch result always lines up index-for-index with the request. There is
//! no partial result: one bad path fails the whole call, and all other tasks
//! still run to completion.
//!
//! ## Closed Format List
//!
//! JPEG, PNG, TIFF and WebP are accepted. The extension gates the request
//! before any bytes are read; the decoder then trusts the file signature, not
//! the name.

pub mod config;
pub mod fetch;
pub mod imaging;
pub mod output;
pub mod repository;
pub mod resolve;
pub mod sample;
pub mod types;

pub use fetch::FetchError;
pub use repository::FileRepository;

#[cfg(test)]
pub(crate) mod test_helpers;
