//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the caching pipeline
//! (which decides *what* to generate) and the pixel work (*how*). The
//! production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, built on
//! the `image` crate. Tests use a recording mock.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("Cannot encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Parameters for a thumbnail operation.
///
/// Crop-to-fill semantics: the output is exactly `width`×`height`, with
/// excess image cropped away rather than letterboxed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers in the
/// thumbnail pass.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Execute a thumbnail operation (resize-to-fill + center crop).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
