//! Thumbnail freshness cache.
//!
//! Resizing is the expensive step of the asset pass, so derived thumbnails
//! are cached on disk across builds. The entire caching policy is a single
//! modification-time comparison: a derived file is fresh iff its mtime is
//! at least the source's. No hashing, no manifest, no dependency tracking.
//!
//! The trick that makes this deterministic: after generating, the output
//! file's mtime is stamped to match the **source's** mtime, not wall-clock
//! "now". The next build's freshness check then depends only on whether
//! the source changed, never on when the previous build happened to run.
//!
//! Naming is a pure function — `photos/a.jpg` derives `photos/a-thumb.jpg`
//! — shared by the generation side (where to write) and the gallery
//! renderer (which URL to emit), so the two can never drift apart.

use crate::imaging::{BackendError, ImageBackend, ThumbnailParams};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix inserted before the extension of every derived thumbnail.
const THUMB_SUFFIX: &str = "-thumb";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Derived name for a source path: `photos/a.jpg` → `photos/a-thumb.jpg`.
///
/// Pure string function over forward-slash paths, so the result doubles as
/// a URL path segment. Paths without an extension get the suffix appended.
/// Distinct sources always derive distinct names.
pub fn thumb_name(path: &str) -> String {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(rel) if rel > 0 => {
            let dot = name_start + rel;
            format!("{}{}{}", &path[..dot], THUMB_SUFFIX, &path[dot..])
        }
        _ => format!("{path}{THUMB_SUFFIX}"),
    }
}

/// Filesystem counterpart of [`thumb_name`], applied to the file name only.
pub fn thumb_path(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => path.with_file_name(thumb_name(name)),
        None => path.to_path_buf(),
    }
}

/// Whether a thumbnail must be (re)generated.
///
/// Returns false iff a file already exists at `dest` and its mtime is not
/// older than the source's. This comparison is the whole cache.
pub fn needs_generation(source: &Path, dest: &Path) -> io::Result<bool> {
    let dest_meta = match fs::metadata(dest) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let source_mtime = fs::metadata(source)?.modified()?;
    Ok(dest_meta.modified()? < source_mtime)
}

/// Generate one thumbnail at `dest`.
///
/// Idempotent: any existing file at `dest` is removed first. The parent
/// directory is created if missing (`create_dir_all`, so concurrent
/// workers racing on the same directory are fine). After the backend
/// writes the pixels, the output's mtime is stamped to the source's.
pub fn generate(
    backend: &impl ImageBackend,
    source: &Path,
    dest: &Path,
    width: u32,
    height: u32,
) -> Result<(), CacheError> {
    let source_mtime = fs::metadata(source)?.modified()?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::remove_file(dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    backend.thumbnail(&ThumbnailParams {
        source: source.to_path_buf(),
        output: dest.to_path_buf(),
        width,
        height,
    })?;

    let out = fs::OpenOptions::new().write(true).open(dest)?;
    out.set_modified(source_mtime)?;
    Ok(())
}
