//! Static-file inventory and thumbnail discovery.
//!
//! First stage of the asset pass: walk the content tree to build the
//! static-file inventory, then register one derived-thumbnail entry per
//! eligible image. Hosts that keep their own file inventory can skip the
//! walk and hand [`ThumbnailSet::register_all`] a list of [`StaticFile`]s
//! directly.
//!
//! ## Eligibility
//!
//! A file is a thumbnail candidate iff its literal extension is a member
//! of `{.jpg, .png}` — exact, case-sensitive set membership. `.JPG` and
//! `.jpeg` sources are not candidates.
//!
//! ## Idempotence
//!
//! Registration is keyed by source path, so running discovery twice in
//! one build registers nothing new. Derived names are a pure function of
//! source names, and the inventory's path uniqueness guarantees no two
//! entries share a destination.

use crate::cache;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Non-UTF-8 path: {0}")]
    NonUtf8Path(PathBuf),
}

/// Extensions eligible for thumbnail derivation, as stored (with dot).
pub const THUMB_EXTENSIONS: &[&str] = &[".jpg", ".png"];

/// A file known to the build.
///
/// `rel_path` always uses forward slashes so it can be joined onto a base
/// URL unchanged.
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// Path relative to the content root.
    pub rel_path: String,
    /// Absolute path on disk.
    pub source_path: PathBuf,
    /// Literal extension as stored, with leading dot (e.g. `.jpg`).
    /// Empty for extensionless files.
    pub extension: String,
    /// Last-modified time, the cache key for derived assets.
    pub modified: SystemTime,
}

/// One derived-file entry, registered for the build to emit.
///
/// Created during discovery, written during the output phase, never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct DerivedThumbnail {
    /// Source path relative to the content root.
    pub source_rel: String,
    /// Absolute source path on disk.
    pub source_path: PathBuf,
    /// Destination relative path: `source_rel` with the `-thumb` suffix.
    pub dest_rel: String,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

/// Walk a content tree and inventory every file, in sorted order.
pub fn scan_static_files(root: &Path) -> Result<Vec<StaticFile>, ScanError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path);
        let rel_path = rel
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Path(path.to_path_buf()))?
            .replace('\\', "/");

        let extension = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!(".{ext}"),
            None => String::new(),
        };

        files.push(StaticFile {
            rel_path,
            source_path: path.to_path_buf(),
            extension,
            modified: entry.metadata()?.modified()?,
        });
    }

    Ok(files)
}

/// The set of derived thumbnails registered for this build.
#[derive(Debug, Default)]
pub struct ThumbnailSet {
    entries: Vec<DerivedThumbnail>,
    seen: HashSet<String>,
}

impl ThumbnailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a derived thumbnail for every eligible file.
    ///
    /// Eligibility is exact membership of the stored extension in
    /// [`THUMB_EXTENSIONS`]. Idempotent per source path.
    pub fn register_all(&mut self, files: &[StaticFile], width: u32, height: u32) {
        for file in files {
            if THUMB_EXTENSIONS.contains(&file.extension.as_str()) {
                self.register(file, width, height);
            }
        }
    }

    fn register(&mut self, file: &StaticFile, width: u32, height: u32) {
        if !self.seen.insert(file.rel_path.clone()) {
            return;
        }
        self.entries.push(DerivedThumbnail {
            source_rel: file.rel_path.clone(),
            source_path: file.source_path.clone(),
            dest_rel: cache::thumb_name(&file.rel_path),
            width,
            height,
        });
    }

    /// Registered entries, in registration order.
    pub fn entries(&self) -> &[DerivedThumbnail] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
