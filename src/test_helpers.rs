//! Shared test utilities for the gallerytag test suite.
//!
//! Fixture writers for temp content trees, real encoded image bytes for
//! backend tests, and mtime control for freshness tests.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::{ImageFormat, RgbImage};

/// Write a file under `root` at a relative path, creating parent
/// directories. Returns the absolute path.
pub fn write_file(root: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

/// Set a file's modification time.
pub fn set_mtime(path: &Path, mtime: SystemTime) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(mtime).unwrap();
}

/// A real encoded image of the given size, as bytes.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Write a decodable PNG fixture.
pub fn write_png(root: &Path, rel: &str, width: u32, height: u32) -> PathBuf {
    write_file(root, rel, &image_bytes(width, height, ImageFormat::Png))
}

/// Write a decodable JPEG fixture.
pub fn write_jpeg(root: &Path, rel: &str, width: u32, height: u32) -> PathBuf {
    write_file(root, rel, &image_bytes(width, height, ImageFormat::Jpeg))
}
