//! Pure Rust image processing backend.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header read, no full decode) |
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Resize + crop | `image::DynamicImage::resize_to_fill` with `Lanczos3` |
//! | Encode | `image::DynamicImage::save` (format from output extension) |
//!
//! Only JPEG and PNG decoders are compiled in — discovery only ever feeds
//! `.jpg`/`.png` sources into the pipeline, and thumbnails are written in
//! the source's own format.

use super::backend::{BackendError, Dimensions, ImageBackend, ThumbnailParams};
use image::ImageReader;
use image::imageops::FilterType;
use std::path::Path;

/// Backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Dimensions { width, height })
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = ImageReader::open(&params.source)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: params.source.clone(),
                reason: e.to_string(),
            })?;

        let thumb = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);

        thumb
            .save(&params.output)
            .map_err(|e| BackendError::Encode {
                path: params.output.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
