//! Image processing — pure Rust, zero external dependencies.
//!
//! The pipeline treats resizing as an opaque capability: "resize this
//! image to W×H, cropping excess, and write it there". The module is
//! split into:
//! - **Backend**: [`ImageBackend`] trait, parameter types, errors
//! - **RustBackend**: the `image`-crate implementation
//!
//! Tests swap in a recording mock (see `backend::tests`), so pipeline
//! logic is exercised without decoding a single pixel.

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ThumbnailParams};
pub use rust_backend::RustBackend;
