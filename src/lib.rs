//! # gallerytag
//!
//! A build pipeline for photo galleries and post series in static sites.
//! Given a content tree and a set of documents, it derives cached
//! thumbnails for every eligible image and renders the HTML fragments a
//! host site generator embeds into its pages: gallery grids driven by a
//! tiny `path :: caption` DSL, and series part lists driven by
//! cross-document `series` metadata.
//!
//! # Architecture: Two Independent Passes
//!
//! ```text
//! Assets:  scan content tree → register thumbnails → generate-if-stale
//! Markup:  parse DSL / resolve series → render fragments
//! ```
//!
//! The asset pass is incremental: a thumbnail is regenerated only when
//! its source's modification time says it must be ([`cache`]). The markup
//! pass is pure — renderers do string work against config and the
//! resolved [`series::SeriesIndex`], never the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Static-file inventory and thumbnail discovery (`.jpg`/`.png` candidates) |
//! | [`cache`] | Derived-name convention, mtime freshness policy, single-thumbnail generation |
//! | [`process`] | The parallel thumbnail pass: skip-if-fresh, collect failures, tally |
//! | [`gallery`] | Gallery DSL parsing and grid fragment rendering |
//! | [`series`] | Series grouping/ordering and part-list rendering |
//! | [`config`] | Typed `gallerytag`/`series`/`processing` config with load-time validation |
//! | [`imaging`] | The resize capability behind a backend trait (pure-Rust `image` impl) |
//!
//! # Design Decisions
//!
//! ## Mtime as the Cache Key
//!
//! Freshness is one comparison: a derived file whose mtime is at least
//! its source's is fresh. Generation stamps the output's mtime to the
//! source's, so rebuild decisions depend only on content changes, never
//! on when the last build ran. No manifest to corrupt, no hashes to
//! compute — the derived files *are* the cache.
//!
//! ## Maud Over String Concatenation
//!
//! Fragments are rendered with [Maud](https://maud.lambda.xyz/):
//! compile-time checked markup with auto-escaped interpolation, so a
//! caption containing `"` or `<` cannot break the emitted HTML.
//!
//! ## Resolve, Then Render
//!
//! Series resolution produces an explicit lookup table instead of
//! writing a computed field onto each document. Documents stay
//! immutable; per-document renders take `&SeriesIndex`, which makes the
//! resolve-before-render ordering a property of the API rather than a
//! convention.
//!
//! ## Failures Stay Local
//!
//! A corrupt image skips its thumbnail, a gallery tag without a base URL
//! fails that tag, a duplicated series part becomes a warning. Nothing
//! in this crate fails a whole build; per-item failures are collected
//! and reported after each pass.

pub mod cache;
pub mod config;
pub mod gallery;
pub mod imaging;
pub mod process;
pub mod scan;
pub mod series;

#[cfg(test)]
pub(crate) mod test_helpers;
