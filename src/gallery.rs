//! Gallery tag: DSL parsing and HTML fragment rendering.
//!
//! The tag body is a tiny line-oriented format, one image per line:
//!
//! ```text
//! photos/dawn.jpg :: First light over the valley
//! photos/noon.jpg
//! ```
//!
//! Paths are relative to the configured base URL; captions are optional.
//! Rendering is pure string work — full-size and thumbnail URLs are
//! concatenated from config, never resolved against the filesystem. The
//! thumbnail URL uses the same naming rule the cache writes with
//! ([`cache::thumb_name`]), so emitted markup and generated files can
//! never disagree.
//!
//! Fragments are built with [maud](https://maud.lambda.xyz/): interpolated
//! captions and paths are auto-escaped, so a stray `"` or `<` in a caption
//! cannot produce malformed markup.

use crate::cache;
use crate::config::{ConfigError, GalleryConfig};
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Items per visual row assumed by the trailing clear-fix marker.
///
/// Deliberately a constant rather than the `columns` config value,
/// matching the markup's fixed CSS grid; see DESIGN.md.
const CLEAR_FIX_MODULUS: usize = 4;

/// A parsed DSL line. Lines without a `::` separator have no caption;
/// rendering treats that as an empty caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryLine {
    pub path: String,
    pub caption: Option<String>,
}

/// One gallery entry with its computed URLs.
///
/// Built per render and discarded after the fragment is emitted — never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub path: String,
    pub caption: String,
    /// Full-size image URL: `{url}/{path}`.
    pub url: String,
    /// Thumbnail URL: `{url}/{thumb_name(path)}`.
    pub thumbnail: String,
}

/// Parse a tag body into gallery lines, lazily.
///
/// Lines are trimmed and blank lines dropped. Each remaining line splits
/// on `::` with surrounding whitespace stripped from every field; fields
/// beyond the first two are ignored. Parsing is stateless — re-running
/// over the same body yields the same sequence.
pub fn parse_block(body: &str) -> impl Iterator<Item = GalleryLine> + '_ {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.split("::").map(str::trim);
            let path = fields.next().unwrap_or_default().to_string();
            let caption = fields.next().map(str::to_string);
            GalleryLine { path, caption }
        })
}

/// Resolve parsed lines into items with computed URLs, in input order.
pub fn resolve_items<'a>(
    lines: impl Iterator<Item = GalleryLine> + 'a,
    config: &'a GalleryConfig,
) -> impl Iterator<Item = GalleryItem> + 'a {
    lines.map(move |line| GalleryItem {
        url: format!("{}/{}", config.url, line.path),
        thumbnail: format!("{}/{}", config.url, cache::thumb_name(&line.path)),
        caption: line.caption.unwrap_or_default(),
        path: line.path,
    })
}

/// Render a named gallery from its tag body.
///
/// Fails with [`ConfigError::Missing`] if the config has no base URL —
/// this aborts the one tag, not the build.
pub fn render(
    gallery_name: &str,
    body: &str,
    config: &GalleryConfig,
) -> Result<Markup, GalleryError> {
    config.validate()?;
    let items: Vec<GalleryItem> = resolve_items(parse_block(body), config).collect();
    Ok(render_items(gallery_name, &items, config))
}

/// Render resolved items. Split out from [`render`] for hosts that build
/// their item lists without the DSL.
pub fn render_items(gallery_name: &str, items: &[GalleryItem], config: &GalleryConfig) -> Markup {
    html! {
        div class="gallery" {
            @for item in items {
                dl class="gallery-item" {
                    a class="gallery-link"
                        rel=(gallery_name)
                        href=(item.url)
                        title=(item.caption)
                        data-lightbox=(gallery_name)
                    {
                        img src=(item.thumbnail)
                            class="thumbnail"
                            width=(config.thumb_width)
                            height=(config.thumb_height);
                    }
                }
            }
            @if items.len() % CLEAR_FIX_MODULUS != 0 {
                br style="clear: both;";
            }
        }
    }
}
