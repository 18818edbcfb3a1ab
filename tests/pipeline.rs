//! End-to-end pipeline test: scan a real content tree, generate real
//! thumbnails through the pure-Rust backend, rebuild to confirm the
//! freshness cache, and render the markup fragments off the same tree.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{ImageFormat, RgbImage};
use tempfile::TempDir;

use gallerytag::config::SiteTagConfig;
use gallerytag::imaging::{ImageBackend, RustBackend};
use gallerytag::process::process_thumbnails;
use gallerytag::scan::{ThumbnailSet, scan_static_files};
use gallerytag::series::{Document, SeriesEntry, SeriesIndex, render_series_for_doc};
use gallerytag::{gallery, series};

fn write_image(root: &Path, rel: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let img = RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();

    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, buf.into_inner()).unwrap();

    // Push the source into the past so freshness comparisons don't race
    // the test itself.
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    path
}

fn config() -> SiteTagConfig {
    SiteTagConfig::from_toml_str(
        r#"
        [gallerytag]
        url = "/img"
        thumb_width = 10
        thumb_height = 10

        [processing]
        max_workers = 2
    "#,
    )
    .unwrap()
}

#[test]
fn full_asset_pass_generates_then_skips() {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    let output = tmp.path().join("site");

    write_image(&content, "photos/a.jpg", 40, 30, ImageFormat::Jpeg);
    write_image(&content, "photos/b.png", 30, 40, ImageFormat::Png);
    // Wrong format and wrong extension case: inventoried, never derived.
    fs::create_dir_all(&content).unwrap();
    fs::write(content.join("c.gif"), b"GIF89a").unwrap();
    write_image(&content, "d.JPG", 20, 20, ImageFormat::Jpeg);

    let cfg = config();
    let files = scan_static_files(&content).unwrap();
    assert_eq!(files.len(), 4);

    let mut set = ThumbnailSet::new();
    let (w, h) = cfg.gallerytag.thumb_size();
    set.register_all(&files, w, h);
    assert_eq!(set.len(), 2);

    let backend = RustBackend::new();
    let report = process_thumbnails(&backend, &set, &output, 2).unwrap();
    assert_eq!(report.stats.generated, 2);
    assert!(report.failures.is_empty());

    // Derived files mirror source paths with the -thumb suffix, at the
    // exact configured dimensions.
    let a_thumb = output.join("photos/a-thumb.jpg");
    let b_thumb = output.join("photos/b-thumb.png");
    assert!(a_thumb.exists());
    assert!(b_thumb.exists());
    assert!(!output.join("c-thumb.gif").exists());
    assert!(!output.join("d-thumb.JPG").exists());

    let dims = backend.identify(&a_thumb).unwrap();
    assert_eq!((dims.width, dims.height), (10, 10));

    // Output mtime is stamped to the source's, so a second pass skips
    // every write.
    let src_mtime = fs::metadata(content.join("photos/a.jpg"))
        .unwrap()
        .modified()
        .unwrap();
    let thumb_mtime = fs::metadata(&a_thumb).unwrap().modified().unwrap();
    assert_eq!(thumb_mtime, src_mtime);

    let rebuild = process_thumbnails(&backend, &set, &output, 2).unwrap();
    assert_eq!(rebuild.stats.generated, 0);
    assert_eq!(rebuild.stats.fresh, 2);

    // Touching one source regenerates only that thumbnail.
    let touched = fs::OpenOptions::new()
        .write(true)
        .open(content.join("photos/b.png"))
        .unwrap();
    touched.set_modified(SystemTime::now()).unwrap();

    let partial = process_thumbnails(&backend, &set, &output, 2).unwrap();
    assert_eq!(partial.stats.generated, 1);
    assert_eq!(partial.stats.fresh, 1);
}

#[test]
fn corrupt_image_is_skipped_and_reported() {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    let output = tmp.path().join("site");

    write_image(&content, "good.jpg", 20, 20, ImageFormat::Jpeg);
    fs::write(content.join("broken.jpg"), b"definitely not a jpeg").unwrap();

    let files = scan_static_files(&content).unwrap();
    let mut set = ThumbnailSet::new();
    set.register_all(&files, 10, 10);
    assert_eq!(set.len(), 2);

    let report = process_thumbnails(&RustBackend::new(), &set, &output, 2).unwrap();
    assert_eq!(report.stats.generated, 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.failures[0].source_rel, "broken.jpg");
    assert!(output.join("good-thumb.jpg").exists());
    assert!(!output.join("broken-thumb.jpg").exists());
}

#[test]
fn rendered_gallery_points_at_generated_thumbnails() {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    let output = tmp.path().join("site");

    write_image(&content, "photos/a.jpg", 40, 30, ImageFormat::Jpeg);

    let cfg = config();
    let files = scan_static_files(&content).unwrap();
    let mut set = ThumbnailSet::new();
    let (w, h) = cfg.gallerytag.thumb_size();
    set.register_all(&files, w, h);
    process_thumbnails(&RustBackend::new(), &set, &output, 2).unwrap();

    let html = gallery::render("trip", "photos/a.jpg :: Dawn\n", &cfg.gallerytag)
        .unwrap()
        .into_string();

    // The emitted thumbnail URL and the generated file share one naming
    // rule; strip the configured base URL and the file must exist.
    let thumb_url = "/img/photos/a-thumb.jpg";
    assert!(html.contains(&format!("src=\"{thumb_url}\"")));
    let rel = thumb_url.strip_prefix("/img/").unwrap();
    assert!(output.join(rel).exists());
}

#[test]
fn series_resolution_feeds_per_document_rendering() {
    let docs = vec![
        Document {
            id: "p2".into(),
            title: "Pipelines, part two".into(),
            series: Some(SeriesEntry {
                id: "pipelines".into(),
                part: 2,
                short_title: Some("Part 2".into()),
            }),
        },
        Document {
            id: "p1".into(),
            title: "Pipelines, part one".into(),
            series: Some(SeriesEntry {
                id: "pipelines".into(),
                part: 1,
                short_title: None,
            }),
        },
        Document::new("standalone", "Not in a series"),
    ];

    let (index, warnings) = SeriesIndex::resolve(&docs);
    assert!(warnings.is_empty());

    let html = render_series_for_doc(&index, "p2").unwrap().into_string();
    let first = html.find("Pipelines, part one").unwrap();
    let second = html.find("Part 2").unwrap();
    assert!(first < second);

    assert!(render_series_for_doc(&index, "standalone").is_none());

    // The tag form agrees without consulting the index.
    let tag_html = series::render_series_tag("pipelines", &docs).into_string();
    assert_eq!(tag_html, html);
}
