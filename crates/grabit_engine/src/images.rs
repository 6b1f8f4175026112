use std::collections::{HashMap, HashSet};
use std::path::Path;

use scraper::{Html, Selector};
use url::Url;

use crate::fetch::Fetcher;
use crate::filename::sanitize_filename;
use crate::types::ImageFile;

/// Subdirectory of the output directory that localized images land in.
pub const IMAGE_SUBDIR: &str = "images";

/// Outcome of rewriting a readable fragment to reference local image copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedImages {
    /// The fragment with every successfully downloaded `<img>` src rewritten
    /// to `{subdir}/{filename}`. Failed or skipped sources keep their
    /// original reference.
    pub html: String,
    /// Downloaded images in first-seen document order.
    pub images: Vec<ImageFile>,
    /// Absolute URLs whose download failed; the run continues without them.
    pub failed: Vec<String>,
}

/// Distinct absolute image URLs referenced by `<img>` tags, in document
/// order. Elements without `src` and `data:` URIs are ignored.
pub fn extract_image_urls(html: &str, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut urls = Vec::new();
    let mut seen = HashSet::new();

    for src in img_sources(&doc) {
        let Some(absolute) = resolve_src(&src, base_url) else {
            continue;
        };
        if seen.insert(absolute.clone()) {
            urls.push(absolute);
        }
    }
    urls
}

/// Download each distinct image once and rewrite the HTML to point at local
/// copies under `subdir`. Download failures are logged, recorded in `failed`,
/// and leave the original `src` untouched.
///
/// The input is treated as a fragment: the rewritten HTML keeps its shape and
/// is not wrapped in a document skeleton.
pub fn localize_images(
    html: &str,
    base_url: &str,
    subdir: &str,
    fetcher: &dyn Fetcher,
) -> LocalizedImages {
    let doc = Html::parse_fragment(html);
    let mut rewritten = doc.root_element().inner_html();
    let mut images: Vec<ImageFile> = Vec::new();
    let mut failed: Vec<String> = Vec::new();
    let mut filename_by_url: HashMap<String, String> = HashMap::new();
    let mut used_filenames: HashSet<String> = HashSet::new();

    let img_sel = Selector::parse("img").expect("static selector");
    for img in doc.select(&img_sel) {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        let Some(absolute) = resolve_src(src, base_url) else {
            continue;
        };
        if failed.contains(&absolute) {
            continue;
        }

        let filename = match filename_by_url.get(&absolute) {
            Some(existing) => existing.clone(),
            None => {
                let Some(bytes) = fetcher.fetch_image(&absolute) else {
                    log::warn!("skipping image {absolute}: download failed");
                    failed.push(absolute);
                    continue;
                };
                let filename = generate_filename(&absolute, &used_filenames);
                used_filenames.insert(filename.clone());
                filename_by_url.insert(absolute, filename.clone());
                images.push(ImageFile {
                    filename: filename.clone(),
                    bytes,
                });
                filename
            }
        };

        let tag = img.html();
        let local = format!("{subdir}/{filename}");
        // Anchored on the leading space the serializer emits before every
        // attribute, so a `data-src` carrying the same URL is left alone.
        let needle = format!(" src=\"{}\"", escape_attr(src));
        let replacement = format!(" src=\"{}\"", escape_attr(&local));
        let new_tag = tag.replacen(&needle, &replacement, 1);
        rewritten = rewritten.replace(&tag, &new_tag);
    }

    LocalizedImages {
        html: rewritten,
        images,
        failed,
    }
}

fn img_sources(doc: &Html) -> Vec<String> {
    let img_sel = Selector::parse("img").expect("static selector");
    doc.select(&img_sel)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.starts_with("data:"))
        .map(str::to_string)
        .collect()
}

fn resolve_src(src: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    base.join(src).ok().map(Url::into)
}

/// Local filename for a downloaded image: final URL path segment split into
/// stem and extension (`.jpg` when missing), stem sanitized (`image` when
/// that empties it), `_N` suffix until unique within this invocation.
fn generate_filename(absolute_url: &str, used: &HashSet<String>) -> String {
    let segment = Url::parse(absolute_url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .unwrap_or_default();

    let path = Path::new(&segment);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("");
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".jpg".to_string());

    let mut stem = sanitize_filename(stem);
    if stem.is_empty() {
        stem = "image".to_string();
    }

    let mut candidate = format!("{stem}{extension}");
    let mut counter = 1;
    while used.contains(&candidate) {
        candidate = format!("{stem}_{counter}{extension}");
        counter += 1;
    }
    candidate
}

/// Escape a raw attribute value the way html5ever serializes it, so the
/// needle matches the re-serialized document.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
}
