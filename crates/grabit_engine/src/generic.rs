use std::collections::BTreeMap;

use grabit_core::OutputFormat;

use crate::convert::convert_to_markdown;
use crate::decode::decode_page;
use crate::extract::extract_readable;
use crate::fetch::Fetcher;
use crate::grabber::Grabber;
use crate::images::{localize_images, IMAGE_SUBDIR};
use crate::render::{apply_render_flags, resolve_title};
use crate::types::{GrabError, GrabRequest, GrabResult};

/// Catch-all grabber for ordinary web pages: download, extract the readable
/// fragment, localize images, and render the requested formats.
#[derive(Debug, Default)]
pub struct GenericGrabber;

impl Grabber for GenericGrabber {
    fn can_handle(&self, _url: &str) -> bool {
        true
    }

    fn grab(&self, request: &GrabRequest, fetcher: &dyn Fetcher) -> Result<GrabResult, GrabError> {
        let formats = &request.output_formats;
        let mut outputs = BTreeMap::new();

        let page = fetcher
            .fetch_page(&request.url)
            .map_err(|source| GrabError::Download {
                url: request.url.clone(),
                source,
            })?;
        let decoded = decode_page(&page.bytes, page.content_type.as_deref()).map_err(|source| {
            GrabError::Decode {
                url: request.url.clone(),
                source,
            }
        })?;

        if formats.should_output_raw_html() {
            outputs.insert(OutputFormat::RawHtml, decoded.html.clone());
        }

        let extracted = extract_readable(&decoded.html, request.use_readability)?;
        let title = resolve_title(extracted.title.as_deref(), &request.fallback_title);

        let mut readable_html = extracted.content_html;
        let mut images = Vec::new();
        if request.download_images && formats.any_file_output() {
            let localized = localize_images(&readable_html, &request.url, IMAGE_SUBDIR, fetcher);
            readable_html = localized.html;
            images = localized.images;
        }

        if formats.should_output_readable_html() {
            outputs.insert(OutputFormat::ReadableHtml, readable_html.clone());
        }

        if formats.should_output_markdown() {
            let markdown = convert_to_markdown(&readable_html);
            let markdown =
                apply_render_flags(&markdown, &title, &request.url, request.render_flags);
            if formats.should_output_markdown_file() {
                outputs.insert(OutputFormat::Md, markdown.clone());
            }
            if formats.should_output_markdown_stdout() {
                outputs.insert(OutputFormat::StdoutMd, markdown);
            }
        }

        Ok(GrabResult {
            title,
            outputs,
            images,
        })
    }
}
