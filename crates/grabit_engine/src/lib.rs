//! Grabit engine: the fetch-extract-render pipeline and the output writer.
mod convert;
mod decode;
mod extract;
mod fetch;
mod filename;
mod generic;
mod grabber;
mod images;
mod reddit;
mod render;
mod types;
mod writer;

pub use convert::convert_to_markdown;
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use extract::{extract_readable, ExtractError, Extracted};
pub use fetch::{FetchError, FetchSettings, Fetcher, PageResponse, ReqwestFetcher};
pub use filename::sanitize_filename;
pub use generic::GenericGrabber;
pub use grabber::{Grabber, GrabberRegistry};
pub use images::{extract_image_urls, localize_images, LocalizedImages, IMAGE_SUBDIR};
pub use reddit::RedditGrabber;
pub use render::{apply_render_flags, resolve_title};
pub use types::{GrabError, GrabRequest, GrabResult, ImageFile};
pub use writer::OutputWriter;

use grabit_core::OutputFlags;

/// Process one URL with the default grabber registry and a real HTTP client.
pub fn grab(request: &GrabRequest, settings: FetchSettings) -> Result<GrabResult, GrabError> {
    let fetcher = ReqwestFetcher::new(settings).map_err(GrabError::ClientInit)?;
    GrabberRegistry::with_default_grabbers().grab(request, &fetcher)
}

/// Process one URL and persist the result relative to the current directory.
pub fn grab_and_save(
    request: &GrabRequest,
    settings: FetchSettings,
    output_flags: OutputFlags,
) -> Result<(), GrabError> {
    let result = grab(request, settings)?;
    OutputWriter::new(".").write(
        &result.title,
        &result.outputs,
        &request.url,
        output_flags,
        &result.images,
    )
}
