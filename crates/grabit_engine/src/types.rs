use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use grabit_core::{OutputFormat, OutputFormatList, RenderFlags};

use crate::decode::DecodeError;
use crate::extract::ExtractError;
use crate::fetch::FetchError;

/// One localized image ready to be persisted next to the page artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Collision-free filename inside the images subdirectory.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Everything a grabber needs to process one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabRequest {
    pub url: String,
    /// Run the readability heuristic before falling back to plain extraction.
    pub use_readability: bool,
    /// Title template used when the page yields none; `{date}` expands to the
    /// current local date as `YYYY-MM-DD`.
    pub fallback_title: String,
    pub render_flags: RenderFlags,
    pub output_formats: OutputFormatList,
    /// Localize `<img>` references when a file output was requested.
    pub download_images: bool,
}

impl GrabRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            use_readability: true,
            fallback_title: "Untitled {date}".to_string(),
            render_flags: RenderFlags::default(),
            output_formats: OutputFormatList::default(),
            download_images: true,
        }
    }
}

/// Result of one grab: rendered content per requested format plus any
/// localized images. Persistence is the caller's job.
///
/// The map is keyed by format, so duplicate format requests collapse into a
/// single artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabResult {
    pub title: String,
    pub outputs: BTreeMap<OutputFormat, String>,
    pub images: Vec<ImageFile>,
}

/// Fatal failures of a grab-and-save run.
#[derive(Debug, thiserror::Error)]
pub enum GrabError {
    #[error("error downloading {url}: {source}")]
    Download { url: String, source: FetchError },

    #[error("error decoding {url}: {source}")]
    Decode { url: String, source: DecodeError },

    #[error("error processing HTML content: {0}")]
    ContentExtraction(#[from] ExtractError),

    #[error("Reddit posts can only be converted to Markdown.")]
    UnsupportedFormat,

    #[error("no grabber found for the given URL")]
    NoHandler,

    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("error converting Reddit JSON to Markdown: {0}")]
    Reddit(String),

    #[error("failed to initialize HTTP client: {0}")]
    ClientInit(#[source] FetchError),

    #[error("error writing to file {path}: {source}")]
    FileWrite { path: PathBuf, source: io::Error },

    #[error("failed to create output directory {path}: {source}")]
    OutputDir { path: PathBuf, source: io::Error },
}
