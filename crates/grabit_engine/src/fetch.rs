use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};

/// Transport failures on a required fetch. Image fetches never surface these;
/// they degrade to `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Value of the `User-Agent` header; the header is omitted when `None`.
    pub user_agent: Option<String>,
    pub accept_language: String,
    /// Per-request timeout for image downloads. The primary page fetch has no
    /// timeout: it blocks until the server responds or the connection drops.
    pub image_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            accept_language: "en-US,en;q=0.9".to_string(),
            image_timeout: Duration::from_secs(10),
        }
    }
}

/// Raw bytes of a fetched page plus the response metadata the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub final_url: String,
}

/// Seam between the pipeline and the network. Tests substitute canned
/// responses here instead of mocking HTTP.
pub trait Fetcher: Send + Sync {
    /// Single GET for the page (or JSON listing) being grabbed.
    fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError>;

    /// GET for one embedded image. Any failure, timeout included, is a soft
    /// per-image failure reported as `None`.
    fn fetch_image(&self, url: &str) -> Option<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, &self.settings.accept_language);
        if let Some(agent) = &self.settings.user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().map_err(map_reqwest_error)?.to_vec();

        Ok(PageResponse {
            bytes,
            content_type,
            final_url,
        })
    }

    fn fetch_image(&self, url: &str) -> Option<Vec<u8>> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "image/*")
            .timeout(self.settings.image_timeout);
        if let Some(agent) = &self.settings.user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(err) => {
                log::warn!("image download failed for {url}: {err}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!(
                "image download failed for {url}: http status {}",
                response.status().as_u16()
            );
            return None;
        }
        match response.bytes() {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(err) => {
                log::warn!("image download failed for {url}: {err}");
                None
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    FetchError::Network(err.to_string())
}
