use crate::fetch::Fetcher;
use crate::generic::GenericGrabber;
use crate::reddit::RedditGrabber;
use crate::types::{GrabError, GrabRequest, GrabResult};

/// A content handler: URL-pattern matching plus the fetch-extract-render
/// pipeline for that pattern.
pub trait Grabber: Send + Sync {
    fn can_handle(&self, url: &str) -> bool;

    fn grab(&self, request: &GrabRequest, fetcher: &dyn Fetcher) -> Result<GrabResult, GrabError>;
}

/// Priority-ordered grabber registry. Constructed once; the first grabber
/// whose `can_handle` matches processes the request, so a catch-all belongs
/// last.
pub struct GrabberRegistry {
    grabbers: Vec<Box<dyn Grabber>>,
}

impl GrabberRegistry {
    pub fn new(grabbers: Vec<Box<dyn Grabber>>) -> Self {
        Self { grabbers }
    }

    /// The built-in registry: Reddit's structured API first, the generic
    /// page grabber as catch-all.
    pub fn with_default_grabbers() -> Self {
        Self::new(vec![Box::new(RedditGrabber), Box::new(GenericGrabber)])
    }

    pub fn pick(&self, url: &str) -> Result<&dyn Grabber, GrabError> {
        self.grabbers
            .iter()
            .find(|grabber| grabber.can_handle(url))
            .map(Box::as_ref)
            .ok_or(GrabError::NoHandler)
    }

    pub fn grab(
        &self,
        request: &GrabRequest,
        fetcher: &dyn Fetcher,
    ) -> Result<GrabResult, GrabError> {
        self.pick(&request.url)?.grab(request, fetcher)
    }
}

impl Default for GrabberRegistry {
    fn default() -> Self {
        Self::with_default_grabbers()
    }
}
