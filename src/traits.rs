//! Traits and interfaces for site-agnostic page fetching

use async_trait::async_trait;

use crate::error::FetchError;

/// A listing page as delivered by the fetch collaborator
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL the page was requested from
    pub url: String,
    /// HTTP status, if the fetcher knows one
    pub status: Option<u16>,
    /// Full document HTML
    pub html: String,
}

/// CSS selectors for the parts of a product card
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// One element per product card
    pub product_card: String,
    /// Title/name selector within the card
    pub name: String,
    /// Price selector within the card
    pub price: String,
    /// Short description selector within the card (optional)
    pub description: Option<String>,
    /// Product link selector within the card
    pub link: String,
    /// Image selector within the card
    pub image: String,
}

/// Fetch collaborator driving one browser or HTTP session for a whole run
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Load `url` and return the rendered document
    ///
    /// # Errors
    /// * `FetchError::Navigation` - network failure, timeout or unusable URL
    async fn navigate(&self, url: &str) -> Result<RenderedPage, FetchError>;

    /// Return the outer HTML of every element matching `selector`
    ///
    /// An empty vector means the page holds no matching element. Callers bound
    /// this call with their own timeout.
    ///
    /// # Errors
    /// * `FetchError::WaitTimeout` - the elements never appeared
    /// * `FetchError::InvalidSelector` - `selector` is not valid CSS
    async fn wait_for_selector(
        &self,
        page: &RenderedPage,
        selector: &str,
    ) -> Result<Vec<String>, FetchError>;

    /// Release the underlying session. Best effort, never fails.
    async fn close(&self) {}
}
