//! HTTP page fetcher
//!
//! Loads listing pages with `reqwest` and matches product cards with
//! `scraper` selectors. The delivered HTML is final, so cards that are not in
//! the document are reported as an empty match right away.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::RunConfig;
use crate::error::FetchError;
use crate::traits::{PageFetcher, RenderedPage};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &RunConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.navigation_timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn navigate(&self, url: &str) -> Result<RenderedPage, FetchError> {
        let navigation_error = |e: reqwest::Error| FetchError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(navigation_error)?;

        // A missing page past the end of a listing is a normal, card-less document
        let status = response.status();
        if !status.is_success() {
            debug!("{} answered with status {}", url, status);
        }

        let html = response.text().await.map_err(navigation_error)?;

        Ok(RenderedPage {
            url: url.to_string(),
            status: Some(status.as_u16()),
            html,
        })
    }

    async fn wait_for_selector(
        &self,
        page: &RenderedPage,
        selector: &str,
    ) -> Result<Vec<String>, FetchError> {
        let selector = Selector::parse(selector)
            .map_err(|_| FetchError::InvalidSelector(selector.to_string()))?;
        let document = Html::parse_document(&page.html);

        Ok(document.select(&selector).map(|card| card.html()).collect())
    }
}
