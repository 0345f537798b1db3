//! Category pagination
//!
//! Walks `base`, `base/page/2/`, `base/page/3/`, ... until a page yields no
//! product cards or cannot be loaded. There is no last-page marker: an empty
//! page is the only end-of-listing signal.

pub mod card;

use tracing::{debug, info, warn};

use crate::config::{Category, RunConfig, WaitTimeoutPolicy};
use crate::error::{ConfigError, FetchError};
use crate::models::ProductRecord;
use crate::traits::PageFetcher;

use card::{CardSelectors, extract_card};

/// Why a category's pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page failed to load; remaining pages were abandoned
    NavigationFailed,
    /// A page loaded but held zero product cards
    NoCards,
    /// No product card appeared within the card wait
    WaitTimedOut,
    /// The configured page cap was reached
    PageLimit,
}

/// Everything scraped from one category, in page then card order
#[derive(Debug, Clone)]
pub struct CategoryCrawl {
    pub category: String,
    pub records: Vec<ProductRecord>,
    /// Pages that contributed cards
    pub pages_scraped: u32,
    pub stop_reason: StopReason,
}

enum PageLoad {
    Cards(Vec<String>),
    TimedOut,
    Failed(FetchError),
}

pub struct Paginator<'a, F: PageFetcher> {
    fetcher: &'a F,
    config: &'a RunConfig,
    selectors: CardSelectors,
}

impl<'a, F: PageFetcher> Paginator<'a, F> {
    /// # Errors
    /// Returns `ConfigError::InvalidSelector` if the site selectors do not compile
    pub fn new(fetcher: &'a F, config: &'a RunConfig) -> Result<Self, ConfigError> {
        let selectors = CardSelectors::compile(&config.selectors)?;
        Ok(Self {
            fetcher,
            config,
            selectors,
        })
    }

    /// Scrape every page of `category`.
    ///
    /// Never fails: load errors end this category only and are logged.
    pub async fn crawl_category(&self, category: &Category) -> CategoryCrawl {
        info!("Scraping category: {}", category.name);

        let mut records = Vec::new();
        let mut page_number: u32 = 1;

        let stop_reason = loop {
            if let Some(max) = self.config.max_pages
                && page_number > max
            {
                info!(
                    "Reached maximum page limit ({}) for category: {}",
                    max, category.name
                );
                break StopReason::PageLimit;
            }

            let page_url = category.page_url(page_number);

            let cards = match self.load_page(&page_url).await {
                PageLoad::Cards(cards) if cards.is_empty() => {
                    info!("No more products found on page {}", page_number);
                    break StopReason::NoCards;
                }
                PageLoad::Cards(cards) => cards,
                PageLoad::TimedOut => {
                    info!("No more products found on page {} (card wait timed out)", page_number);
                    break StopReason::WaitTimedOut;
                }
                PageLoad::Failed(e) => {
                    warn!("Error loading page {}: {} - skipping", page_number, e);
                    break StopReason::NavigationFailed;
                }
            };

            info!("Found {} products on page {}", cards.len(), page_number);

            for card_html in &cards {
                match extract_card(card_html, &category.name, &page_url, &self.selectors) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!("Error extracting product on page {}: {}", page_number, e),
                }
            }

            page_number += 1;
            tokio::time::sleep(self.config.page_delay).await;
        };

        info!(
            "Collected {} products from {} ({} pages)",
            records.len(),
            category.name,
            page_number - 1
        );

        CategoryCrawl {
            category: category.name.clone(),
            records,
            pages_scraped: page_number - 1,
            stop_reason,
        }
    }

    /// Navigate and wait for cards, re-navigating on wait timeouts if the policy allows
    async fn load_page(&self, url: &str) -> PageLoad {
        let retries = match self.config.wait_timeout_policy {
            WaitTimeoutPolicy::EndOfListing => 0,
            WaitTimeoutPolicy::Retry { attempts } => attempts,
        };

        let mut attempt = 0;
        loop {
            let page = match self.fetcher.navigate(url).await {
                Ok(page) => page,
                Err(e) => return PageLoad::Failed(e),
            };
            debug!("Loaded {} (status {:?})", page.url, page.status);

            let wait = self
                .fetcher
                .wait_for_selector(&page, &self.config.selectors.product_card);
            let outcome = tokio::time::timeout(self.config.card_wait, wait)
                .await
                .unwrap_or(Err(FetchError::WaitTimeout(self.config.card_wait)));
            match outcome {
                Ok(cards) => return PageLoad::Cards(cards),
                Err(FetchError::WaitTimeout(waited)) => {
                    debug!("No product cards on {} after {:?}", url, waited);
                }
                Err(e) => return PageLoad::Failed(e),
            }

            if attempt >= retries {
                return PageLoad::TimedOut;
            }
            attempt += 1;
            warn!(
                "Card wait timed out on {}, retrying ({}/{})",
                url, attempt, retries
            );
        }
    }
}
