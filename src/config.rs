//! Run configuration
//!
//! A [`RunConfig`] is built once at startup from the site profile defaults
//! plus `SCRAPER_*` environment overrides and is read-only afterwards.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::scrapers::randtech;
use crate::traits::SiteSelectors;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// A named product listing with its first-page URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(alias = "url")]
    pub base_url: String,
}

impl Category {
    /// URL of listing page `page` (1-based)
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.clone()
        } else {
            format!("{}page/{page}/", self.base_url)
        }
    }
}

/// What to do when the card wait on a page times out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTimeoutPolicy {
    /// Treat the timeout as the end of the listing
    EndOfListing,
    /// Re-navigate the same page up to `attempts` more times
    Retry { attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub categories: Vec<Category>,
    pub selectors: SiteSelectors,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub run_date: NaiveDate,
    pub navigation_timeout: Duration,
    pub card_wait: Duration,
    pub page_delay: Duration,
    pub max_pages: Option<u32>,
    pub wait_timeout_policy: WaitTimeoutPolicy,
    pub user_agent: String,
}

impl RunConfig {
    /// Site profile defaults for a run on `run_date`
    pub fn new(run_date: NaiveDate) -> Self {
        Self {
            categories: randtech::default_categories(),
            selectors: randtech::site_selectors(),
            output_dir: PathBuf::from("."),
            file_prefix: randtech::FILE_PREFIX.to_string(),
            run_date,
            navigation_timeout: Duration::from_secs(180),
            card_wait: Duration::from_secs(10),
            page_delay: Duration::from_secs(2),
            max_pages: None,
            wait_timeout_policy: WaitTimeoutPolicy::EndOfListing,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Build from process environment, dated today
    ///
    /// # Errors
    /// Returns `ConfigError` if an override is malformed or the result fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let today = chrono::Local::now().date_naive();
        Self::from_lookup(today, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns `ConfigError` if an override is malformed or the result fails validation
    pub fn from_lookup<F>(run_date: NaiveDate, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(run_date);

        if let Some(path) = lookup("SCRAPER_CATEGORIES_FILE") {
            config.categories = load_categories(&path)?;
        }
        if let Some(dir) = lookup("SCRAPER_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup("SCRAPER_FILE_PREFIX") {
            config.file_prefix = prefix;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "SCRAPER_PAGE_DELAY_SECS")? {
            config.page_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "SCRAPER_CARD_WAIT_SECS")? {
            config.card_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "SCRAPER_NAVIGATION_TIMEOUT_SECS")? {
            config.navigation_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var::<u32, _>(&lookup, "SCRAPER_MAX_PAGES")? {
            config.max_pages = (max > 0).then_some(max);
        }
        if let Some(attempts) = parse_var::<u32, _>(&lookup, "SCRAPER_WAIT_RETRIES")? {
            config.wait_timeout_policy = if attempts == 0 {
                WaitTimeoutPolicy::EndOfListing
            } else {
                WaitTimeoutPolicy::Retry { attempts }
            };
        }

        config.validate()
    }

    /// Check categories and normalize their base URLs to end in `/`
    ///
    /// # Errors
    /// Returns the first `ConfigError` found
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        for category in &mut self.categories {
            category.name = category.name.trim().to_string();
            if category.name.is_empty() {
                return Err(ConfigError::EmptyCategoryName(category.base_url.clone()));
            }

            let url = Url::parse(category.base_url.trim()).map_err(|e| ConfigError::InvalidUrl {
                name: category.name.clone(),
                url: category.base_url.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl {
                    name: category.name.clone(),
                    url: category.base_url.clone(),
                    reason: format!("unsupported scheme `{}`", url.scheme()),
                });
            }

            let mut base = url.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            category.base_url = base;
        }

        Ok(self)
    }

    /// `<prefix><DD-MM-YYYY>.xlsx`
    pub fn file_name(&self) -> String {
        format!("{}{}.xlsx", self.file_prefix, self.run_date.format("%d-%m-%Y"))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.file_name())
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        })
        .transpose()
}

fn load_categories(path: &str) -> Result<Vec<Category>, ConfigError> {
    let file_error = |reason: String| ConfigError::CategoriesFile {
        path: path.to_string(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))
}
