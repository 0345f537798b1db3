use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::exporter;
use crate::scraper::Paginator;
use crate::traits::PageFetcher;

/// One scrape run: every configured category, then a single workbook
pub struct CatalogScraper<F: PageFetcher> {
    fetcher: F,
    config: RunConfig,
}

impl<F: PageFetcher> CatalogScraper<F> {
    pub fn new(fetcher: F, config: RunConfig) -> Self {
        Self { fetcher, config }
    }

    /// Crawl, aggregate and export. The fetcher is closed whatever the outcome.
    ///
    /// Returns the workbook path, or `None` when nothing was found.
    pub async fn run(&self) -> Result<Option<PathBuf>> {
        let result = self.crawl_and_export().await;

        self.fetcher.close().await;
        info!("Fetcher closed");

        result
    }

    async fn crawl_and_export(&self) -> Result<Option<PathBuf>> {
        let paginator = Paginator::new(&self.fetcher, &self.config)?;

        let mut crawls = Vec::with_capacity(self.config.categories.len());
        for category in &self.config.categories {
            crawls.push(paginator.crawl_category(category).await);
        }

        for crawl in &crawls {
            info!(
                "{}: {} products from {} pages (stopped: {:?})",
                crawl.category,
                crawl.records.len(),
                crawl.pages_scraped,
                crawl.stop_reason
            );
        }

        let total: usize = crawls.iter().map(|c| c.records.len()).sum();
        if total == 0 {
            warn!("No products found at all");
            return Ok(None);
        }

        let rows = exporter::aggregate(&crawls)?;
        info!(
            "Kept {} of {} products across {} categories",
            rows.len(),
            total,
            crawls.len()
        );
        if rows.is_empty() {
            warn!("No named products left to export");
            return Ok(None);
        }

        let path = self.config.output_path();
        exporter::write_workbook(&path, &rows)?;
        info!("Final product data saved to: {}", path.display());

        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::config::Category;
    use crate::error::FetchError;
    use crate::exporter::tests::workbook_part;
    use crate::traits::RenderedPage;

    /// Serves fixed listing pages; any other URL fails to load
    #[derive(Default)]
    struct StaticSite {
        pages: HashMap<String, Vec<String>>,
        closed: AtomicBool,
    }

    #[async_trait]
    impl PageFetcher for StaticSite {
        async fn navigate(&self, url: &str) -> Result<RenderedPage, FetchError> {
            if self.pages.contains_key(url) {
                Ok(RenderedPage {
                    url: url.to_string(),
                    status: Some(200),
                    html: String::new(),
                })
            } else {
                Err(FetchError::Navigation {
                    url: url.to_string(),
                    reason: "404".to_string(),
                })
            }
        }

        async fn wait_for_selector(
            &self,
            page: &RenderedPage,
            _selector: &str,
        ) -> Result<Vec<String>, FetchError> {
            Ok(self.pages.get(&page.url).cloned().unwrap_or_default())
        }

        async fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn card(name: &str, price: &str) -> String {
        format!(
            r#"<div class="product-small"><div class="box-text">
               <p class="name product-title">{name}</p>
               <span class="woocommerce-Price-amount">{price}</span></div></div>"#
        )
    }

    fn config(dir: &std::path::Path, categories: &[(&str, &str)]) -> RunConfig {
        let mut config = RunConfig::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        config.page_delay = Duration::ZERO;
        config.card_wait = Duration::from_millis(50);
        config.output_dir = dir.to_path_buf();
        config.categories = categories
            .iter()
            .map(|(name, url)| Category {
                name: (*name).to_string(),
                base_url: (*url).to_string(),
            })
            .collect();
        config
    }

    #[tokio::test]
    async fn failing_category_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut site = StaticSite::default();
        site.pages.insert(
            "https://shop.example/paint/".to_string(),
            vec![card("Duracoat Gloss Paint 4L", "KSh 1,250.00")],
        );
        site.pages
            .insert("https://shop.example/paint/page/2/".to_string(), Vec::new());

        let config = config(
            dir.path(),
            &[
                ("Cement", "https://shop.example/cement/"),
                ("Paint", "https://shop.example/paint/"),
            ],
        );
        let scraper = CatalogScraper::new(site, config);

        let path = scraper.run().await.unwrap().expect("workbook written");

        assert_eq!(path, dir.path().join("randtech_07-03-2024.xlsx"));
        assert!(scraper.fetcher.closed.load(Ordering::SeqCst));

        let strings = workbook_part(&path, "xl/sharedStrings.xml");
        assert!(strings.contains("<t>Paint</t>"));
        assert!(strings.contains("<t>Duracoat Gloss Paint</t>"));
        assert!(!strings.contains("Cement"));
        let sheet = workbook_part(&path, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<row r="2""#));
        assert!(!sheet.contains(r#"<row r="3""#));
    }

    #[tokio::test]
    async fn empty_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[("Cement", "https://shop.example/cement/")]);
        let scraper = CatalogScraper::new(StaticSite::default(), config);

        assert_eq!(scraper.run().await.unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(scraper.fetcher.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn coercion_failure_aborts_but_still_closes() {
        let dir = tempfile::tempdir().unwrap();
        let mut site = StaticSite::default();
        site.pages.insert(
            "https://shop.example/paint/".to_string(),
            vec![card("Primer 1L", "1.2.3")],
        );

        let config = config(dir.path(), &[("Paint", "https://shop.example/paint/")]);
        let scraper = CatalogScraper::new(site, config);

        assert!(scraper.run().await.is_err());
        assert!(scraper.fetcher.closed.load(Ordering::SeqCst));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
