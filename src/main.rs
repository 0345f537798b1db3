use anyhow::Result;
use tracing::{info, warn};

mod catalog_scraper;
mod config;
mod error;
mod exporter;
mod fetcher;
mod models;
mod normalizer;
mod scraper;
mod scrapers;
mod traits;

use catalog_scraper::CatalogScraper;
use config::RunConfig;
use fetcher::HttpFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = RunConfig::from_env()?;
    info!(
        "Starting Randtech price scrape: {} categories -> {}",
        config.categories.len(),
        config.output_path().display()
    );

    let fetcher = HttpFetcher::new(&config)?;
    let scraper = CatalogScraper::new(fetcher, config);

    if scraper.run().await?.is_none() {
        warn!("Run finished without an output file");
    }

    Ok(())
}
