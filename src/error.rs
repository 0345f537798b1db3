//! Error types for each stage of a scrape run
//!
//! Page, card and field failures are contained where they happen. Only an
//! [`ExportError`] raised while building the final table aborts a run.

use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`crate::traits::PageFetcher`]
#[derive(Debug, Error)]
pub enum FetchError {
    /// Navigation to a listing page failed (network error, timeout, bad URL)
    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// No product card appeared within the card wait
    #[error("no product cards appeared within {0:?}")]
    WaitTimeout(Duration),

    #[error("invalid CSS selector `{0}`")]
    InvalidSelector(String),
}

/// A whole card could not be processed; the card is skipped
#[derive(Debug, Error)]
pub enum CardError {
    #[error("card markup contains no element")]
    EmptyCard,
}

/// Failures while building or writing the output table
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot convert {field} value `{value}` from {source_url} to a number")]
    Coercion {
        field: &'static str,
        value: String,
        source_url: String,
    },

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("output directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid run configuration, reported at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no categories configured")]
    NoCategories,

    #[error("category name must not be empty (url: {0})")]
    EmptyCategoryName(String),

    #[error("category `{name}` has an invalid url `{url}`: {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read categories file {path}: {reason}")]
    CategoriesFile { path: String, reason: String },

    #[error("invalid CSS selector `{0}`")]
    InvalidSelector(String),
}
