//! Data models for scraped product listings and export rows

/// Placeholder stored when a card field cannot be extracted
pub const SENTINEL: &str = "N/A";

/// A product card scraped from one category page
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub category: String,
    pub raw_name: String,
    pub price: String,
    pub description: String,
    pub link: String,
    pub image: String,
    /// URL of the listing page the card was found on
    pub source_url: String,
}

/// Canonical name plus quantity/unit split out of a product title
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedTitle {
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

/// One row of the exported table
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub category: String,
    pub description: String,
    pub product_name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub link: String,
    pub image: String,
}

impl ProductRow {
    /// Column headers, in export order
    pub const HEADERS: [&'static str; 8] = [
        "Category",
        "Description",
        "Product_Name",
        "Quantity",
        "Unit",
        "Price",
        "Link",
        "Image",
    ];
}
