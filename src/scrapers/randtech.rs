//! Randtech.co.ke (WooCommerce) site profile

use crate::config::Category;
use crate::traits::SiteSelectors;

/// File name prefix for the exported workbook
pub const FILE_PREFIX: &str = "randtech_";

/// Category listings crawled by default, in export order
const CATEGORIES: [(&str, &str); 5] = [
    (
        "Cement",
        "https://www.randtech.co.ke/product-category/flooring/cement/",
    ),
    ("Paint", "https://www.randtech.co.ke/product-category/paint/"),
    (
        "Solar Lights",
        "https://www.randtech.co.ke/product-category/electricals/solar-lights/",
    ),
    (
        "Plumbing",
        "https://www.randtech.co.ke/product-category/plumbing/",
    ),
    (
        "Tanks",
        "https://www.randtech.co.ke/product-category/building-materials/tanks/",
    ),
];

pub fn default_categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|(name, url)| Category {
            name: (*name).to_string(),
            base_url: (*url).to_string(),
        })
        .collect()
}

/// Selectors for the Flatsome theme product grid
pub fn site_selectors() -> SiteSelectors {
    SiteSelectors {
        product_card: "div.product-small".to_string(),
        name: ".box-text .name.product-title".to_string(),
        price: "span.woocommerce-Price-amount".to_string(),
        description: Some(".box-text .product-short-description".to_string()),
        link: "a".to_string(),
        image: "img".to_string(),
    }
}
