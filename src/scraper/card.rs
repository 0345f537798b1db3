//! Per-card field extraction
//!
//! Each field is read on its own and falls back to its default when the
//! selector finds nothing, so one broken field never costs the others.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::{CardError, ConfigError};
use crate::models::{ProductRecord, SENTINEL};
use crate::traits::SiteSelectors;

/// Compiled field selectors for one site
#[derive(Debug)]
pub struct CardSelectors {
    name: Selector,
    price: Selector,
    description: Option<Selector>,
    link: Selector,
    image: Selector,
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector(selector.to_string()))
}

impl CardSelectors {
    /// # Errors
    /// Returns `ConfigError::InvalidSelector` for the first selector that is not valid CSS
    pub fn compile(selectors: &SiteSelectors) -> Result<Self, ConfigError> {
        compile(&selectors.product_card)?;

        Ok(Self {
            name: compile(&selectors.name)?,
            price: compile(&selectors.price)?,
            description: selectors.description.as_deref().map(compile).transpose()?,
            link: compile(&selectors.link)?,
            image: compile(&selectors.image)?,
        })
    }
}

/// How a field's value is read from the first matching element
#[derive(Debug, Clone, Copy)]
enum Read {
    Text,
    /// First non-empty attribute, resolved against the page URL
    Url(&'static [&'static str]),
}

struct FieldRule<'s> {
    field: &'static str,
    selector: Option<&'s Selector>,
    read: Read,
    default: &'static str,
}

impl FieldRule<'_> {
    fn extract(&self, card: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
        let element = card.select(self.selector?).next()?;
        match self.read {
            Read::Text => Some(collapse_whitespace(&element.text().collect::<String>())),
            Read::Url(attrs) => {
                let value = attrs
                    .iter()
                    .find_map(|attr| element.value().attr(attr).filter(|v| !v.trim().is_empty()))?
                    .trim();
                match base {
                    Some(base) => base.join(value).ok().map(String::from),
                    None => Some(value.to_string()),
                }
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a record from one card's outer HTML.
///
/// # Errors
/// * `CardError::EmptyCard` - the markup holds no element at all
pub fn extract_card(
    card_html: &str,
    category: &str,
    page_url: &str,
    selectors: &CardSelectors,
) -> Result<ProductRecord, CardError> {
    let fragment = Html::parse_fragment(card_html);
    let card = fragment.root_element();
    if !card.children().any(|node| node.value().is_element()) {
        return Err(CardError::EmptyCard);
    }

    let base = Url::parse(page_url).ok();
    let rules = [
        FieldRule {
            field: "name",
            selector: Some(&selectors.name),
            read: Read::Text,
            default: SENTINEL,
        },
        FieldRule {
            field: "price",
            selector: Some(&selectors.price),
            read: Read::Text,
            default: SENTINEL,
        },
        FieldRule {
            field: "description",
            selector: selectors.description.as_ref(),
            read: Read::Text,
            default: "",
        },
        FieldRule {
            field: "link",
            selector: Some(&selectors.link),
            read: Read::Url(&["href"]),
            default: SENTINEL,
        },
        FieldRule {
            field: "image",
            // Lazy-loaded images keep the real source in data-src
            selector: Some(&selectors.image),
            read: Read::Url(&["data-src", "src"]),
            default: SENTINEL,
        },
    ];

    let [raw_name, price, description, link, image] = rules.map(|rule| {
        rule.extract(card, base.as_ref()).unwrap_or_else(|| {
            debug!(field = rule.field, page_url, "field not found, using default");
            rule.default.to_string()
        })
    });

    Ok(ProductRecord {
        category: category.to_string(),
        raw_name,
        price,
        description,
        link,
        image,
        source_url: page_url.to_string(),
    })
}
