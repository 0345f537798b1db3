//! Product title normalization
//!
//! Splits a raw listing title such as `"Duracoat Gloss Paint 4L"` into the
//! product name, a numeric quantity and a canonical unit.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ParsedTitle;

/// Recognized unit tokens and their canonical upper-case singular form.
///
/// Ordered longest first: the regex alternation is leftmost-first, so a
/// shorter token listed earlier would shadow a longer one (`l` in `litres`).
const UNITS: [(&str, &str); 18] = [
    ("litres", "LITRE"),
    ("pieces", "PIECE"),
    ("meters", "METER"),
    ("grams", "GRAM"),
    ("kilos", "KILO"),
    ("meter", "METER"),
    ("ltrs", "LTR"),
    ("bags", "BAG"),
    ("pack", "PACK"),
    ("kgs", "KG"),
    ("ltr", "LTR"),
    ("pcs", "PC"),
    ("bag", "BAG"),
    ("ml", "ML"),
    ("kg", "KG"),
    ("l", "L"),
    ("g", "G"),
    ("m", "M"),
];

static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = UNITS
        .iter()
        .map(|(token, _)| *token)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*({alternation})"))
        .expect("unit pattern is a valid regex")
});

fn canonical_unit(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    UNITS
        .iter()
        .find(|(known, _)| *known == lower)
        .map_or_else(|| token.to_ascii_uppercase(), |(_, canon)| (*canon).to_string())
}

/// Parse a raw title into name, quantity and unit.
///
/// Only the first quantity token counts; anything after it is discarded and
/// numbers before it stay in the name. `None` input yields an empty parse.
/// A title that starts with its quantity yields an empty name, and its row
/// is still exported.
pub fn parse_title(raw: Option<&str>) -> ParsedTitle {
    let Some(raw) = raw else {
        return ParsedTitle::default();
    };

    let Some(caps) = QUANTITY_PATTERN.captures(raw) else {
        return ParsedTitle {
            product_name: Some(raw.trim().to_string()),
            quantity: None,
            unit: None,
        };
    };

    // Group 0 always exists for a successful match
    let span = caps.get(0).map_or(0..0, |m| m.range());
    let quantity = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
    let unit = caps.get(2).map(|m| canonical_unit(m.as_str()));

    ParsedTitle {
        product_name: Some(raw[..span.start].trim().to_string()),
        quantity,
        unit,
    }
}
