//! Aggregation of crawled records into the export table and xlsx output

use std::num::ParseFloatError;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::ExportError;
use crate::models::{ParsedTitle, ProductRecord, ProductRow};
use crate::normalizer::parse_title;
use crate::scraper::CategoryCrawl;

/// Spreadsheet applications reject longer sheet names
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FALLBACK_SHEET_NAME: &str = "Products";

/// Characters not allowed in a worksheet name
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// A single output cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

impl ProductRow {
    /// Cells in [`ProductRow::HEADERS`] order
    pub fn cells(&self) -> [Cell<'_>; 8] {
        let number = |value: Option<f64>| value.map_or(Cell::Blank, Cell::Number);
        [
            Cell::Text(&self.category),
            Cell::Text(&self.description),
            Cell::Text(&self.product_name),
            number(self.quantity),
            self.unit.as_deref().map_or(Cell::Blank, Cell::Text),
            number(self.price),
            Cell::Text(&self.link),
            Cell::Text(&self.image),
        ]
    }
}

/// Keep digits and decimal points, then parse.
///
/// Nothing left means no value. Leftovers that still do not parse, such as
/// `1.2.3`, are an error.
///
/// # Errors
/// Returns the parse error when the cleaned text is not a number
pub fn coerce_number(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    cleaned.parse::<f64>().map(Some)
}

/// Flatten all categories into export rows, in crawl order.
///
/// # Errors
/// * `ExportError::Coercion` - a price does not reduce to a number
pub fn aggregate(crawls: &[CategoryCrawl]) -> Result<Vec<ProductRow>, ExportError> {
    let parsed = crawls
        .iter()
        .flat_map(|crawl| &crawl.records)
        .map(|record| (record, parse_title(Some(record.raw_name.as_str()))));

    build_rows(parsed)
}

/// Drop records without a product name and coerce the rest
fn build_rows<'a, I>(parsed: I) -> Result<Vec<ProductRow>, ExportError>
where
    I: IntoIterator<Item = (&'a ProductRecord, ParsedTitle)>,
{
    let mut rows = Vec::new();
    for (record, title) in parsed {
        let Some(product_name) = title.product_name else {
            continue;
        };

        rows.push(ProductRow {
            category: record.category.clone(),
            description: record.description.clone(),
            product_name,
            quantity: title.quantity,
            unit: title.unit,
            price: coerce_number(&record.price).map_err(|_| ExportError::Coercion {
                field: "price",
                value: record.price.clone(),
                source_url: record.source_url.clone(),
            })?,
            link: record.link.clone(),
            image: record.image.clone(),
        });
    }
    Ok(rows)
}

/// Sheet name derived from the output file stem
pub fn sheet_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name: String = stem
        .chars()
        .filter(|c| !INVALID_SHEET_CHARS.contains(c))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let name = name.trim_matches('\'').to_string();

    if name.trim().is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        name
    }
}

/// Write `rows` to a single-sheet workbook at `path`, with a header row.
///
/// # Errors
/// * `ExportError::Io` - the output directory cannot be created
/// * `ExportError::Xlsx` - the workbook cannot be written
pub fn write_workbook(path: &Path, rows: &[ProductRow]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        let name = sheet_name(path);
        worksheet.set_name(name.as_str())?;

        for (col, header) in (0u16..).zip(ProductRow::HEADERS) {
            worksheet.write_string(0, col, header)?;
        }

        for (row_idx, row) in (1u32..).zip(rows) {
            for (col, cell) in (0u16..).zip(row.cells()) {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_idx, col, text)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row_idx, col, value)?;
                    }
                    Cell::Blank => {}
                }
            }
        }
    }

    workbook.save(path)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
