//! Page extraction module
//!
//! This module turns raw page bodies into canonical records:
//! - Area index parsing (county and metro listings on the state page)
//! - Area resolution (display name and kind from the page heading)
//! - Wage table extraction (living, poverty and minimum wage grids)
//! - Expense table extraction (required annual income grid)
//!
//! All functions here are pure: they take an HTML string and never fetch.
//! Every table shape they rely on is declared in `schema` and checked before
//! any value is sliced out, so a layout change fails with
//! `ExtractError::StructuralMismatch` instead of misaligning data.

mod area;
mod expenses;
mod index;
pub mod schema;
mod wages;

pub use area::{classify_heading, resolve_area};
pub use expenses::extract_expenses;
pub use index::{parse_area_index, AreaIndex, IndexCategory, IndexEntry};
pub use wages::extract_wages;

use crate::model::CurrencyError;
use scraper::{ElementRef, Selector};
use thiserror::Error;

/// Errors raised while extracting data from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unexpected {table} layout: {detail}")]
    StructuralMismatch { table: &'static str, detail: String },

    #[error("Cannot parse {table} cell '{raw}' as currency: {source}")]
    ParseFailure {
        table: &'static str,
        raw: String,
        source: CurrencyError,
    },

    #[error("Invalid selector '{css}': {message}")]
    Selector { css: &'static str, message: String },
}

impl ExtractError {
    pub(crate) fn mismatch(table: &'static str, detail: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            table,
            detail: detail.into(),
        }
    }
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Compiles one of the fixed selectors from `schema`
pub(crate) fn selector(css: &'static str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        css,
        message: format!("{:?}", e),
    })
}

/// Returns the element's text with surrounding whitespace removed
pub(crate) fn cell_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the direct child elements with the given tag name
pub(crate) fn child_elements<'a>(element: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == tag)
        .collect()
}

/// Returns true if the element carries every listed class
pub(crate) fn has_classes(element: &ElementRef<'_>, classes: &[&str]) -> bool {
    classes
        .iter()
        .all(|wanted| element.value().classes().any(|c| c == *wanted))
}
