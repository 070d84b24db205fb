//! Fixed layout of the source pages
//!
//! The area pages carry no semantic markup for their values: a value's
//! meaning comes only from its row and its position within the row. These
//! constants are the single description of that layout.

use crate::extract::{ExtractError, ExtractResult};
use crate::model::GRID_SIZE;

/// Table names used in error messages
pub const WAGE_TABLE: &str = "wage table";
pub const EXPENSE_TABLE: &str = "expense table";
pub const AREA_HEADING: &str = "area heading";
pub const AREA_INDEX: &str = "area index";

// ===== Wage table =====

/// Header row: a blank label cell followed by one cell per composition
pub const WAGE_HEADER_CELLS: usize = 4;

/// Living and poverty rows: a label cell followed by the full grid
pub const WAGE_ROW_CELLS: usize = 1 + GRID_SIZE;

/// Highlighted minimum wage cells gathered across the sibling odd rows
pub const MINIMUM_WAGE_CELLS: usize = GRID_SIZE;

pub const LIVING_WAGE_ROW_CLASSES: &[&str] = &["odd", "results"];
pub const POVERTY_WAGE_ROW_CLASSES: &[&str] = &["even"];
pub const MINIMUM_WAGE_ROW_CLASSES: &[&str] = &["odd"];
pub const MINIMUM_WAGE_CELL_CLASSES: &[&str] = &["red"];

// ===== Expense table =====

pub const EXPENSE_TABLE_SELECTOR: &str = "table.expense_table";
pub const EXPENSE_ROW_CLASSES: &[&str] = &["odd"];

/// Trailing cells of the collected rows that hold the income grid
pub const EXPENSE_VALUE_CELLS: usize = GRID_SIZE;

// ===== Area heading =====

pub const HEADING_SELECTOR: &str = "div.container h1";
pub const HEADING_PREFIX: &str = "Living Wage Calculation for ";

// ===== Area index =====

pub const INDEX_CONTAINER_SELECTOR: &str = "div.container";
pub const COUNTY_LISTING_SELECTOR: &str = "div.counties.list-unstyled";
pub const METRO_LISTING_SELECTOR: &str = "div.metros.list-unstyled";

/// Fails with a structural mismatch unless `actual` equals `expected`
pub fn expect_cells(
    table: &'static str,
    what: &str,
    expected: usize,
    actual: usize,
) -> ExtractResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ExtractError::mismatch(
            table,
            format!("{} has {} cells, expected {}", what, actual, expected),
        ))
    }
}
