//! Expense table extraction
//!
//! The expense table repeats no parseable header, so the composition and
//! child-count order is the fixed table order. The required annual income
//! grid is the trailing 12 cells of the odd rows that follow the first odd
//! row; every earlier cell (row labels, itemized costs) is discarded.

use crate::extract::schema::{
    EXPENSE_ROW_CLASSES, EXPENSE_TABLE, EXPENSE_TABLE_SELECTOR, EXPENSE_VALUE_CELLS,
};
use crate::extract::{cell_text, child_elements, has_classes, selector, ExtractError, ExtractResult};
use crate::model::{grid_index, AreaExpenseProfile, Currency, ExpenseRecord};
use scraper::{ElementRef, Html};

/// Extracts the complete expense profile from an area detail page
///
/// # Returns
///
/// * `Ok(AreaExpenseProfile)` - All 12 (composition, child count) records
/// * `Err(ExtractError)` - The table is missing, fewer than 12 cells were
///   collected, or one of the trailing 12 cells is not a currency amount
pub fn extract_expenses(html: &str) -> ExtractResult<AreaExpenseProfile> {
    let document = Html::parse_document(html);

    let table_selector = selector(EXPENSE_TABLE_SELECTOR)?;
    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ExtractError::mismatch(EXPENSE_TABLE, "no expense table"))?;

    let cells = collect_row_group_cells(table)?;
    if cells.len() < EXPENSE_VALUE_CELLS {
        return Err(ExtractError::mismatch(
            EXPENSE_TABLE,
            format!(
                "collected {} cells, expected at least {}",
                cells.len(),
                EXPENSE_VALUE_CELLS
            ),
        ));
    }

    let values = cells[cells.len() - EXPENSE_VALUE_CELLS..]
        .iter()
        .map(|raw| {
            Currency::parse(raw).map_err(|source| ExtractError::ParseFailure {
                table: EXPENSE_TABLE,
                raw: raw.clone(),
                source,
            })
        })
        .collect::<ExtractResult<Vec<_>>>()?;

    AreaExpenseProfile::try_from_fn(|composition, children| {
        Ok(ExpenseRecord {
            composition,
            children,
            required_annual_income: values[grid_index(composition, children)],
        })
    })
}

/// Collects the text of every data cell in the odd rows after the first one
fn collect_row_group_cells(table: ElementRef<'_>) -> ExtractResult<Vec<String>> {
    let row_selector = selector("tr")?;
    let first_odd = table
        .select(&row_selector)
        .find(|row| has_classes(row, EXPENSE_ROW_CLASSES))
        .ok_or_else(|| ExtractError::mismatch(EXPENSE_TABLE, "no odd rows"))?;

    let cells = first_odd
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|row| row.value().name() == "tr" && has_classes(row, EXPENSE_ROW_CLASSES))
        .flat_map(|row| child_elements(row, "td"))
        .map(|cell| cell_text(&cell))
        .collect();

    Ok(cells)
}
