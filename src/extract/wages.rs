//! Wage table extraction
//!
//! # Table Layout
//!
//! | Row | Marker | Cells |
//! |-----|--------|-------|
//! | Header | first `thead tr` | blank label + 3 composition labels |
//! | Living wage | `tr.odd.results` | label + 12 values |
//! | Poverty wage | first `tr.even` | label + 12 values |
//! | Minimum wage | `tr.odd` siblings after the living wage row | 12 `td.red` cells in total |
//!
//! Each 12-value run is three blocks of four (one block per composition, in
//! header order), and within a block the values are for 0, 1, 2 and 3
//! children.

use crate::extract::schema::{
    expect_cells, LIVING_WAGE_ROW_CLASSES, MINIMUM_WAGE_CELLS, MINIMUM_WAGE_CELL_CLASSES,
    MINIMUM_WAGE_ROW_CLASSES, POVERTY_WAGE_ROW_CLASSES, WAGE_HEADER_CELLS, WAGE_ROW_CELLS,
    WAGE_TABLE,
};
use crate::extract::{
    cell_text, child_elements, has_classes, selector, ExtractError, ExtractResult,
};
use crate::model::{
    normalize_header_label, AreaWageProfile, ChildCount, Currency, HouseholdComposition,
    WageRecord,
};
use scraper::{ElementRef, Html};

/// Extracts the complete wage profile from an area detail page
///
/// # Returns
///
/// * `Ok(AreaWageProfile)` - All 12 (composition, child count) records
/// * `Err(ExtractError)` - A row is missing, a row has the wrong number of
///   cells, or a value cell is not a currency amount
///
/// # Example
///
/// ```no_run
/// use living_wage::extract::extract_wages;
///
/// let html = std::fs::read_to_string("county.html").unwrap();
/// let profile = extract_wages(&html).unwrap();
/// assert_eq!(profile.len(), 12);
/// ```
pub fn extract_wages(html: &str) -> ExtractResult<AreaWageProfile> {
    let document = Html::parse_document(html);
    let table = find_wage_table(&document)?;

    let block_positions = header_block_positions(table)?;

    let tbody_selector = selector("tbody")?;
    let body = table
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| ExtractError::mismatch(WAGE_TABLE, "no tbody"))?;
    let rows = child_elements(body, "tr");

    let living_row = rows
        .iter()
        .find(|row| has_classes(row, LIVING_WAGE_ROW_CLASSES))
        .ok_or_else(|| ExtractError::mismatch(WAGE_TABLE, "no living wage row"))?;
    let poverty_row = rows
        .iter()
        .find(|row| has_classes(row, POVERTY_WAGE_ROW_CLASSES))
        .ok_or_else(|| ExtractError::mismatch(WAGE_TABLE, "no poverty wage row"))?;

    let living = parse_value_row(living_row, "living wage row")?;
    let poverty = parse_value_row(poverty_row, "poverty wage row")?;
    let minimum = collect_minimum_wages(&rows)?;

    warn_on_divergent_minimum(&minimum, &block_positions);

    AreaWageProfile::try_from_fn(|composition, children| {
        let index = block_positions[composition.index()] * ChildCount::ALL.len() + children.index();
        Ok(WageRecord {
            composition,
            children,
            living_wage: living[index],
            poverty_wage: poverty[index],
            minimum_wage: minimum[children.index()],
        })
    })
}

/// Finds the first table with a header that is not the expense table
fn find_wage_table(document: &Html) -> ExtractResult<ElementRef<'_>> {
    let table_selector = selector("table")?;
    let thead_selector = selector("thead")?;

    document
        .select(&table_selector)
        .filter(|table| !has_classes(table, &["expense_table"]))
        .find(|table| table.select(&thead_selector).next().is_some())
        .ok_or_else(|| ExtractError::mismatch(WAGE_TABLE, "no table with a header row"))
}

/// Maps each composition to the position of its block in the value rows
///
/// The returned array is indexed by `HouseholdComposition::index()`.
fn header_block_positions(table: ElementRef<'_>) -> ExtractResult<[usize; 3]> {
    let header_selector = selector("thead tr")?;
    let header = table
        .select(&header_selector)
        .next()
        .ok_or_else(|| ExtractError::mismatch(WAGE_TABLE, "no header row"))?;

    let labels: Vec<String> = child_elements(header, "th")
        .iter()
        .map(|cell| normalize_header_label(&cell_text(cell)))
        .collect();
    expect_cells(WAGE_TABLE, "header row", WAGE_HEADER_CELLS, labels.len())?;

    let mut positions: [Option<usize>; 3] = [None; 3];
    for (position, label) in labels.iter().skip(1).enumerate() {
        let composition = HouseholdComposition::from_header_label(label).ok_or_else(|| {
            ExtractError::mismatch(WAGE_TABLE, format!("unknown composition label '{}'", label))
        })?;
        let slot = &mut positions[composition.index()];
        if slot.is_some() {
            return Err(ExtractError::mismatch(
                WAGE_TABLE,
                format!("composition label '{}' appears twice", label),
            ));
        }
        *slot = Some(position);
    }

    // Three labels, all distinct, cover all three compositions
    let mut resolved = [0; 3];
    for (composition, position) in HouseholdComposition::ALL.iter().zip(positions) {
        resolved[composition.index()] = position.ok_or_else(|| {
            ExtractError::mismatch(
                WAGE_TABLE,
                format!("missing composition '{}'", composition.header_label()),
            )
        })?;
    }
    Ok(resolved)
}

/// Parses a label + 12 value row, dropping the label cell
fn parse_value_row(row: &ElementRef<'_>, what: &str) -> ExtractResult<Vec<Currency>> {
    let cells = child_elements(*row, "td");
    expect_cells(WAGE_TABLE, what, WAGE_ROW_CELLS, cells.len())?;

    cells.iter().skip(1).map(parse_cell).collect()
}

/// Gathers the highlighted minimum wage cells from the odd rows that follow
/// the first odd row
fn collect_minimum_wages(rows: &[ElementRef<'_>]) -> ExtractResult<Vec<Currency>> {
    let first_odd = rows
        .iter()
        .position(|row| has_classes(row, MINIMUM_WAGE_ROW_CLASSES))
        .ok_or_else(|| ExtractError::mismatch(WAGE_TABLE, "no odd rows"))?;

    let cells: Vec<ElementRef<'_>> = rows[first_odd + 1..]
        .iter()
        .filter(|row| has_classes(row, MINIMUM_WAGE_ROW_CLASSES))
        .flat_map(|row| child_elements(*row, "td"))
        .filter(|cell| has_classes(cell, MINIMUM_WAGE_CELL_CLASSES))
        .collect();
    expect_cells(
        WAGE_TABLE,
        "minimum wage group",
        MINIMUM_WAGE_CELLS,
        cells.len(),
    )?;

    cells.iter().map(parse_cell).collect()
}

/// Logs when a composition block's minimum wages differ from the first block
///
/// The first block's values are used for every composition.
fn warn_on_divergent_minimum(minimum: &[Currency], block_positions: &[usize; 3]) {
    let per_block = ChildCount::ALL.len();
    for composition in HouseholdComposition::ALL {
        let start = block_positions[composition.index()] * per_block;
        let block = &minimum[start..start + per_block];
        if block != &minimum[..per_block] {
            tracing::warn!(
                "Minimum wage for {} differs from the first block ({:?} vs {:?}); using the first block",
                composition,
                block.iter().map(Currency::value).collect::<Vec<_>>(),
                minimum[..per_block]
                    .iter()
                    .map(Currency::value)
                    .collect::<Vec<_>>()
            );
        }
    }
}

fn parse_cell(cell: &ElementRef<'_>) -> ExtractResult<Currency> {
    let raw = cell_text(cell);
    Currency::parse(&raw).map_err(|source| ExtractError::ParseFailure {
        table: WAGE_TABLE,
        raw,
        source,
    })
}
