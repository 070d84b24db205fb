//! Output module for reports on stored areas
//!
//! This module handles:
//! - Fixed-width wage and expense tables for a single area
//! - The living-wage gap (average living wage vs minimum wage)
//! - Markdown summaries of every stored area
//! - Scrape statistics

mod markdown;
mod report;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{format_dollars, format_expense_table, format_gap, format_wage_table, LivingWageGap};
pub use stats::{load_statistics, print_statistics, ScrapeStatistics};
pub use summary::{build_summary, AreaSummary, OutputError, OutputResult, ScrapeSummary};

use crate::storage::{Storage, StorageError};

/// Formats the complete report for one stored area
///
/// # Arguments
///
/// * `storage` - The storage backend containing scraped areas
/// * `name` - Area name, matched case-insensitively
///
/// # Returns
///
/// * `Ok(String)` - Area heading, wage table, expense table and gap
/// * `Err(OutputError)` - The area is unknown or its rows are incomplete
pub fn format_area_report(storage: &dyn Storage, name: &str) -> OutputResult<String> {
    let area = storage
        .get_area(name)?
        .ok_or_else(|| StorageError::AreaNotFound(name.to_string()))?;

    let wages = storage.load_wages(&area.name)?;
    let expenses = storage.load_expenses(&area.name)?;
    let gap = LivingWageGap::from_profile(&wages);

    let mut out = format!("{} (Type: {})\n{}\n\n", area.display_name, area.kind, area.url);
    out.push_str(&format_wage_table(&area.display_name, &wages));
    out.push('\n');
    out.push_str(&format_expense_table(&area.display_name, &expenses));
    out.push('\n');
    out.push_str(&format_gap(&area.display_name, &gap));
    out.push('\n');

    Ok(out)
}
