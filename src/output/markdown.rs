//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of the stored
//! areas: run metadata, the living-wage gap of every area, and each area's
//! required annual income grid.

use crate::model::{AreaKind, ChildCount, HouseholdComposition};
use crate::output::report::format_dollars;
use crate::output::summary::{build_summary, OutputResult, ScrapeSummary};
use crate::storage::Storage;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of every stored area
///
/// # Arguments
///
/// * `storage` - The storage backend containing scraped areas
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to load areas or write the file
pub fn generate_markdown_summary(storage: &dyn Storage, output_path: &Path) -> OutputResult<()> {
    let summary = build_summary(storage)?;
    let markdown = format_markdown_summary(&summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!(
        "Wrote summary of {} areas to {}",
        summary.areas.len(),
        output_path.display()
    );
    Ok(())
}

/// Formats a scrape summary as markdown
pub fn format_markdown_summary(summary: &ScrapeSummary) -> String {
    let mut md = String::new();

    md.push_str("# Living Wage Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    match &summary.run {
        Some(run) => {
            md.push_str(&format!("- **Run ID**: {}\n", run.id));
            md.push_str(&format!("- **Started**: {}\n", run.started_at));
            if let Some(finished) = &run.finished_at {
                md.push_str(&format!("- **Finished**: {}\n", finished));
            }
            md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
            md.push_str(&format!("- **Areas Stored**: {}\n", run.areas_ok));
            md.push_str(&format!("- **Areas Skipped**: {}\n", run.areas_failed));
            md.push_str(&format!("- **Config Hash**: {}\n\n", run.config_hash));
        }
        None => md.push_str("No scrape runs recorded.\n\n"),
    }

    md.push_str("## Areas\n\n");
    md.push_str(&format!(
        "- **Counties**: {}\n- **Metro Areas**: {}\n\n",
        summary.count(AreaKind::County),
        summary.count(AreaKind::MetroArea)
    ));

    if summary.areas.is_empty() {
        md.push_str("No areas stored.\n");
        return md;
    }

    // Living wage gap
    md.push_str("## Living Wage Gap\n\n");
    md.push_str("| Area | Type | Avg Living Wage | Minimum Wage | Gap |\n");
    md.push_str("|------|------|-----------------|--------------|-----|\n");
    for area in &summary.areas {
        md.push_str(&format!(
            "| {} | {} | ${:.2} | ${:.2} | ${:.2} |\n",
            area.display_name,
            area.kind,
            area.gap.average_living_wage,
            area.gap.minimum_wage,
            area.gap.gap()
        ));
    }
    md.push('\n');

    if let Some(widest) = summary.widest_gap() {
        md.push_str(&format!(
            "Widest gap: **{}** (${:.2}/h)\n\n",
            widest.display_name,
            widest.gap.gap()
        ));
    }

    // Expense grids
    md.push_str("## Required Annual Income Before Taxes\n\n");
    for area in &summary.areas {
        md.push_str(&format!("### {} ({})\n\n", area.display_name, area.kind));

        md.push_str("| Household |");
        for children in ChildCount::ALL {
            md.push_str(&format!(" {} |", children));
        }
        md.push_str("\n|-----------|");
        for _ in ChildCount::ALL {
            md.push_str("------|");
        }
        md.push('\n');

        for composition in HouseholdComposition::ALL {
            md.push_str(&format!("| {} |", composition));
            for record in area.expenses.block(composition) {
                md.push_str(&format!(
                    " {} |",
                    format_dollars(record.required_annual_income.value())
                ));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    md
}
