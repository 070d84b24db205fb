//! Summary types and error handling for reports
//!
//! This module gathers stored areas into the data structures that the
//! markdown export and the statistics printer render.

use crate::model::{AreaExpenseProfile, AreaKind};
use crate::output::report::LivingWageGap;
use crate::storage::{RunRecord, Storage, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything the summary shows about one stored area
#[derive(Debug, Clone)]
pub struct AreaSummary {
    pub display_name: String,
    pub kind: AreaKind,
    pub url: String,
    pub gap: LivingWageGap,
    pub expenses: AreaExpenseProfile,
}

/// All stored areas plus the run that produced them
#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    pub run: Option<RunRecord>,
    pub areas: Vec<AreaSummary>,
}

impl ScrapeSummary {
    /// Number of areas of one kind
    pub fn count(&self, kind: AreaKind) -> usize {
        self.areas.iter().filter(|a| a.kind == kind).count()
    }

    /// Area with the largest living-wage gap
    pub fn widest_gap(&self) -> Option<&AreaSummary> {
        self.areas
            .iter()
            .max_by(|a, b| a.gap.gap().total_cmp(&b.gap.gap()))
    }
}

/// Loads every stored area with its gap and expense grid
///
/// # Arguments
///
/// * `storage` - The storage backend containing scraped areas
///
/// # Returns
///
/// * `Ok(ScrapeSummary)` - Areas ordered by name
/// * `Err(OutputError)` - A query failed or an area's rows are incomplete
pub fn build_summary(storage: &dyn Storage) -> OutputResult<ScrapeSummary> {
    let run = storage.get_latest_run()?;

    let mut areas = Vec::new();
    for area in storage.list_areas()? {
        let wages = storage.load_wages(&area.name)?;
        let expenses = storage.load_expenses(&area.name)?;

        let average = storage
            .average_living_wage(&area.name)?
            .unwrap_or_else(|| wages.average_living_wage());

        areas.push(AreaSummary {
            display_name: area.display_name,
            kind: area.kind,
            url: area.url,
            gap: LivingWageGap::new(average, wages.minimum_wage().value()),
            expenses,
        });
    }

    Ok(ScrapeSummary { run, areas })
}
