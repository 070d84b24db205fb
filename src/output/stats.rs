//! Statistics generation from the scrape database
//!
//! This module provides functionality for extracting and displaying
//! scrape statistics from the storage layer.

use crate::model::AreaKind;
use crate::output::summary::OutputResult;
use crate::storage::{RunRecord, Storage};

/// Scrape statistics summary
#[derive(Debug, Clone)]
pub struct ScrapeStatistics {
    /// The most recent run, if any
    pub latest_run: Option<RunRecord>,

    /// Total number of stored areas
    pub total_areas: u64,

    pub counties: u64,
    pub metro_areas: u64,
}

impl ScrapeStatistics {
    /// Share of the last run's areas that were stored, in percent
    pub fn success_rate(&self) -> Option<f64> {
        let run = self.latest_run.as_ref()?;
        let attempted = run.areas_ok + run.areas_failed;
        (attempted > 0).then(|| run.areas_ok as f64 / attempted as f64 * 100.0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ScrapeStatistics)` - Successfully loaded statistics
/// * `Err(OutputError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> OutputResult<ScrapeStatistics> {
    Ok(ScrapeStatistics {
        latest_run: storage.get_latest_run()?,
        total_areas: storage.count_areas()?,
        counties: storage.count_areas_by_kind(AreaKind::County)?,
        metro_areas: storage.count_areas_by_kind(AreaKind::MetroArea)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScrapeStatistics) {
    println!("=== Scrape Statistics ===\n");

    match &stats.latest_run {
        Some(run) => {
            println!("Latest run:");
            println!("  Run ID: {}", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Areas stored: {}", run.areas_ok);
            println!("  Areas skipped: {}", run.areas_failed);
        }
        None => println!("No scrape runs recorded."),
    }
    println!();

    println!("Stored areas:");
    println!("  Total: {}", stats.total_areas);
    println!("  Counties: {}", stats.counties);
    println!("  Metro areas: {}", stats.metro_areas);
    println!();

    if let Some(rate) = stats.success_rate() {
        println!("Success Rate: {:.1}%", rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{RunStatus, SqliteStorage};

    #[test]
    fn test_statistics_of_empty_database() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert!(stats.latest_run.is_none());
        assert_eq!(stats.total_areas, 0);
        assert_eq!(stats.success_rate(), None);
    }

    #[test]
    fn test_success_rate_from_latest_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_run("a").unwrap();
        storage
            .finish_run(first, RunStatus::Completed, 1, 1)
            .unwrap();
        let second = storage.create_run("a").unwrap();
        storage
            .finish_run(second, RunStatus::Completed, 3, 1)
            .unwrap();

        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.latest_run.as_ref().unwrap().id, second);
        assert_eq!(stats.success_rate(), Some(75.0));
    }
}
