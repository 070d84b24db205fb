//! Run coordinator - main scrape orchestration logic
//!
//! This module drives one full scrape run:
//! - Opening a run record and building the area index from the state page
//! - Clearing previously stored areas once the index is known
//! - Resolving, extracting and storing every area in turn
//! - Isolating per-area failures so one bad page cannot abort the run
//! - Flushing the fetch cache and closing the run record

use crate::cache::FetchCache;
use crate::config::Config;
use crate::crawler::{pipeline, PoliteFetcher};
use crate::extract::IndexEntry;
use crate::model::ResolvedArea;
use crate::storage::{RunStatus, SqliteStorage, Storage};
use crate::Result;
use std::path::Path;

/// An area that could not be scraped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaFailure {
    /// Key the area was listed under on the index page
    pub index_key: String,
    pub url: String,
    pub error: String,
}

/// Outcome of one scrape run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub run_id: i64,
    pub areas_ok: u64,
    pub failures: Vec<AreaFailure>,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl RunReport {
    pub fn areas_failed(&self) -> u64 {
        self.failures.len() as u64
    }

    pub fn areas_total(&self) -> u64 {
        self.areas_ok + self.areas_failed()
    }
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    storage: SqliteStorage,
    fetcher: PoliteFetcher,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    /// * `config_hash` - Hash of the configuration file, recorded on the run
    /// * `fresh` - Whether to discard every cached page before starting
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(LivingWageError)` - Failed to open the database or clear the cache
    pub fn new(config: Config, config_hash: &str, fresh: bool) -> Result<Self> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

        let mut cache = FetchCache::open(&config.fetch.cache_path());
        if fresh {
            tracing::info!("Discarding {} cached pages", cache.len());
            cache.clear()?;
        }

        let fetcher = PoliteFetcher::new(&config.fetch, &config.user_agent, cache)?;

        Ok(Self::with_parts(config, config_hash, storage, fetcher))
    }

    /// Creates a coordinator from prebuilt parts
    pub fn with_parts(
        config: Config,
        config_hash: &str,
        storage: SqliteStorage,
        fetcher: PoliteFetcher,
    ) -> Self {
        Self {
            config,
            config_hash: config_hash.to_string(),
            storage,
            fetcher,
        }
    }

    /// Runs one full scrape
    ///
    /// Once the index is built, stored areas are replaced by the areas of
    /// this run. A failing area is logged and listed in the report; only a
    /// failure to build the index or to use the database aborts the run, and
    /// an index failure leaves the stored areas untouched.
    pub async fn run(&mut self) -> Result<RunReport> {
        let run_id = self.storage.create_run(&self.config_hash)?;
        tracing::info!("Starting scrape run {}", run_id);

        let start_time = std::time::Instant::now();

        let index = match pipeline::build_index(&mut self.fetcher, &self.config.source).await {
            Ok(index) => index,
            Err(e) => {
                tracing::error!("Failed to build area index: {}", e);
                self.storage.finish_run(run_id, RunStatus::Failed, 0, 0)?;
                self.fetcher.flush()?;
                return Err(e);
            }
        };

        // Stored areas survive a run that cannot read its index
        self.storage.reset()?;

        let mut report = RunReport {
            run_id,
            ..RunReport::default()
        };

        let total = index.len();
        for (position, entry) in index.iter().enumerate() {
            tracing::debug!("Processing area {}/{}: {}", position + 1, total, entry.key);

            match self.process_area(entry).await {
                Ok(area) => {
                    report.areas_ok += 1;
                    tracing::info!("Stored {}", area.info());
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}' ({}): {}", entry.key, entry.url, e);
                    report.failures.push(AreaFailure {
                        index_key: entry.key.clone(),
                        url: entry.url.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        self.fetcher.flush()?;
        report.cache_hits = self.fetcher.hits();
        report.cache_misses = self.fetcher.misses();

        self.storage.finish_run(
            run_id,
            RunStatus::Completed,
            report.areas_ok,
            report.areas_failed(),
        )?;

        tracing::info!(
            "Scrape completed: {} areas stored, {} skipped in {:?} ({} cache hits, {} requests)",
            report.areas_ok,
            report.areas_failed(),
            start_time.elapsed(),
            report.cache_hits,
            report.cache_misses
        );

        Ok(report)
    }

    /// Resolves, extracts and stores one area
    async fn process_area(&mut self, entry: &IndexEntry) -> Result<ResolvedArea> {
        let url = entry.url.as_str();

        let area =
            pipeline::resolve_area(&mut self.fetcher, entry, &self.config.source.state_suffixes)
                .await?;
        let wages = pipeline::extract_wages(&mut self.fetcher, url).await?;
        let expenses = pipeline::extract_expenses(&mut self.fetcher, url).await?;

        self.storage
            .save_area_bundle(&self.config.source.state_code, &area, &wages, &expenses)?;

        Ok(area)
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn fetcher(&self) -> &PoliteFetcher {
        &self.fetcher
    }
}
