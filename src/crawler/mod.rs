//! Crawler module for polite page fetching and run orchestration
//!
//! This module contains the network side of a scrape, including:
//! - Cache-backed HTTP fetching with a randomized politeness delay
//! - Fetch-then-extract steps for the index and area pages
//! - Overall run coordination with per-area failure isolation
//!
//! Requests are awaited one at a time; nothing here spawns tasks.

mod coordinator;
mod fetcher;
mod pipeline;
mod throttle;

pub use coordinator::{AreaFailure, Coordinator, RunReport};
pub use fetcher::{build_http_client, PoliteFetcher};
pub use pipeline::{build_index, extract_expenses, extract_wages, resolve_area};
pub use throttle::Throttle;

pub use crate::extract::{AreaIndex, IndexEntry};

use crate::config::Config;
use crate::Result;

/// Runs a complete scrape
///
/// This is the main entry point for a scrape. It will:
/// 1. Open the database and the fetch cache
/// 2. Build the area index
/// 3. Fetch, extract and store every area
/// 4. Flush the cache and record the run outcome
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `config_hash` - Hash of the configuration file
/// * `fresh` - Whether to discard the fetch cache first
pub async fn scrape(config: Config, config_hash: &str, fresh: bool) -> Result<RunReport> {
    let mut coordinator = Coordinator::new(config, config_hash, fresh)?;
    coordinator.run().await
}
