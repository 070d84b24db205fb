//! Living-Wage main entry point
//!
//! This is the command-line interface for the Living-Wage scraper.

use anyhow::{Context, Result};
use clap::Parser;
use living_wage::cache::FetchCache;
use living_wage::config::{load_config_with_hash, Config};
use living_wage::crawler::{build_index, scrape, PoliteFetcher, RunReport};
use living_wage::extract::IndexCategory;
use living_wage::storage::{self, SqliteStorage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Living-Wage: a polite scraper for per-area cost-of-living tables
///
/// Living-Wage discovers every county and metro area of a state, extracts
/// their wage and expense tables through a persistent fetch cache, and stores
/// complete household grids in SQLite.
#[derive(Parser, Debug)]
#[command(name = "living-wage")]
#[command(version = "1.0.0")]
#[command(about = "A polite scraper for living wage tables", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discard the fetch cache before scraping
    #[arg(long)]
    fresh: bool,

    /// Fetch the area index and list discovered areas without scraping them
    #[arg(long, conflicts_with_all = ["stats", "area", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "area", "export_summary"])]
    stats: bool,

    /// Show the stored wage and expense tables of one area and exit
    #[arg(long, value_name = "NAME", conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    area: Option<String>,

    /// Generate markdown summary from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "area"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.fresh).await?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(name) = &cli.area {
        handle_area(&config, name)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_scrape(config, &config_hash, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("living_wage=info,warn"),
            1 => EnvFilter::new("living_wage=debug,info"),
            2 => EnvFilter::new("living_wage=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_storage(config: &Config) -> Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    storage::open_storage(path)
        .with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles the --dry-run mode: fetches the index and lists discovered areas
async fn handle_dry_run(config: &Config, fresh: bool) -> Result<()> {
    println!("=== Living-Wage Dry Run ===\n");

    println!("Source:");
    println!("  Index page: {}", config.source.index_url());
    println!("  State: {}", config.source.state_code);
    println!(
        "  Delay between requests: {}-{}s",
        config.fetch.min_delay_secs, config.fetch.max_delay_secs
    );
    println!("  Cache: {}", config.fetch.cache_path);
    println!("  User agent: {}", config.user_agent.header_value());

    let cache = if fresh {
        FetchCache::in_memory()
    } else {
        FetchCache::open(&config.fetch.cache_path())
    };
    let mut fetcher = PoliteFetcher::new(&config.fetch, &config.user_agent, cache)?;
    let index = build_index(&mut fetcher, &config.source)
        .await
        .context("Failed to build the area index")?;
    fetcher.flush()?;

    for (category, title) in [
        (IndexCategory::Counties, "Counties"),
        (IndexCategory::Metros, "Metro Areas"),
    ] {
        println!("\n{} ({}):", title, index.count_in(category));
        for entry in index.iter().filter(|e| e.category == category) {
            println!("  - {} -> {}", entry.key, entry.url);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} areas", index.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    use living_wage::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(config)?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --area mode: prints the stored tables of one area
fn handle_area(config: &Config, name: &str) -> Result<()> {
    use living_wage::output::format_area_report;

    let storage = open_storage(config)?;
    let report = format_area_report(&storage, name)
        .with_context(|| format!("Cannot show area '{}'", name))?;
    print!("{}", report);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> Result<()> {
    use living_wage::output::generate_markdown_summary;

    println!("=== Exporting Living Wage Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = open_storage(config)?;
    generate_markdown_summary(&storage, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, config_hash: &str, fresh: bool) -> Result<()> {
    if fresh {
        tracing::info!("Starting fresh scrape (fetch cache discarded)");
    } else {
        tracing::info!("Starting scrape (cached pages are reused)");
    }

    match scrape(config, config_hash, fresh).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_report(report: &RunReport) {
    println!("=== Scrape Run {} ===\n", report.run_id);
    println!("  Areas stored: {}", report.areas_ok);
    println!("  Areas skipped: {}", report.areas_failed());
    println!("  Cache hits: {}", report.cache_hits);
    println!("  Network requests: {}", report.cache_misses);

    if !report.failures.is_empty() {
        println!("\nSkipped areas:");
        for failure in &report.failures {
            println!("  - {} ({}): {}", failure.index_key, failure.url, failure.error);
        }
    }
}
