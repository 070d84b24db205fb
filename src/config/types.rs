use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Living-Wage
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Where the area pages live
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Site root that relative area links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Two-digit FIPS code of the state whose index page is scraped
    #[serde(rename = "state-fips")]
    pub state_fips: String,

    /// Two-letter postal code stored on each area row
    #[serde(rename = "state-code")]
    pub state_code: String,

    /// Trailing state qualifiers stripped from page headings
    #[serde(rename = "state-suffixes", default = "default_state_suffixes")]
    pub state_suffixes: Vec<String>,
}

impl SourceConfig {
    /// URL of the state's area index page
    pub fn index_url(&self) -> String {
        format!(
            "{}/states/{}/locations",
            self.base_url.trim_end_matches('/'),
            self.state_fips
        )
    }
}

/// Fetch cache and politeness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Path to the JSON fetch cache
    #[serde(rename = "cache-path", default = "default_cache_path")]
    pub cache_path: String,

    /// Lower bound of the random delay before each network request (seconds)
    #[serde(rename = "min-delay-secs", default = "default_min_delay")]
    pub min_delay_secs: u64,

    /// Upper bound of the random delay before each network request (seconds)
    #[serde(rename = "max-delay-secs", default = "default_max_delay")]
    pub max_delay_secs: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.cache_path)
    }

    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_secs(self.min_delay_secs),
            Duration::from_secs(self.max_delay_secs),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
            timeout_secs: default_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

fn default_state_suffixes() -> Vec<String> {
    vec![", Michigan".to_string(), ", MI".to_string()]
}

fn default_cache_path() -> String {
    "living_wage_cache.json".to_string()
}

fn default_min_delay() -> u64 {
    5
}

fn default_max_delay() -> u64 {
    10
}

fn default_timeout() -> u64 {
    30
}
