//! Polite, cache-backed HTTP fetcher
//!
//! This module handles all HTTP requests of a scrape run:
//! - Building the HTTP client with the configured user agent string
//! - Answering repeated URLs from the fetch cache without touching the network
//! - Throttling real requests with a random delay
//! - Persisting every successful response body before returning it
//!
//! Failed requests are not retried and never reach the cache.

use crate::cache::FetchCache;
use crate::config::{FetchConfig, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use crate::{LivingWageError, Result};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use living_wage::config::UserAgentConfig;
/// use living_wage::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "LivingWage".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches page bodies through the cache, sleeping before every real request
pub struct PoliteFetcher {
    client: Client,
    cache: FetchCache,
    throttle: Throttle,
    hits: u64,
    misses: u64,
}

impl PoliteFetcher {
    /// Creates a fetcher from the fetch and user agent configuration
    pub fn new(
        fetch: &FetchConfig,
        user_agent: &UserAgentConfig,
        cache: FetchCache,
    ) -> Result<Self> {
        let client = build_http_client(user_agent, fetch.timeout())?;
        let (min_delay, max_delay) = fetch.delay_range();

        Ok(Self::with_client(
            client,
            cache,
            Throttle::new(min_delay, max_delay),
        ))
    }

    /// Creates a fetcher from prebuilt parts
    pub fn with_client(client: Client, cache: FetchCache, throttle: Throttle) -> Self {
        Self {
            client,
            cache,
            throttle,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the body of `url`
    ///
    /// # Flow
    ///
    /// 1. Cached URL: return the stored body immediately (no delay, no request)
    /// 2. Otherwise sleep the throttle delay and send a GET
    /// 3. Non-success status or transport failure: return the error; nothing is cached
    /// 4. Store the body in the cache (durably written) and return it
    pub async fn fetch(&mut self, url: &str) -> Result<String> {
        if let Some(body) = self.cache.get(url) {
            self.hits += 1;
            tracing::debug!("Cache hit: {}", url);
            return Ok(body.to_string());
        }

        self.misses += 1;
        tracing::debug!("Cache miss: {}", url);
        self.throttle.wait().await;

        let body = self.get(url).await?;
        self.cache.put(url, &body)?;

        tracing::info!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }

    async fn get(&self, url: &str) -> Result<String> {
        let network = |source: reqwest::Error| LivingWageError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LivingWageError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(network)
    }

    /// Writes the cache to its backing file
    pub fn flush(&self) -> Result<()> {
        self.cache.flush()?;
        Ok(())
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Number of requests answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of requests sent over the network
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestScraper".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn offline_fetcher(cache: FetchCache) -> PoliteFetcher {
        let client = build_http_client(&create_test_config(), Duration::from_secs(1)).unwrap();
        PoliteFetcher::with_client(client, cache, Throttle::disabled())
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config, Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_new_from_config() {
        let fetcher = PoliteFetcher::new(
            &FetchConfig::default(),
            &create_test_config(),
            FetchCache::in_memory(),
        )
        .unwrap();

        assert_eq!(
            fetcher.throttle().range(),
            (Duration::from_secs(5), Duration::from_secs(10))
        );
        assert_eq!(fetcher.hits(), 0);
        assert_eq!(fetcher.misses(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let mut cache = FetchCache::in_memory();
        // Unroutable address: any network attempt would fail
        cache
            .put("http://127.0.0.1:9/area", "<html>cached</html>")
            .unwrap();

        let mut fetcher = offline_fetcher(cache);
        let body = fetcher.fetch("http://127.0.0.1:9/area").await.unwrap();

        assert_eq!(body, "<html>cached</html>");
        assert_eq!(fetcher.hits(), 1);
        assert_eq!(fetcher.misses(), 0);
        assert_eq!(fetcher.throttle().waits(), 0);
    }

    #[tokio::test]
    async fn test_only_cache_misses_wait() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/area"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>area</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config(), Duration::from_secs(5)).unwrap();
        let delay = Duration::from_millis(20);
        let mut fetcher = PoliteFetcher::with_client(
            client,
            FetchCache::in_memory(),
            Throttle::new(delay, delay),
        );
        let url = format!("{}/area", server.uri());

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>area</html>");
        assert_eq!(fetcher.misses(), 1);
        assert_eq!(fetcher.throttle().waits(), 1);
        assert_eq!(fetcher.throttle().total_waited(), delay);

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>area</html>");
        assert_eq!(fetcher.hits(), 1);
        assert_eq!(fetcher.throttle().waits(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_is_not_cached() {
        let mut fetcher = offline_fetcher(FetchCache::in_memory());

        let err = fetcher.fetch("http://127.0.0.1:9/area").await.unwrap_err();

        assert!(err.is_network());
        assert_eq!(fetcher.misses(), 1);
        assert!(fetcher.cache().is_empty());
    }
}
