//! Fetch-then-extract steps for one page
//!
//! Each step fetches its page through the polite fetcher, so the first step
//! for an area pays for the request and the others are answered from the
//! cache.

use crate::config::SourceConfig;
use crate::crawler::PoliteFetcher;
use crate::extract::{self, AreaIndex, IndexEntry};
use crate::model::{AreaExpenseProfile, AreaWageProfile, ResolvedArea};
use crate::Result;
use url::Url;

/// Fetches the state index page and parses every county and metro area link
pub async fn build_index(fetcher: &mut PoliteFetcher, source: &SourceConfig) -> Result<AreaIndex> {
    let base_url = Url::parse(&source.base_url)?;
    let index_url = source.index_url();

    let body = fetcher.fetch(&index_url).await?;
    let index = extract::parse_area_index(&body, &base_url)?;

    tracing::info!("Discovered {} areas at {}", index.len(), index_url);
    Ok(index)
}

/// Fetches an area page and resolves its display name and kind
pub async fn resolve_area(
    fetcher: &mut PoliteFetcher,
    entry: &IndexEntry,
    state_suffixes: &[String],
) -> Result<ResolvedArea> {
    let body = fetcher.fetch(entry.url.as_str()).await?;
    let (display_name, kind) = extract::resolve_area(&body, state_suffixes)?;

    Ok(ResolvedArea {
        display_name,
        kind,
        url: entry.url.to_string(),
        index_key: entry.key.clone(),
    })
}

/// Fetches an area page and extracts its wage profile
pub async fn extract_wages(fetcher: &mut PoliteFetcher, url: &str) -> Result<AreaWageProfile> {
    let body = fetcher.fetch(url).await?;
    Ok(extract::extract_wages(&body)?)
}

/// Fetches an area page and extracts its expense profile
pub async fn extract_expenses(
    fetcher: &mut PoliteFetcher,
    url: &str,
) -> Result<AreaExpenseProfile> {
    let body = fetcher.fetch(url).await?;
    Ok(extract::extract_expenses(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FetchCache;
    use crate::config::UserAgentConfig;
    use crate::crawler::{build_http_client, Throttle};
    use crate::extract::IndexCategory;
    use crate::model::AreaKind;
    use std::time::Duration;

    const BASE: &str = "http://127.0.0.1:9";
    const INDEX_PAGE: &str = include_str!("../../tests/fixtures/index.html");
    const COUNTY_PAGE: &str = include_str!("../../tests/fixtures/county.html");

    fn source() -> SourceConfig {
        SourceConfig {
            base_url: BASE.to_string(),
            state_fips: "26".to_string(),
            state_code: "MI".to_string(),
            state_suffixes: vec![", Michigan".to_string(), ", MI".to_string()],
        }
    }

    /// A fetcher whose cache already holds every page; nothing listens on BASE
    fn cached_fetcher() -> PoliteFetcher {
        let mut cache = FetchCache::in_memory();
        cache.put(&source().index_url(), INDEX_PAGE).unwrap();
        cache
            .put(&format!("{}/counties/26161", BASE), COUNTY_PAGE)
            .unwrap();

        let user_agent = UserAgentConfig {
            crawler_name: "TestScraper".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        };
        let client = build_http_client(&user_agent, Duration::from_secs(1)).unwrap();
        PoliteFetcher::with_client(client, cache, Throttle::disabled())
    }

    #[tokio::test]
    async fn test_area_pipeline_from_cache() {
        let mut fetcher = cached_fetcher();

        let index = build_index(&mut fetcher, &source()).await.unwrap();
        assert_eq!(index.len(), 2);

        let entry = index.get("washtenaw").unwrap();
        assert_eq!(entry.category, IndexCategory::Counties);

        let area = resolve_area(&mut fetcher, entry, &source().state_suffixes)
            .await
            .unwrap();
        assert_eq!(area.display_name, "Washtenaw");
        assert_eq!(area.kind, AreaKind::County);
        assert_eq!(area.index_key, "washtenaw");
        assert_eq!(area.url, format!("{}/counties/26161", BASE));

        let wages = extract_wages(&mut fetcher, &area.url).await.unwrap();
        let expenses = extract_expenses(&mut fetcher, &area.url).await.unwrap();
        assert_eq!(wages.len(), 12);
        assert_eq!(expenses.len(), 12);

        assert_eq!(fetcher.hits(), 4);
        assert_eq!(fetcher.misses(), 0);
    }

    #[tokio::test]
    async fn test_extraction_error_passes_through() {
        let mut fetcher = cached_fetcher();

        // The index page has no wage table
        let err = extract_wages(&mut fetcher, &source().index_url())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::LivingWageError::Extract(_)));
        assert!(!err.is_network());
    }
}
