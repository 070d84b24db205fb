//! End-to-end scrape tests
//!
//! A mock origin serves the state index page and one county and one metro
//! area page. Mock call counts prove which pages reach the network.

use living_wage::cache::FetchCache;
use living_wage::config::{Config, FetchConfig, OutputConfig, SourceConfig, UserAgentConfig};
use living_wage::crawler::Coordinator;
use living_wage::model::{AreaKind, ChildCount, HouseholdComposition};
use living_wage::storage::{RunStatus, SqliteStorage, Storage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX_PAGE: &str = include_str!("../fixtures/index.html");
const COUNTY_PAGE: &str = include_str!("../fixtures/county.html");
const METRO_PAGE: &str = include_str!("../fixtures/metro.html");

const INDEX_PATH: &str = "/states/26/locations";
const COUNTY_PATH: &str = "/counties/26161";
const METRO_PATH: &str = "/metros/11460";

/// Creates a test configuration pointing at the mock origin, without delays
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        source: SourceConfig {
            base_url: base_url.to_string(),
            state_fips: "26".to_string(),
            state_code: "MI".to_string(),
            state_suffixes: vec![", Michigan".to_string(), ", MI".to_string()],
        },
        fetch: FetchConfig {
            cache_path: dir.path().join("cache.json").display().to_string(),
            min_delay_secs: 0,
            max_delay_secs: 0,
            timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestScraper".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: dir.path().join("living_wage.db").display().to_string(),
            summary_path: dir.path().join("summary.md").display().to_string(),
        },
    }
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(calls)
        .mount(server)
        .await;
}

fn child(n: u8) -> ChildCount {
    ChildCount::new(n).unwrap()
}

#[tokio::test]
async fn test_full_scrape_stores_every_area() {
    let server = MockServer::start().await;
    mount_page(&server, INDEX_PATH, INDEX_PAGE, 1).await;
    mount_page(&server, COUNTY_PATH, COUNTY_PAGE, 1).await;
    mount_page(&server, METRO_PATH, METRO_PAGE, 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);
    let cache_path = config.fetch.cache_path();

    let mut coordinator = Coordinator::new(config, "hash", false).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.areas_ok, 2);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.cache_misses, 3);
    // Wage and expense extraction reuse the page fetched to resolve the area
    assert_eq!(report.cache_hits, 4);
    // Every network request waited for the throttle
    assert_eq!(coordinator.fetcher().throttle().waits(), report.cache_misses);

    let storage = coordinator.storage();
    assert_eq!(storage.count_areas().unwrap(), 2);

    let county = storage.get_area("washtenaw").unwrap().unwrap();
    assert_eq!(county.kind, AreaKind::County);
    assert_eq!(county.index_key, "washtenaw");
    assert_eq!(county.url, format!("{}{}", server.uri(), COUNTY_PATH));

    let metro = storage.get_area("Ann Arbor").unwrap().unwrap();
    assert_eq!(metro.kind, AreaKind::MetroArea);
    assert_eq!(metro.display_name, "Ann Arbor");
    assert_eq!(metro.index_key, "ann arbor, mi");

    for name in ["washtenaw", "ann arbor"] {
        let wages = storage.load_wages(name).unwrap();
        let expenses = storage.load_expenses(name).unwrap();
        assert_eq!(wages.len(), 12);
        assert_eq!(expenses.len(), 12);

        // Minimum wage does not vary by composition
        for children in ChildCount::ALL {
            let minimum: Vec<f64> = HouseholdComposition::ALL
                .iter()
                .map(|c| wages.get(*c, children).minimum_wage.value())
                .collect();
            assert!(minimum.iter().all(|m| *m == minimum[0]));
        }
    }

    let wages = storage.load_wages("washtenaw").unwrap();
    assert_eq!(
        wages
            .get(HouseholdComposition::OneAdult, child(0))
            .living_wage
            .value(),
        13.12
    );
    let expenses = storage.load_expenses("ann arbor").unwrap();
    assert_eq!(
        expenses
            .get(HouseholdComposition::OneAdult, child(3))
            .required_annual_income
            .value(),
        94300.0
    );

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.id, report.run_id);
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.areas_ok, 2);
    assert_eq!(run.config_hash, "hash");

    let cache = FetchCache::open(&cache_path);
    assert_eq!(cache.len(), 3);
    assert_eq!(
        cache.get(&format!("{}{}", server.uri(), METRO_PATH)),
        Some(METRO_PAGE)
    );
}

#[tokio::test]
async fn test_pre_seeded_cache_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);

    let mut cache = FetchCache::open(&config.fetch.cache_path());
    cache
        .put(&config.source.index_url(), INDEX_PAGE)
        .unwrap();
    cache
        .put(&format!("{}{}", server.uri(), COUNTY_PATH), COUNTY_PAGE)
        .unwrap();
    cache
        .put(&format!("{}{}", server.uri(), METRO_PATH), METRO_PAGE)
        .unwrap();

    let mut coordinator = Coordinator::new(config, "hash", false).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.areas_ok, 2);
    assert_eq!(report.cache_misses, 0);
    assert_eq!(report.cache_hits, 7);
    assert_eq!(coordinator.fetcher().throttle().waits(), 0);
}

#[tokio::test]
async fn test_failed_area_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, INDEX_PATH, INDEX_PAGE, 1).await;
    mount_page(&server, COUNTY_PATH, COUNTY_PAGE, 1).await;
    Mock::given(method("GET"))
        .and(path(METRO_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);
    let cache_path = config.fetch.cache_path();

    let mut coordinator = Coordinator::new(config, "hash", false).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.areas_ok, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index_key, "ann arbor, mi");
    assert!(report.failures[0].error.contains("500"));

    let storage = coordinator.storage();
    assert!(storage.get_area("washtenaw").unwrap().is_some());
    assert!(storage.get_area("ann arbor").unwrap().is_none());

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.areas_failed, 1);

    // The failed response never reaches the cache
    let cache = FetchCache::open(&cache_path);
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&format!("{}{}", server.uri(), METRO_PATH)));
}

#[tokio::test]
async fn test_malformed_area_page_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, INDEX_PATH, INDEX_PAGE, 1).await;
    mount_page(&server, METRO_PATH, METRO_PAGE, 1).await;

    // Drop one cell from the living wage row
    let truncated = COUNTY_PAGE.replacen("<td>$13.12</td>", "", 1);
    mount_page(&server, COUNTY_PATH, &truncated, 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);

    let mut coordinator = Coordinator::new(config, "hash", false).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.areas_ok, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index_key, "washtenaw");
    assert!(
        report.failures[0].error.contains("Unexpected wage table layout"),
        "{}",
        report.failures[0].error
    );
    assert!(coordinator.storage().get_area("washtenaw").unwrap().is_none());
}

#[tokio::test]
async fn test_unreachable_index_fails_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);
    let db_path = config.output.database_path.clone();

    let mut coordinator = Coordinator::new(config, "hash", false).unwrap();
    let err = coordinator.run().await.unwrap_err();
    assert!(err.is_network());
    drop(coordinator);

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
}

#[tokio::test]
async fn test_unreachable_index_keeps_previous_areas() {
    let good = MockServer::start().await;
    mount_page(&good, INDEX_PATH, INDEX_PAGE, 1).await;
    mount_page(&good, COUNTY_PATH, COUNTY_PAGE, 1).await;
    mount_page(&good, METRO_PATH, METRO_PAGE, 1).await;

    let dir = TempDir::new().unwrap();
    let first = Coordinator::new(create_test_config(&good.uri(), &dir), "hash", false)
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(first.areas_ok, 2);

    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&down)
        .await;

    let mut coordinator =
        Coordinator::new(create_test_config(&down.uri(), &dir), "hash", true).unwrap();
    let err = coordinator.run().await.unwrap_err();
    assert!(err.is_network());

    let storage = coordinator.storage();
    assert_eq!(storage.count_areas().unwrap(), 2);
    assert_eq!(storage.load_wages("washtenaw").unwrap().len(), 12);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert_ne!(run.id, first.run_id);
}

#[tokio::test]
async fn test_fresh_run_refetches_cached_pages() {
    let server = MockServer::start().await;
    mount_page(&server, INDEX_PATH, INDEX_PAGE, 1).await;
    mount_page(&server, COUNTY_PATH, COUNTY_PAGE, 1).await;
    mount_page(&server, METRO_PATH, METRO_PAGE, 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);

    // A stale index that lists nothing would fail the run if it were used
    let mut cache = FetchCache::open(&config.fetch.cache_path());
    cache
        .put(&config.source.index_url(), "<html><body>stale</body></html>")
        .unwrap();

    let mut coordinator = Coordinator::new(config, "hash", true).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.areas_ok, 2);
    assert_eq!(report.cache_misses, 3);
}

#[tokio::test]
async fn test_second_run_replaces_areas_from_cache() {
    let server = MockServer::start().await;
    mount_page(&server, INDEX_PATH, INDEX_PAGE, 1).await;
    mount_page(&server, COUNTY_PATH, COUNTY_PAGE, 1).await;
    mount_page(&server, METRO_PATH, METRO_PAGE, 1).await;

    let dir = TempDir::new().unwrap();

    let first = Coordinator::new(create_test_config(&server.uri(), &dir), "hash", false)
        .unwrap()
        .run()
        .await
        .unwrap();

    let mut coordinator =
        Coordinator::new(create_test_config(&server.uri(), &dir), "hash", false).unwrap();
    let second = coordinator.run().await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(second.areas_ok, 2);
    assert_eq!(second.cache_misses, 0);
    assert_eq!(coordinator.storage().count_areas().unwrap(), 2);
}
