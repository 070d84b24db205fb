//! Integration tests for Living-Wage
//!
//! These tests run complete scrapes against a wiremock origin serving the
//! HTML fixtures under `tests/fixtures/`.

mod scrape_tests;
