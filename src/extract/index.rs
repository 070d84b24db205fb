//! Area index parsing
//!
//! The state index page lists counties and metro areas in two separate
//! regions. Each link's text, trimmed and lowercased, becomes the area key and
//! its `href`, resolved against the site base URL, the detail page address.

use crate::extract::schema::{
    AREA_INDEX, COUNTY_LISTING_SELECTOR, INDEX_CONTAINER_SELECTOR, METRO_LISTING_SELECTOR,
};
use crate::extract::{child_elements, selector, ExtractError, ExtractResult};
use scraper::{ElementRef, Html};
use std::fmt;
use url::Url;

/// Listing region an index entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCategory {
    Counties,
    Metros,
}

impl fmt::Display for IndexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexCategory::Counties => write!(f, "counties"),
            IndexCategory::Metros => write!(f, "metros"),
        }
    }
}

/// One discovered area: lowercased link text and absolute detail page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub url: Url,
    pub category: IndexCategory,
}

/// Name-keyed mapping of every discovered area
///
/// Entries keep the order in which their key was first seen. Consumers must
/// look areas up by key; position carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaIndex {
    entries: Vec<IndexEntry>,
}

impl AreaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any earlier entry with the same key
    ///
    /// Returns the replaced entry, if any.
    pub fn insert(&mut self, entry: IndexEntry) -> Option<IndexEntry> {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Merges another index into this one; entries from `other` win on collision
    pub fn merge(&mut self, other: AreaIndex) {
        for entry in other.entries {
            if let Some(replaced) = self.insert(entry) {
                tracing::debug!(
                    "Index key '{}' from {} replaced by a later listing",
                    replaced.key,
                    replaced.category
                );
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        let key = key.trim().to_lowercase();
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Number of entries that came from the given listing
    pub fn count_in(&self, category: IndexCategory) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }
}

impl IntoIterator for AreaIndex {
    type Item = IndexEntry;
    type IntoIter = std::vec::IntoIter<IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Parses the state index page into an area index
///
/// # Arguments
///
/// * `html` - The index page body
/// * `base_url` - The site base URL that link paths are resolved against
///
/// # Returns
///
/// * `Ok(AreaIndex)` - Counties first, then metro areas (metros win on a
///   shared key)
/// * `Err(ExtractError)` - The page container is missing or no area link
///   was found in either listing
pub fn parse_area_index(html: &str, base_url: &Url) -> ExtractResult<AreaIndex> {
    let document = Html::parse_document(html);

    let container_selector = selector(INDEX_CONTAINER_SELECTOR)?;
    let container = document
        .select(&container_selector)
        .next()
        .ok_or_else(|| ExtractError::mismatch(AREA_INDEX, "no page container"))?;

    let mut index = parse_listing(
        container,
        COUNTY_LISTING_SELECTOR,
        IndexCategory::Counties,
        base_url,
    )?;
    let metros = parse_listing(
        container,
        METRO_LISTING_SELECTOR,
        IndexCategory::Metros,
        base_url,
    )?;
    index.merge(metros);

    if index.is_empty() {
        return Err(ExtractError::mismatch(AREA_INDEX, "no area links found"));
    }

    tracing::debug!(
        "Parsed area index: {} counties, {} metro areas",
        index.count_in(IndexCategory::Counties),
        index.count_in(IndexCategory::Metros)
    );

    Ok(index)
}

/// Collects the links of one listing region; the first link for a key wins
fn parse_listing(
    container: ElementRef<'_>,
    css: &'static str,
    category: IndexCategory,
    base_url: &Url,
) -> ExtractResult<AreaIndex> {
    let mut index = AreaIndex::new();

    let listing_selector = selector(css)?;
    let Some(listing) = container.select(&listing_selector).next() else {
        tracing::warn!("Index page has no {} listing", category);
        return Ok(index);
    };

    let link_selector = selector("a[href]")?;
    for list in child_elements(listing, "ul") {
        for link in list.select(&link_selector) {
            let key = link.text().collect::<String>().trim().to_lowercase();
            if key.is_empty() {
                tracing::debug!("Skipping {} link without text", category);
                continue;
            }
            if index.contains(&key) {
                continue;
            }

            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let url = match base_url.join(href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping '{}': cannot resolve '{}': {}", key, href, e);
                    continue;
                }
            };

            index.insert(IndexEntry { key, url, category });
        }
    }

    Ok(index)
}
