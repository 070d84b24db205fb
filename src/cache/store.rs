//! JSON-file backed URL -> body store

use crate::cache::{CacheError, CacheResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persistent mapping of URL to the raw body it returned
///
/// Construction loads the backing file (or starts empty); `put` and `flush`
/// write the complete mapping back.
#[derive(Debug, Default)]
pub struct FetchCache {
    /// Backing file; `None` keeps the cache in memory only
    path: Option<PathBuf>,

    entries: BTreeMap<String, String>,
}

impl FetchCache {
    /// Opens the cache stored at `path`
    ///
    /// A missing, unreadable, or corrupt file yields an empty cache. The file
    /// is not touched until the first `put` or `flush`.
    pub fn open(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => {
                    tracing::debug!(
                        "Loaded {} cached pages from {}",
                        entries.len(),
                        path.display()
                    );
                    entries
                }
                Err(e) => {
                    tracing::warn!(
                        "Cache file {} is corrupt ({}), starting with an empty cache",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cache file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Cache file {} is unreadable ({}), starting with an empty cache",
                    path.display(),
                    e
                );
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    /// Creates a cache that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Returns the cached body for `url`, if any
    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Stores `body` for `url` and durably rewrites the backing file
    pub fn put(&mut self, url: &str, body: &str) -> CacheResult<()> {
        self.entries.insert(url.to_string(), body.to_string());
        self.flush()
    }

    /// Writes the complete mapping to the backing file
    ///
    /// The mapping is written to a sibling temporary file and renamed over the
    /// old one, so readers see either the previous or the new cache. The
    /// temporary file is synced to disk before the rename.
    pub fn flush(&self) -> CacheResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let serialized = serde_json::to_string(&self.entries)?;
        let tmp_path = path.with_extension("json.tmp");

        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let mut file = File::create(&tmp_path).map_err(io_err)?;
        file.write_all(serialized.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp_path, path).map_err(io_err)?;

        Ok(())
    }

    /// Drops every entry and rewrites the backing file
    pub fn clear(&mut self) -> CacheResult<()> {
        self.entries.clear();
        self.flush()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
