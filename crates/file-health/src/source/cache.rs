//! Parsed-table cache keyed by content fingerprint.
//!
//! Re-running a diagnosis on the same bytes (a re-upload, a refreshed export
//! that did not change) skips parsing entirely.

use crate::error::Result;
use crate::table::Table;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// SHA-256 of the raw input, lowercase hex.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Thread-safe map from fingerprint to parsed table.
///
/// [`SourceCache::new`] never evicts: callers own eviction through
/// [`remove`](Self::remove) and [`clear`](Self::clear).
/// [`SourceCache::with_capacity`] keeps at most that many tables and drops
/// the oldest insertion first.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: RwLock<Entries>,
    capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct Entries {
    tables: HashMap<String, Arc<Table>>,
    order: VecDeque<String>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `max_entries` tables (at least one).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: RwLock::default(),
            capacity: Some(max_entries.max(1)),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn get(&self, fingerprint: &str) -> Option<Arc<Table>> {
        self.entries.read().tables.get(fingerprint).cloned()
    }

    pub fn insert(&self, fingerprint: impl Into<String>, table: Arc<Table>) {
        let fingerprint = fingerprint.into();
        let mut entries = self.entries.write();

        if entries.tables.insert(fingerprint.clone(), table).is_some() {
            return;
        }
        entries.order.push_back(fingerprint);

        if let Some(capacity) = self.capacity {
            while entries.tables.len() > capacity {
                let Some(oldest) = entries.order.pop_front() else {
                    break;
                };
                entries.tables.remove(&oldest);
                debug!("Evicted cached table {}", short(&oldest));
            }
        }
    }

    pub fn remove(&self, fingerprint: &str) -> Option<Arc<Table>> {
        let mut entries = self.entries.write();
        let removed = entries.tables.remove(fingerprint)?;
        entries.order.retain(|key| key != fingerprint);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().tables.is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.tables.clear();
        entries.order.clear();
    }

    /// Cached table for `fingerprint`, or the result of `parse` stored under it.
    ///
    /// A failing `parse` leaves the cache untouched.
    pub fn get_or_parse<F>(&self, fingerprint: &str, parse: F) -> Result<Arc<Table>>
    where
        F: FnOnce() -> Result<Table>,
    {
        if let Some(table) = self.get(fingerprint) {
            debug!("Cache hit for {}", short(fingerprint));
            return Ok(table);
        }

        let table = Arc::new(parse()?);
        self.insert(fingerprint, Arc::clone(&table));
        Ok(table)
    }
}

/// First 12 characters of a key, for logs.
fn short(key: &str) -> &str {
    key.char_indices()
        .nth(12)
        .map_or(key, |(end, _)| &key[..end])
}

static_assertions::assert_impl_all!(SourceCache: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticError;
    use polars::prelude::*;

    fn table() -> Table {
        Table::new(df!["a" => [1, 2, 3]].unwrap()).unwrap()
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let first = fingerprint(b"a,b\n1,2\n");
        assert_eq!(first.len(), 64);
        assert_eq!(first, fingerprint(b"a,b\n1,2\n"));
        assert_ne!(first, fingerprint(b"a,b\n1,3\n"));
    }

    #[test]
    fn test_get_or_parse_parses_once() {
        let cache = SourceCache::new();
        let mut calls = 0;

        let first = cache
            .get_or_parse("key", || {
                calls += 1;
                Ok(table())
            })
            .unwrap();
        let second = cache
            .get_or_parse("key", || {
                calls += 1;
                Ok(table())
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_parse_is_not_cached() {
        let cache = SourceCache::new();
        let result =
            cache.get_or_parse("bad", || Err(DiagnosticError::MalformedInput("x".into())));

        assert!(result.is_err());
        assert!(cache.is_empty());

        cache.insert("good", Arc::new(table()));
        cache.clear();
        assert!(cache.get("good").is_none());
    }

    #[test]
    fn test_non_ascii_keys() {
        let cache = SourceCache::new();
        let key = "ééééééééééééé-upload";

        cache.get_or_parse(key, || Ok(table())).unwrap();
        let hit = cache
            .get_or_parse(key, || Err(DiagnosticError::MalformedInput("x".into())))
            .unwrap();

        assert_eq!(hit.height(), 3);
        assert_eq!(short(key), "éééééééééééé");
        assert_eq!(short("abc"), "abc");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = SourceCache::with_capacity(2);
        cache.insert("one", Arc::new(table()));
        cache.insert("two", Arc::new(table()));
        cache.insert("one", Arc::new(table()));
        cache.insert("three", Arc::new(table()));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("one").is_none());
        assert!(cache.get("two").is_some());
        assert!(cache.get("three").is_some());
        assert_eq!(cache.capacity(), Some(2));
    }

    #[test]
    fn test_unbounded_cache_evicts_only_on_request() {
        let cache = SourceCache::new();
        for key in ["a", "b", "c", "d"] {
            cache.insert(key, Arc::new(table()));
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.capacity(), None);

        assert!(cache.remove("b").is_some());
        assert!(cache.remove("b").is_none());
        assert_eq!(cache.len(), 3);

        let bounded = SourceCache::with_capacity(0);
        bounded.insert("x", Arc::new(table()));
        bounded.insert("y", Arc::new(table()));
        assert_eq!(bounded.len(), 1);
        assert!(bounded.get("y").is_some());
    }
}
