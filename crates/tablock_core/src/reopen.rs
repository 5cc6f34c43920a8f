//! Rendezvous buffer bridging a closed tab-locked tab to its replacement.
//!
//! When a tab-locked tab closes, its record is parked here under its URL
//! while a replacement tab is created. Two paths race to pick it up: the
//! creation callback and the replacement's first update event. Both go
//! through [`ReopenBuffer::claim`], which removes the entry, so whichever
//! runs first wins and the other sees nothing.

use crate::types::LockRecord;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParkedRecord {
    record: LockRecord,
    parked_at: i64,
}

/// Transient URL-keyed snapshots of records awaiting a new tab identity.
///
/// Not persisted. Parking a second record under the same URL replaces the first.
#[derive(Debug, Clone, Default)]
pub struct ReopenBuffer {
    entries: HashMap<String, ParkedRecord>,
}

impl ReopenBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a snapshot of `record` under `url`.
    pub fn park(&mut self, url: impl Into<String>, record: LockRecord, now: i64) {
        self.entries.insert(
            url.into(),
            ParkedRecord {
                record,
                parked_at: now,
            },
        );
    }

    /// Removes and returns the snapshot parked under `url`, if still present.
    pub fn claim(&mut self, url: &str) -> Option<LockRecord> {
        self.entries.remove(url).map(|parked| parked.record)
    }

    /// Returns true if a snapshot is waiting under `url`.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Drops the snapshot under `url` without transferring it.
    pub fn discard(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Drops snapshots parked longer than `ttl` ago and returns their URLs.
    pub fn expire(&mut self, now: i64, ttl: Duration) -> Vec<String> {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let mut expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, parked)| now.saturating_sub(parked.parked_at) > ttl)
            .map(|(url, _)| url.clone())
            .collect();
        for url in &expired {
            self.entries.remove(url);
        }
        expired.sort();
        expired
    }

    /// URLs currently waiting, sorted.
    pub fn pending_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// Number of waiting snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
