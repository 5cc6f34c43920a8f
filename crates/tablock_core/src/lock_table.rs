//! In-memory lock table keyed by tab identity.

use crate::types::{LockRecord, LockStatus, TabId};
use std::collections::HashMap;

/// Mapping from tab identity to its [`LockRecord`].
///
/// Every mutation goes through a method that drops vacant records, so a
/// record exists for a tab iff it has a lock on or an override set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockTable {
    records: HashMap<TabId, LockRecord>,
}

impl LockTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from persisted records, discarding vacant ones.
    pub fn from_records(records: HashMap<TabId, LockRecord>) -> Self {
        let records = records
            .into_iter()
            .filter(|(_, record)| !record.is_vacant())
            .collect();
        Self { records }
    }

    /// Returns the record for a tab, if any.
    pub fn get(&self, tab_id: TabId) -> Option<&LockRecord> {
        self.records.get(&tab_id)
    }

    /// Returns the reported status for a tab; missing records read as unlocked.
    pub fn status(&self, tab_id: TabId) -> LockStatus {
        LockStatus::of(self.get(tab_id))
    }

    /// Returns true if the tab has a record.
    pub fn contains(&self, tab_id: TabId) -> bool {
        self.records.contains_key(&tab_id)
    }

    /// Applies `f` to the tab's record, creating an unlocked one anchored at
    /// `url` first if absent. The record is deleted afterwards if vacant.
    ///
    /// Returns the record as it stands after the mutation.
    pub fn update<F>(&mut self, tab_id: TabId, url: &str, f: F) -> Option<&LockRecord>
    where
        F: FnOnce(&mut LockRecord),
    {
        let record = self
            .records
            .entry(tab_id)
            .or_insert_with(|| LockRecord::new(url));
        f(record);

        if record.is_vacant() {
            self.records.remove(&tab_id);
            return None;
        }
        self.records.get(&tab_id)
    }

    /// Applies `f` to an existing record only. Vacant results are deleted.
    ///
    /// Returns false when the tab had no record.
    pub fn modify<F>(&mut self, tab_id: TabId, f: F) -> bool
    where
        F: FnOnce(&mut LockRecord),
    {
        let Some(record) = self.records.get_mut(&tab_id) else {
            return false;
        };
        f(record);
        if record.is_vacant() {
            self.records.remove(&tab_id);
        }
        true
    }

    /// Stores a record under a tab identity, replacing any previous one.
    /// Vacant records are not stored.
    pub fn insert(&mut self, tab_id: TabId, record: LockRecord) {
        if record.is_vacant() {
            self.records.remove(&tab_id);
        } else {
            self.records.insert(tab_id, record);
        }
    }

    /// Removes and returns a tab's record.
    pub fn remove(&mut self, tab_id: TabId) -> Option<LockRecord> {
        self.records.remove(&tab_id)
    }

    /// Iterates over all records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (TabId, &LockRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Number of tabs with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no tab has a record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the underlying map for persistence.
    pub fn records(&self) -> &HashMap<TabId, LockRecord> {
        &self.records
    }
}
