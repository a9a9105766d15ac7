use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::traits::{in_range, KvIter, ReadSet, StateStore, WriteSet};

/// In-memory world state backed by an ordered map.
///
/// Used by tests and by the node's `memory` storage backend.
///
/// [`StateStore::range`] copies the matching entries out under the read lock,
/// so a scan costs memory proportional to its result and no lock is held
/// while the caller iterates. A commit issued mid-scan therefore cannot
/// deadlock against the scan. Use [`crate::RocksStore`] for large states.
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.data
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.data
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {}", e)))
    }

    /// Write a value outside any transaction (seeding and inspection).
    pub fn put_direct(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.write()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All committed keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.read()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn range(&self, start: &str, end: &str) -> StoreResult<KvIter<'_>> {
        // Snapshot under the read lock; iteration proceeds without holding it.
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let data = self.read()?;
        let entries: Vec<(String, Vec<u8>)> = data
            .range::<str, _>((lower, Bound::Unbounded))
            .take_while(|(k, _)| in_range(k, start, end))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn commit(&self, reads: &ReadSet, writes: &WriteSet) -> StoreResult<()> {
        let mut data = self.write()?;

        for (key, observed) in reads {
            if data.get(key) != observed.as_ref() {
                tracing::warn!(key = ?key, "read conflict at commit");
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        for (key, value) in writes {
            data.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}
