//! RocksDB world-state backend.

use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::traits::{in_range, KvIter, ReadSet, StateStore, WriteSet};

/// Column family holding the shared world-state keyspace.
const CF_WORLD_STATE: &str = "world_state";

/// RocksDB-backed world state.
pub struct RocksStore {
    db: DB,
    /// Serializes read-set validation and batch application across committers.
    commit_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path)
            .map_err(|e| StoreError::Backend(format!("failed to create {}: {}", path.display(), e)))?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(
            CF_WORLD_STATE,
            Options::default(),
        )];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        tracing::debug!(path = %path.display(), "world state opened");

        Ok(Self {
            db,
            commit_lock: Mutex::new(()),
        })
    }

    fn world_state(&self) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(CF_WORLD_STATE)
            .ok_or_else(|| StoreError::Backend(format!("column family '{}' not found", CF_WORLD_STATE)))
    }
}

impl StateStore for RocksStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let cf = self.world_state()?;
        Ok(self.db.get_cf(cf, key.as_bytes())?)
    }

    fn range(&self, start: &str, end: &str) -> StoreResult<KvIter<'_>> {
        let cf = self.world_state()?;
        let mode = if start.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(start.as_bytes(), Direction::Forward)
        };
        let end = end.to_string();

        let iter = self
            .db
            .iterator_cf(cf, mode)
            .map(|item| -> StoreResult<(String, Vec<u8>)> {
                let (key, value) = item?;
                let key = String::from_utf8(key.into_vec())
                    .map_err(|e| StoreError::InvalidKey(format!("non UTF-8 key in world state: {}", e)))?;
                Ok((key, value.into_vec()))
            })
            .take_while(move |item| match item {
                Ok((key, _)) => in_range(key, "", &end),
                Err(_) => true,
            });

        Ok(Box::new(iter))
    }

    fn commit(&self, reads: &ReadSet, writes: &WriteSet) -> StoreResult<()> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {}", e)))?;
        let cf = self.world_state()?;

        for (key, observed) in reads {
            let current = self.db.get_cf(cf, key.as_bytes())?;
            if current.as_ref() != observed.as_ref() {
                tracing::warn!(key = ?key, "read conflict at commit");
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        let mut batch = WriteBatch::default();
        for (key, value) in writes {
            batch.put_cf(cf, key.as_bytes(), value);
        }
        self.db.write(batch)?;
        Ok(())
    }
}
