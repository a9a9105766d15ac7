//! Per-invocation transaction context.

use chrono::{DateTime, SecondsFormat, Utc};
use std::cell::RefCell;

use crate::composite::{create_composite_key, partial_key_range};
use crate::error::{StoreError, StoreResult};
use crate::traits::{KvIter, ReadSet, StateStore, WriteSet};

/// Host-supplied transaction time, identical on every replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl TxTimestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Capture the host clock. Only the host calls this, once per transaction.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            seconds: now.timestamp(),
            nanos: now.timestamp_subsec_nanos(),
        }
    }

    /// RFC3339 in UTC at second precision, e.g. `2024-05-01T12:00:00Z`.
    pub fn to_rfc3339(&self) -> StoreResult<String> {
        let time = DateTime::<Utc>::from_timestamp(self.seconds, self.nanos).ok_or_else(|| {
            StoreError::InvalidTimestamp(format!("{}s {}ns out of range", self.seconds, self.nanos))
        })?;
        Ok(time.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Event attached to a transaction, published by the host after commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_id: String,
    /// Number of keys written.
    pub writes: usize,
    pub event: Option<LedgerEvent>,
}

/// A single ledger invocation against the world state.
///
/// Writes are buffered and become visible to other transactions only on
/// [`TxContext::commit`]; dropping the context discards them. Point reads
/// see this transaction's own writes. Range scans see committed state only.
pub struct TxContext<'a> {
    store: &'a dyn StateStore,
    tx_id: String,
    timestamp: TxTimestamp,
    reads: RefCell<ReadSet>,
    writes: RefCell<WriteSet>,
    event: RefCell<Option<LedgerEvent>>,
}

impl<'a> TxContext<'a> {
    pub fn new(store: &'a dyn StateStore, tx_id: impl Into<String>, timestamp: TxTimestamp) -> Self {
        Self {
            store,
            tx_id: tx_id.into(),
            timestamp,
            reads: RefCell::new(ReadSet::new()),
            writes: RefCell::new(WriteSet::new()),
            event: RefCell::new(None),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// The transaction timestamp in the persisted RFC3339 form.
    pub fn ledger_time(&self) -> StoreResult<String> {
        self.timestamp.to_rfc3339()
    }

    /// Read a key, preferring this transaction's pending write.
    pub fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(pending) = self.writes.borrow().get(key) {
            return Ok(Some(pending.clone()));
        }

        let value = self.store.get(key)?;
        self.reads
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| value.clone());
        Ok(value)
    }

    /// Buffer a write. Overwrites silently.
    pub fn put_state(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".into()));
        }
        self.writes.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    /// Committed entries with `start <= key < end`; empty bounds are open.
    pub fn range_scan(&self, start: &str, end: &str) -> StoreResult<KvIter<'a>> {
        self.store.range(start, end)
    }

    /// Committed entries whose composite key extends `namespace + parts`.
    pub fn partial_composite_scan(&self, namespace: &str, parts: &[&str]) -> StoreResult<KvIter<'a>> {
        let (start, end) = partial_key_range(namespace, parts)?;
        self.store.range(&start, &end)
    }

    pub fn composite_key(&self, namespace: &str, parts: &[&str]) -> StoreResult<String> {
        create_composite_key(namespace, parts)
    }

    /// Attach the transaction's event. A later call replaces an earlier one.
    pub fn set_event(&self, name: impl Into<String>, payload: Vec<u8>) {
        *self.event.borrow_mut() = Some(LedgerEvent {
            name: name.into(),
            payload,
        });
    }

    /// Number of writes buffered so far.
    pub fn pending_writes(&self) -> usize {
        self.writes.borrow().len()
    }

    /// Validate the read-set and apply every buffered write atomically.
    pub fn commit(self) -> StoreResult<TxReceipt> {
        let reads = self.reads.into_inner();
        let writes = self.writes.into_inner();

        self.store.commit(&reads, &writes)?;

        tracing::debug!(
            tx_id = %self.tx_id,
            reads = reads.len(),
            writes = writes.len(),
            "transaction committed"
        );

        Ok(TxReceipt {
            tx_id: self.tx_id,
            writes: writes.len(),
            event: self.event.into_inner(),
        })
    }
}
