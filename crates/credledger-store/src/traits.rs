use std::collections::BTreeMap;

use crate::error::StoreResult;

/// Keys read during a transaction, mapped to the value observed (or absence).
pub type ReadSet = BTreeMap<String, Option<Vec<u8>>>;

/// Buffered writes of a transaction, applied together at commit.
pub type WriteSet = BTreeMap<String, Vec<u8>>;

/// Lazily produced `(key, value)` pairs in ascending key order.
pub type KvIter<'a> = Box<dyn Iterator<Item = StoreResult<(String, Vec<u8>)>> + 'a>;

/// An ordered key-value world state shared by every record kind.
pub trait StateStore: Send + Sync {
    /// Fetch the committed value at `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Iterate committed entries with `start <= key < end` in ascending byte
    /// order. An empty `start` or `end` leaves that side unbounded.
    fn range(&self, start: &str, end: &str) -> StoreResult<KvIter<'_>>;

    /// Atomically apply `writes`, provided every key in `reads` still holds
    /// the observed value. On conflict nothing is written.
    fn commit(&self, reads: &ReadSet, writes: &WriteSet) -> StoreResult<()>;
}

/// Whether `key` falls inside a `[start, end)` range with optional empty bounds.
pub(crate) fn in_range(key: &str, start: &str, end: &str) -> bool {
    (start.is_empty() || key >= start) && (end.is_empty() || key < end)
}
