//! Credledger Store — The world-state adapter every ledger operation goes through.
//!
//! - **Composite keys** (`composite.rs`): order-preserving `namespace + parts`
//!   keys supporting partial-key prefix scans.
//! - **Backends** (`memory.rs`, `rocks.rs`): an ordered in-memory map and a
//!   RocksDB column family, both behind the [`StateStore`] trait.
//! - **Transactions** (`context.rs`): one [`TxContext`] per invocation, with a
//!   buffered write-set, a read-set validated at commit, the host timestamp,
//!   and a single event slot.

pub mod composite;
pub mod context;
pub mod error;
pub mod memory;
pub mod rocks;
pub mod traits;

pub use composite::{
    create_composite_key, partial_key_range, split_composite_key, COMPOSITE_KEY_NAMESPACE,
    MAX_UNICODE_RUNE,
};
pub use context::{LedgerEvent, TxContext, TxReceipt, TxTimestamp};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use traits::{KvIter, ReadSet, StateStore, WriteSet};
