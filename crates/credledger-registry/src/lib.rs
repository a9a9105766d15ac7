//! Credledger Registry — Credential lifecycle and indexing over the world state.
//!
//! Every component here is a stateless coordinator: all state lives in the
//! store and is reached through the [`TxContext`](credledger_store::TxContext)
//! of the current invocation.

pub mod access;
pub mod contract;
pub mod error;
pub mod index;
pub mod keys;
pub mod manager;
pub mod relationship;
pub mod verifier;

pub use access::AccessGrantLog;
pub use contract::{CredentialContract, Operation, Response};
pub use error::{RegistryError, RegistryResult};
pub use index::{CredentialIter, IndexKind, SecondaryIndex};
pub use manager::CredentialManager;
pub use relationship::RelationshipRegistry;
pub use verifier::IntegrityVerifier;
