//! Test harness shared by the integration scenarios.
//!
//! [`Ledger`] plays the host: it opens one transaction per call, stamps it
//! with a monotonically increasing timestamp, and commits invocations.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use credledger_core::{Credential, LedgerConfig};
use credledger_registry::{CredentialContract, RegistryError, RegistryResult, Response};
use credledger_store::{MemoryStore, RocksStore, StateStore, TxContext, TxTimestamp};

/// 2024-05-01T12:00:00Z
pub const BASE_SECONDS: i64 = 1_714_564_800;

pub struct Ledger {
    pub store: Arc<dyn StateStore>,
    pub contract: CredentialContract,
    clock: AtomicI64,
}

impl Ledger {
    pub fn new(store: Arc<dyn StateStore>, config: &LedgerConfig) -> Self {
        Self {
            store,
            contract: CredentialContract::new(config),
            clock: AtomicI64::new(BASE_SECONDS),
        }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), &LedgerConfig::default())
    }

    pub fn memory_with(config: &LedgerConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    pub fn rocks(path: &std::path::Path) -> Self {
        let store = RocksStore::open(path).expect("open rocksdb");
        Self::new(Arc::new(store), &LedgerConfig::default())
    }

    /// A fresh transaction one second after the previous one.
    pub fn begin(&self) -> TxContext<'_> {
        let seconds = self.clock.fetch_add(1, Ordering::SeqCst);
        TxContext::new(
            self.store.as_ref(),
            format!("tx-{}", seconds - BASE_SECONDS),
            TxTimestamp::new(seconds, 0),
        )
    }

    /// Run and commit a state-changing operation.
    pub fn invoke(&self, function: &str, args: &[&str]) -> RegistryResult<Response> {
        let tx = self.begin();
        let response = self.contract.invoke(&tx, function, &owned(args))?;
        tx.commit()
            .map_err(|source| RegistryError::Store { op: "commit", source })?;
        Ok(response)
    }

    /// Run an operation without committing.
    pub fn query(&self, function: &str, args: &[&str]) -> RegistryResult<Response> {
        let tx = self.begin();
        self.contract.invoke(&tx, function, &owned(args))
    }

    pub fn issue(&self, doc_id: &str, holder: &str, issuer: &str, org: &str, hash: &str) -> RegistryResult<Credential> {
        match self.invoke("IssueCredential", &issue_args(doc_id, holder, issuer, org, hash))? {
            Response::Credential(c) => Ok(*c),
            other => panic!("IssueCredential returned {:?}", other),
        }
    }

    pub fn read(&self, doc_id: &str) -> RegistryResult<Credential> {
        match self.query("ReadCredential", &[doc_id])? {
            Response::Credential(c) => Ok(*c),
            other => panic!("ReadCredential returned {:?}", other),
        }
    }

    pub fn list(&self, function: &str, args: &[&str]) -> RegistryResult<Vec<Credential>> {
        match self.query(function, args)? {
            Response::Credentials(c) => Ok(c),
            other => panic!("{} returned {:?}", function, other),
        }
    }

    pub fn key_count(&self) -> usize {
        self.store.range("", "").expect("range").count()
    }
}

/// Positional `IssueCredential` arguments with fixed descriptive fields.
pub fn issue_args<'a>(doc_id: &'a str, holder: &'a str, issuer: &'a str, org: &'a str, hash: &'a str) -> Vec<&'a str> {
    vec![
        doc_id,
        hash,
        holder,
        issuer,
        org,
        "degree",
        "Bachelor of Science",
        "Four-year undergraduate program",
        "2024-04-30",
        "",
        "4 years",
        "Computer Science",
        r#"{"gpa":"3.8","honors":"cum laude"}"#,
    ]
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// A unique scratch directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, rand::random::<u64>()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
