//! Integration test: concurrent issuance of the same document id.
//!
//! Issuance is check-then-write. Two transactions that both observe the
//! document as absent must not both commit: the store's read-set validation
//! rejects the later one.

use std::sync::{Arc, Barrier};

use credledger_core::LedgerConfig;
use credledger_integration_tests::{issue_args, temp_dir, Ledger};
use credledger_registry::RegistryError;
use credledger_store::{MemoryStore, StateStore, StoreError};

/// Both transactions pass the existence check before either commits.
fn race_after_check(ledger: &Ledger) -> Vec<Result<(), RegistryError>> {
    let barrier = Barrier::new(2);
    std::thread::scope(|s| {
        let handles: Vec<_> = [("H1", "hash-a"), ("H2", "hash-b")]
            .into_iter()
            .map(|(holder, hash)| {
                let barrier = &barrier;
                s.spawn(move || -> Result<(), RegistryError> {
                    let tx = ledger.begin();
                    let args: Vec<String> = issue_args("doc-race", holder, "I1", "O1", hash)
                        .into_iter()
                        .map(String::from)
                        .collect();
                    let issued = ledger.contract.invoke(&tx, "IssueCredential", &args);
                    barrier.wait();
                    issued?;
                    tx.commit()
                        .map(|_| ())
                        .map_err(|source| RegistryError::Store { op: "commit", source })
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

fn assert_single_winner(ledger: &Ledger, results: &[Result<(), RegistryError>]) {
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one issuance may commit: {:?}", results);

    for loser in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            matches!(loser, RegistryError::AlreadyExists { .. })
                || matches!(
                    loser,
                    RegistryError::Store {
                        source: StoreError::Conflict { .. },
                        ..
                    }
                ),
            "unexpected loser error: {}",
            loser
        );
        assert!(matches!(loser.code(), "ALREADY_EXISTS" | "CONFLICT"));
    }

    // The winner's record and exactly its index entries are present.
    let winner = ledger.read("doc-race").unwrap();
    let h1 = ledger.list("GetHolderCredentials", &["H1"]).unwrap();
    let h2 = ledger.list("GetHolderCredentials", &["H2"]).unwrap();
    assert_eq!(h1.len() + h2.len(), 1);
    let indexed = if h1.is_empty() { &h2[0] } else { &h1[0] };
    assert_eq!(indexed, &winner);
    // One record plus three index entries.
    assert_eq!(ledger.key_count(), 4);
}

#[test]
fn test_race_after_check_memory() {
    let ledger = Ledger::memory();
    let results = race_after_check(&ledger);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RegistryError::Store { source: StoreError::Conflict { .. }, .. }))));
    assert_single_winner(&ledger, &results);
}

#[test]
fn test_race_after_check_rocksdb() {
    let dir = temp_dir("credledger-race");
    {
        let ledger = Ledger::rocks(&dir);
        let results = race_after_check(&ledger);
        assert_single_winner(&ledger, &results);
    }
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_many_threads_same_doc() {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let ledger = Ledger::new(store, &LedgerConfig::default());

    let results: Vec<Result<(), RegistryError>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = &ledger;
                s.spawn(move || {
                    let holder = format!("H{}", i);
                    ledger
                        .issue("doc-race", &holder, "I1", "O1", "h")
                        .map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for loser in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(loser.code(), "ALREADY_EXISTS" | "CONFLICT"), "{}", loser);
    }
    assert_eq!(ledger.key_count(), 4);
}

#[test]
fn test_distinct_docs_do_not_conflict() {
    let ledger = Ledger::memory();
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = &ledger;
                s.spawn(move || {
                    let doc = format!("doc-{}", i);
                    ledger.issue(&doc, "H1", "I1", "O1", "h").map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| r.is_ok()), "{:?}", results);
    assert_eq!(ledger.list("GetHolderCredentials", &["H1"]).unwrap().len(), 8);
}
