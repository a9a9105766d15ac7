//! Integration test: partial failures and index resolution tolerance.
//!
//! A failed invocation leaves nothing behind. Index entries that do not
//! resolve (written by other tooling, or left over from older data) are
//! skipped by listings instead of failing them.

use credledger_integration_tests::Ledger;
use credledger_registry::keys::{HOLDER_INDEX, INDEX_SENTINEL, ISSUER_INDEX};
use credledger_registry::RegistryError;
use credledger_store::{create_composite_key, MemoryStore, TxContext, TxTimestamp, WriteSet};
use std::sync::Arc;

use credledger_core::LedgerConfig;

fn ledger_over(store: Arc<MemoryStore>) -> Ledger {
    Ledger::new(store, &LedgerConfig::default())
}

#[test]
fn test_failed_issue_writes_nothing() {
    let ledger = Ledger::memory();
    let mut args = credledger_integration_tests::issue_args("doc-1", "H1", "I1", "O1", "h1");
    args[12] = "[1, 2, 3]";

    let result = ledger.invoke("IssueCredential", &args);
    assert!(matches!(result, Err(RegistryError::Validation(_))));
    assert_eq!(ledger.key_count(), 0);
}

#[test]
fn test_issue_aborted_mid_way_leaves_no_index_entries() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());

    // Buffer the full issuance, then lose the commit to a concurrent writer.
    let tx = ledger.begin();
    let args: Vec<String> = credledger_integration_tests::issue_args("doc-1", "H1", "I1", "O1", "h1")
        .into_iter()
        .map(String::from)
        .collect();
    ledger.contract.invoke(&tx, "IssueCredential", &args).unwrap();
    assert_eq!(tx.pending_writes(), 4);

    ledger.issue("doc-1", "H9", "I9", "O9", "other").unwrap();
    assert!(tx.commit().is_err());

    assert!(ledger.list("GetHolderCredentials", &["H1"]).unwrap().is_empty());
    assert!(ledger.list("GetCredentialsByIssuer", &["I1"]).unwrap().is_empty());
    assert_eq!(ledger.read("doc-1").unwrap().holder_id, "H9");
    assert_eq!(store.len(), 4);
}

#[test]
fn test_dropped_transaction_discards_writes() {
    let ledger = Ledger::memory();
    {
        let tx = ledger.begin();
        let args: Vec<String> = credledger_integration_tests::issue_args("doc-1", "H1", "I1", "O1", "h1")
            .into_iter()
            .map(String::from)
            .collect();
        ledger.contract.invoke(&tx, "IssueCredential", &args).unwrap();
    }
    assert_eq!(ledger.key_count(), 0);
    assert!(matches!(ledger.read("doc-1"), Err(RegistryError::NotFound(_))));
}

#[test]
fn test_dangling_index_entry_is_skipped() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();

    // Index entries whose primary record was never written.
    for namespace in [HOLDER_INDEX, ISSUER_INDEX] {
        let value = if namespace == HOLDER_INDEX { "H1" } else { "I1" };
        let key = create_composite_key(namespace, &[value, "doc-ghost"]).unwrap();
        store.put_direct(&key, &INDEX_SENTINEL).unwrap();
    }

    let by_holder = ledger.list("GetHolderCredentials", &["H1"]).unwrap();
    let by_issuer = ledger.list("GetCredentialsByIssuer", &["I1"]).unwrap();
    assert_eq!(by_holder.len(), 1);
    assert_eq!(by_holder[0].doc_id, "doc-1");
    assert_eq!(by_issuer.len(), 1);

    // The full scan never sees index sentinels as credentials.
    assert_eq!(ledger.list("GetAllCredentials", &[]).unwrap().len(), 1);
}

#[test]
fn test_undecodable_values_skipped_by_full_scan() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();
    ledger.invoke("AddIssuerHolderRelationship", &["H1", "I1"]).unwrap();
    store.put_direct("zz-legacy", b"{\"some\":\"other record\"}").unwrap();
    store.put_direct("aa-binary", &[0xff, 0x00, 0x13]).unwrap();

    let all = ledger.list("GetAllCredentials", &[]).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].doc_id, "doc-1");
}

#[test]
fn test_record_with_null_attributes_stays_usable() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    let issued = ledger.issue("doc-go", "H1", "I1", "O1", "h1").unwrap();

    // Records written by other tooling may carry `"attributes": null`.
    let mut stored: serde_json::Value = serde_json::from_slice(&issued.to_json_bytes().unwrap()).unwrap();
    stored["attributes"] = serde_json::Value::Null;
    store.put_direct("doc-go", &serde_json::to_vec(&stored).unwrap()).unwrap();

    let read = ledger.read("doc-go").unwrap();
    assert!(read.attributes.is_empty());
    assert_eq!(
        ledger.query("VerifyHash", &["doc-go", "h1"]).unwrap(),
        credledger_registry::Response::Bool(true)
    );
    assert_eq!(ledger.list("GetAllCredentials", &[]).unwrap().len(), 1);
    assert_eq!(ledger.list("GetHolderCredentials", &["H1"]).unwrap().len(), 1);

    ledger.invoke("AcceptCredential", &["doc-go"]).unwrap();
    assert!(ledger.read("doc-go").unwrap().accepted);
}

#[test]
fn test_corrupt_primary_record_surfaces_on_read() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();
    store.put_direct("doc-1", b"truncated{").unwrap();

    let read = ledger.read("doc-1");
    assert!(matches!(read, Err(RegistryError::Serialization { .. })));
    assert_eq!(read.unwrap_err().code(), "SERIALIZATION");

    // A listing through the index reports the bad record rather than hiding it.
    assert!(ledger.list("GetHolderCredentials", &["H1"]).is_err());
}

#[test]
fn test_raw_commit_of_conflicting_batch_is_all_or_nothing() {
    let store = MemoryStore::new();
    let stale = TxContext::new(&store, "stale", TxTimestamp::new(0, 0));
    assert!(stale.get_state("doc-1").unwrap().is_none());
    stale.put_state("doc-1", b"stale".to_vec()).unwrap();
    stale.put_state("idx", INDEX_SENTINEL.to_vec()).unwrap();

    let mut writes = WriteSet::new();
    writes.insert("doc-1".into(), b"fresh".to_vec());
    credledger_store::StateStore::commit(&store, &Default::default(), &writes).unwrap();

    assert!(stale.commit().is_err());
    assert_eq!(store.keys(), vec!["doc-1".to_string()]);
}
