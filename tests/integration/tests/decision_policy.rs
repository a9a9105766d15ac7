//! Integration test: holder decisions under both decision policies.
//!
//! Whether accept/deny is final is not settled by the observed behavior:
//! some record variants let a holder change their mind, one rejects a
//! repeated accept. The default policy is fully reversible; the terminal
//! policy is opt-in. Both are pinned here so a product decision changes a
//! test, not a guess.

use credledger_core::{AcceptanceStatus, LedgerConfig};
use credledger_integration_tests::Ledger;
use credledger_registry::RegistryError;

#[test]
fn test_reversible_default_allows_reflip() {
    let ledger = Ledger::memory();
    ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();

    ledger.invoke("AcceptCredential", &["doc-1"]).unwrap();
    ledger.invoke("AcceptCredential", &["doc-1"]).unwrap();
    assert_eq!(ledger.read("doc-1").unwrap().status(), AcceptanceStatus::Accepted);

    ledger.invoke("DenyCredential", &["doc-1"]).unwrap();
    let denied = ledger.read("doc-1").unwrap();
    assert!(denied.denied && !denied.accepted);

    ledger.invoke("AcceptCredential", &["doc-1"]).unwrap();
    let accepted = ledger.read("doc-1").unwrap();
    assert!(accepted.accepted && !accepted.denied);
}

#[test]
fn test_terminal_policy_freezes_first_decision() {
    let ledger = Ledger::memory_with(&LedgerConfig {
        terminal_decisions: true,
        ..Default::default()
    });
    ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();
    ledger.issue("doc-2", "H1", "I1", "O1", "h2").unwrap();

    ledger.invoke("DenyCredential", &["doc-1"]).unwrap();
    let reflip = ledger.invoke("AcceptCredential", &["doc-1"]);
    assert!(matches!(reflip, Err(RegistryError::InvalidTransition { .. })));
    assert_eq!(reflip.unwrap_err().code(), "INVALID_TRANSITION");
    assert_eq!(ledger.read("doc-1").unwrap().status(), AcceptanceStatus::Denied);

    ledger.invoke("AcceptCredential", &["doc-2"]).unwrap();
    let repeat = ledger.invoke("AcceptCredential", &["doc-2"]);
    assert!(matches!(repeat, Err(RegistryError::InvalidTransition { .. })));
}

#[test]
fn test_decision_keeps_issuance_timestamp() {
    let ledger = Ledger::memory();
    let issued = ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();
    ledger.invoke("AcceptCredential", &["doc-1"]).unwrap();
    assert_eq!(ledger.read("doc-1").unwrap().ledger_timestamp, issued.ledger_timestamp);
}

#[test]
fn test_gated_issuance_requires_relationship() {
    let ledger = Ledger::memory_with(&LedgerConfig {
        require_relationship: true,
        ..Default::default()
    });

    let denied = ledger.issue("doc-1", "H1", "I1", "O1", "h1");
    assert!(matches!(denied, Err(RegistryError::NotAffiliated { .. })));
    assert_eq!(ledger.key_count(), 0);

    // The reverse pair does not count.
    ledger.invoke("AddIssuerHolderRelationship", &["I1", "H1"]).unwrap();
    assert!(ledger.issue("doc-1", "H1", "I1", "O1", "h1").is_err());

    ledger.invoke("AddIssuerHolderRelationship", &["H1", "I1"]).unwrap();
    ledger.issue("doc-1", "H1", "I1", "O1", "h1").unwrap();
    assert_eq!(ledger.read("doc-1").unwrap().issuer_id, "I1");
}

#[test]
fn test_affiliation_registry() {
    let ledger = Ledger::memory();
    ledger.invoke("AddOrganizationAffiliation", &["U1", "O1"]).unwrap();
    assert_eq!(
        ledger.query("CheckOrganizationAffiliation", &["U1", "O1"]).unwrap(),
        credledger_registry::Response::Bool(true)
    );
    assert!(matches!(
        ledger.invoke("AddOrganizationAffiliation", &["U1", "O1"]),
        Err(RegistryError::AlreadyExists { .. })
    ));
}
