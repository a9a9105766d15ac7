//! Subcommand implementations and shared output helpers.

pub mod decide;
pub mod grant;
pub mod health;
pub mod issue;
pub mod list;
pub mod read;
pub mod relation;
pub mod verify;

use credledger_core::Credential;

use crate::client::InvokeResult;

/// Print one credential record.
pub fn print_credential(credential: &Credential) {
    println!("  Doc ID:       {}", credential.doc_id);
    println!("  Hash:         {}", credential.doc_hash);
    println!("  Type:         {}", credential.credential_type);
    println!("  Title:        {}", credential.title);
    println!("  Holder:       {}", credential.holder_id);
    println!("  Issuer:       {}", credential.issuer_id);
    println!("  Organization: {}", credential.issuer_org_id);
    println!("  Status:       {}", credential.status());
    println!("  Issued at:    {}", credential.ledger_timestamp);
    if !credential.attributes.is_empty() {
        println!("  Attributes:");
        for (key, value) in credential.attributes.iter() {
            println!("    {}: {}", key, value);
        }
    }
}

/// Decode the `result` of an invocation as a single credential.
pub fn credential_of(result: &InvokeResult) -> anyhow::Result<Credential> {
    serde_json::from_value(result.result.clone())
        .map_err(|e| anyhow::anyhow!("unexpected response from node: {}", e))
}

/// Decode the `result` of an invocation as a boolean.
pub fn bool_of(result: &InvokeResult) -> anyhow::Result<bool> {
    result
        .result
        .as_bool()
        .ok_or_else(|| anyhow::anyhow!("unexpected response from node: {}", result.result))
}

/// Print the transaction line shown after every committed invocation.
pub fn print_tx(result: &InvokeResult) {
    match &result.event {
        Some(event) => println!("  Tx:           {} ({})", result.tx_id, event),
        None => println!("  Tx:           {}", result.tx_id),
    }
}
