//! `credledger grant` / `credledger grants`: Access grant audit trail.

use clap::Args;
use credledger_core::AccessGrant;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct GrantArgs {
    /// Document id being shared.
    pub doc_id: String,

    /// Party receiving access.
    pub requester: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Args, Debug)]
pub struct GrantsArgs {
    /// Document id whose grants to list.
    pub doc_id: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn grant(args: &GrantArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client
        .invoke("GrantAccess", &[args.doc_id.clone(), args.requester.clone()])
        .await?;
    let grant: AccessGrant = serde_json::from_value(result.result.clone())?;

    println!("Access granted.");
    println!("  Doc ID:       {}", grant.doc_id);
    println!("  Requested by: {}", grant.requested_by);
    println!("  Granted at:   {}", grant.granted_at);
    super::print_tx(&result);
    Ok(())
}

pub async fn list(args: &GrantsArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client.query("GetAccessGrants", &[args.doc_id.clone()]).await?;
    let grants: Vec<AccessGrant> = serde_json::from_value(result.result)?;

    if grants.is_empty() {
        println!("No access grants for {}", args.doc_id);
        return Ok(());
    }
    println!("Access grants for {} ({}):", args.doc_id, grants.len());
    for grant in &grants {
        println!("  {}  {}", grant.granted_at, grant.requested_by);
    }
    Ok(())
}
