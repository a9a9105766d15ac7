//! `credledger accept` / `credledger deny`: Record the holder's decision.

use clap::Args;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Document id of the credential.
    pub doc_id: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn accept(args: &DecideArgs) -> anyhow::Result<()> {
    run(args, "AcceptCredential", "accepted").await
}

pub async fn deny(args: &DecideArgs) -> anyhow::Result<()> {
    run(args, "DenyCredential", "denied").await
}

async fn run(args: &DecideArgs, function: &str, verb: &str) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client.invoke(function, &[args.doc_id.clone()]).await?;
    let credential = super::credential_of(&result)?;

    println!("Credential {} {}.", credential.doc_id, verb);
    println!("  Status:       {}", credential.status());
    super::print_tx(&result);
    Ok(())
}
