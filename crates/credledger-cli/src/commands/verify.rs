//! `credledger verify`: Compare a document hash with the stored one.

use clap::Args;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Document id of the credential.
    pub doc_id: String,

    /// Hash to compare, matched exactly.
    pub hash: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client
        .query("VerifyHash", &[args.doc_id.clone(), args.hash.clone()])
        .await?;

    if super::bool_of(&result)? {
        println!("Hash MATCHES the stored document hash for {}", args.doc_id);
    } else {
        println!("Hash does NOT match the stored document hash for {}", args.doc_id);
    }
    Ok(())
}
