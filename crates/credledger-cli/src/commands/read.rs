//! `credledger read`: Show a credential.

use clap::Args;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Document id of the credential.
    pub doc_id: String,

    /// Print the raw JSON record.
    #[arg(long)]
    pub json: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &ReadArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client.query("ReadCredential", &[args.doc_id.clone()]).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.result)?);
        return Ok(());
    }

    let credential = super::credential_of(&result)?;
    println!("Credential:");
    super::print_credential(&credential);
    Ok(())
}
