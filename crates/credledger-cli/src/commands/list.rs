//! `credledger list`: List credentials, optionally through an index.

use clap::Args;
use credledger_core::Credential;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only credentials held by this holder.
    #[arg(long, conflicts_with_all = ["issuer", "org"])]
    pub holder: Option<String>,

    /// Only credentials issued by this issuer.
    #[arg(long, conflicts_with = "org")]
    pub issuer: Option<String>,

    /// Only credentials issued under this organization.
    #[arg(long)]
    pub org: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl ListArgs {
    /// Operation name and arguments for the selected filter.
    pub fn operation(&self) -> (&'static str, Vec<String>) {
        if let Some(holder) = &self.holder {
            ("GetHolderCredentials", vec![holder.clone()])
        } else if let Some(issuer) = &self.issuer {
            ("GetCredentialsByIssuer", vec![issuer.clone()])
        } else if let Some(org) = &self.org {
            ("GetOrganizationCredentials", vec![org.clone()])
        } else {
            ("GetAllCredentials", Vec::new())
        }
    }
}

pub async fn run(args: &ListArgs) -> anyhow::Result<()> {
    let (function, call_args) = args.operation();
    let client = NodeClient::new(&args.endpoint);
    let result = client.query(function, &call_args).await?;
    let credentials: Vec<Credential> = serde_json::from_value(result.result)?;

    if credentials.is_empty() {
        println!("No credentials found.");
        return Ok(());
    }

    println!("Credentials ({}):", credentials.len());
    for credential in &credentials {
        println!(
            "  {:<20} {:<10} holder={} issuer={} org={}",
            credential.doc_id,
            credential.status(),
            credential.holder_id,
            credential.issuer_id,
            credential.issuer_org_id
        );
    }
    Ok(())
}
