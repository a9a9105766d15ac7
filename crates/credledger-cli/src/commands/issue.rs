//! `credledger issue`: Issue a credential.

use clap::Args;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Document id of the new credential.
    #[arg(long)]
    pub doc_id: String,

    /// Hash of the off-ledger document.
    #[arg(long)]
    pub hash: String,

    #[arg(long)]
    pub holder: String,

    #[arg(long)]
    pub issuer: String,

    /// Issuing organization.
    #[arg(long)]
    pub org: String,

    /// Credential type (degree, certificate, badge, ...).
    #[arg(short = 't', long = "type", default_value = "degree")]
    pub credential_type: String,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub achievement_date: String,

    #[arg(long, default_value = "")]
    pub expiration_date: String,

    #[arg(long, default_value = "")]
    pub program_length: String,

    #[arg(long, default_value = "")]
    pub domain: String,

    /// Extra attributes as a JSON object of strings.
    #[arg(short, long, default_value = "{}")]
    pub attributes: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl IssueArgs {
    /// Positional arguments of `IssueCredential`.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.doc_id.clone(),
            self.hash.clone(),
            self.holder.clone(),
            self.issuer.clone(),
            self.org.clone(),
            self.credential_type.clone(),
            self.title.clone(),
            self.description.clone(),
            self.achievement_date.clone(),
            self.expiration_date.clone(),
            self.program_length.clone(),
            self.domain.clone(),
            self.attributes.clone(),
        ]
    }
}

pub async fn run(args: &IssueArgs) -> anyhow::Result<()> {
    serde_json::from_str::<serde_json::Value>(&args.attributes)
        .map_err(|e| anyhow::anyhow!("invalid attributes JSON: {}", e))?;

    let client = NodeClient::new(&args.endpoint);
    let result = client.invoke("IssueCredential", &args.to_args()).await?;
    let credential = super::credential_of(&result)?;

    println!("Credential issued!");
    super::print_credential(&credential);
    super::print_tx(&result);
    Ok(())
}
