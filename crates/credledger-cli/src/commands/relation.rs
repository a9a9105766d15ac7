//! Issuer-holder relationships and organization affiliations.

use clap::Args;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RelationArgs {
    #[arg(long)]
    pub holder: String,

    #[arg(long)]
    pub issuer: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Args, Debug)]
pub struct AffiliationArgs {
    #[arg(long)]
    pub user: String,

    #[arg(long)]
    pub org: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn relate(args: &RelationArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client
        .invoke(
            "AddIssuerHolderRelationship",
            &[args.holder.clone(), args.issuer.clone()],
        )
        .await?;
    println!("Relationship registered: issuer {} -> holder {}", args.issuer, args.holder);
    super::print_tx(&result);
    Ok(())
}

pub async fn check_relation(args: &RelationArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client
        .query(
            "CheckIssuerHolderRelationship",
            &[args.holder.clone(), args.issuer.clone()],
        )
        .await?;
    let exists = super::bool_of(&result)?;
    println!(
        "Relationship issuer {} -> holder {}: {}",
        args.issuer,
        args.holder,
        if exists { "present" } else { "absent" }
    );
    Ok(())
}

pub async fn affiliate(args: &AffiliationArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client
        .invoke("AddOrganizationAffiliation", &[args.user.clone(), args.org.clone()])
        .await?;
    println!("Affiliation registered: {} in {}", args.user, args.org);
    super::print_tx(&result);
    Ok(())
}

pub async fn check_affiliation(args: &AffiliationArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    let result = client
        .query("CheckOrganizationAffiliation", &[args.user.clone(), args.org.clone()])
        .await?;
    let exists = super::bool_of(&result)?;
    println!(
        "Affiliation {} in {}: {}",
        args.user,
        args.org,
        if exists { "present" } else { "absent" }
    );
    Ok(())
}
