//! Credledger CLI — Command-line client for a Credledger node.
//!
//! Subcommands: issue, accept, deny, read, verify, relate, check-relation,
//! affiliate, check-affiliation, grant, grants, list, health.

mod client;
mod commands;

use clap::{Parser, Subcommand};

/// Credledger: credential issuance and verification on a key-value ledger.
#[derive(Parser, Debug)]
#[command(name = "credledger", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a credential.
    Issue(commands::issue::IssueArgs),
    /// Accept a credential as its holder.
    Accept(commands::decide::DecideArgs),
    /// Deny a credential as its holder.
    Deny(commands::decide::DecideArgs),
    /// Show a credential.
    Read(commands::read::ReadArgs),
    /// Check a document hash against the stored one.
    Verify(commands::verify::VerifyArgs),
    /// Register an issuer-holder relationship.
    Relate(commands::relation::RelationArgs),
    /// Check whether an issuer-holder relationship exists.
    CheckRelation(commands::relation::RelationArgs),
    /// Register a user's affiliation with an organization.
    Affiliate(commands::relation::AffiliationArgs),
    /// Check whether an affiliation exists.
    CheckAffiliation(commands::relation::AffiliationArgs),
    /// Grant a third party access to a document.
    Grant(commands::grant::GrantArgs),
    /// List the access grants of a document.
    Grants(commands::grant::GrantsArgs),
    /// List credentials.
    List(commands::list::ListArgs),
    /// Check node health.
    Health(commands::health::HealthArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Issue(args) => commands::issue::run(args).await,
        Commands::Accept(args) => commands::decide::accept(args).await,
        Commands::Deny(args) => commands::decide::deny(args).await,
        Commands::Read(args) => commands::read::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Relate(args) => commands::relation::relate(args).await,
        Commands::CheckRelation(args) => commands::relation::check_relation(args).await,
        Commands::Affiliate(args) => commands::relation::affiliate(args).await,
        Commands::CheckAffiliation(args) => commands::relation::check_affiliation(args).await,
        Commands::Grant(args) => commands::grant::grant(args).await,
        Commands::Grants(args) => commands::grant::list(args).await,
        Commands::List(args) => commands::list::run(args).await,
        Commands::Health(args) => commands::health::run(args).await,
    }
}
