//! `credledger health`: Check that a node is up.

use clap::Args;

use crate::client::{NodeClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &HealthArgs) -> anyhow::Result<()> {
    let client = NodeClient::new(&args.endpoint);
    match client.get_json("/api/v1/health").await {
        Ok(health) => {
            println!("Node Health:");
            println!("  Status:   {}", health["status"].as_str().unwrap_or("unknown"));
            println!("  Version:  {}", health["version"].as_str().unwrap_or("unknown"));
            println!("  Backend:  {}", health["backend"].as_str().unwrap_or("unknown"));
            println!("  Uptime:   {}s", health["uptime_secs"].as_u64().unwrap_or(0));
        }
        Err(e) => {
            println!("{}", e);
            println!();
            println!("Is the node running? Start it with: credledger-node");
        }
    }
    Ok(())
}
