//! swarmguard - network health monitor for a node's swarm admission.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    swarmguard_cli::run().await
}
