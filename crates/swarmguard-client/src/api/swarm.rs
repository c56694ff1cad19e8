//! Swarm RPC endpoints: connection filters and the peer list.

use crate::client::NodeClient;
use crate::error::Result;
use serde::Deserialize;

/// Swarm endpoints of the node RPC API
pub struct SwarmApi<'a> {
    client: &'a NodeClient,
}

/// One connected peer as reported by the node
#[derive(Debug, Clone, Deserialize)]
pub struct PeerInfo {
    /// Transport address of the connection
    #[serde(rename = "Addr", default)]
    pub addr: String,
    /// Peer identity
    #[serde(rename = "Peer", default)]
    pub peer: String,
}

/// Response shape shared by the filter endpoints. The node reports `null`
/// instead of an empty list.
#[derive(Debug, Deserialize)]
struct FiltersResponse {
    #[serde(rename = "Strings", default)]
    strings: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PeersResponse {
    #[serde(rename = "Peers", default)]
    peers: Option<Vec<PeerInfo>>,
}

impl<'a> SwarmApi<'a> {
    pub(crate) const fn new(client: &'a NodeClient) -> Self {
        Self { client }
    }

    /// List the currently applied connection filters as multiaddr strings
    pub async fn filters(&self) -> Result<Vec<String>> {
        let response: FiltersResponse = self.client.post("/api/v0/swarm/filters", &[]).await?;
        Ok(response.strings.unwrap_or_default())
    }

    /// Apply a connection filter
    pub async fn add_filter(&self, filter: &str) -> Result<()> {
        let _: FiltersResponse = self
            .client
            .post("/api/v0/swarm/filters/add", &[("arg", filter)])
            .await?;
        Ok(())
    }

    /// Remove an applied connection filter
    pub async fn rm_filter(&self, filter: &str) -> Result<()> {
        let _: FiltersResponse = self
            .client
            .post("/api/v0/swarm/filters/rm", &[("arg", filter)])
            .await?;
        Ok(())
    }

    /// Currently connected peers
    pub async fn peers(&self) -> Result<Vec<PeerInfo>> {
        let response: PeersResponse = self.client.post("/api/v0/swarm/peers", &[]).await?;
        Ok(response.peers.unwrap_or_default())
    }

    /// Number of currently connected peers
    pub async fn peer_count(&self) -> Result<u64> {
        Ok(self.peers().await?.len() as u64)
    }
}
