//! Typed accessors for the node RPC endpoints.

mod swarm;

pub use swarm::{PeerInfo, SwarmApi};
