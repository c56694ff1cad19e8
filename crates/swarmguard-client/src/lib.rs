//! HTTP client for the node's swarm RPC API, plus the filter reconciler.
//!
//! The node exposes a Kubo-style RPC over HTTP: connection filters are
//! listed, added and removed as `/ip4/<addr>/ipcidr/<prefix>` multiaddr
//! strings, and the connected peer list doubles as the peer counter.
//! [`reconcile`] converges the node's applied filter set onto a desired
//! [`Cidr`](swarmguard_core::Cidr) set with the minimal add/remove calls.

pub mod api;
mod client;
mod error;
pub mod reconcile;

pub use client::{NodeClient, NodeClientBuilder};
pub use error::{NodeError, Result};
pub use reconcile::{reconcile, ReconcileResult};
