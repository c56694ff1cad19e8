//! Converging the node's applied filter set onto a desired set.
//!
//! Reconciliation always diffs against a freshly listed filter set, never
//! against its own prior output, so re-running after a partial failure
//! resumes where the last pass stopped without re-issuing operations that
//! already took effect.

use crate::client::NodeClient;
use crate::error::Result;
use std::collections::BTreeSet;
use swarmguard_core::Cidr;
use tracing::debug;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Filters added in this pass
    pub added: usize,
    /// Filters removed in this pass
    pub removed: usize,
    /// True when the applied set already matched the desired set
    pub already_converged: bool,
}

/// Converge the node's applied filters onto `desired`.
///
/// Issues the minimal add/remove calls, additions first so the node is
/// never left unfiltered mid-transition when tightening. A rejected
/// operation means the node already agrees (filter already present or
/// already absent) and counts as a no-op. A transport failure aborts the
/// pass; the partial result stands and the next pass picks up the rest.
pub async fn reconcile(client: &NodeClient, desired: &BTreeSet<Cidr>) -> Result<ReconcileResult> {
    let listed = client.swarm().filters().await?;

    let mut applied = BTreeSet::new();
    for raw in &listed {
        match Cidr::from_multiaddr(raw) {
            Ok(cidr) => {
                applied.insert(cidr);
            }
            // Filters we did not write (e.g. IPv6) are left alone.
            Err(_) => debug!(filter = %raw, "ignoring foreign swarm filter"),
        }
    }

    let to_add: Vec<Cidr> = desired.difference(&applied).copied().collect();
    let to_remove: Vec<Cidr> = applied.difference(desired).copied().collect();
    let already_converged = to_add.is_empty() && to_remove.is_empty();

    let mut added = 0;
    for cidr in &to_add {
        match client.swarm().add_filter(&cidr.to_multiaddr()).await {
            Ok(()) => added += 1,
            Err(err) if err.is_rejected() => {
                debug!(filter = %cidr, error = %err, "filter already present");
            }
            Err(err) => return Err(err),
        }
    }

    let mut removed = 0;
    for cidr in &to_remove {
        match client.swarm().rm_filter(&cidr.to_multiaddr()).await {
            Ok(()) => removed += 1,
            Err(err) if err.is_rejected() => {
                debug!(filter = %cidr, error = %err, "filter already absent");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(ReconcileResult {
        added,
        removed,
        already_converged,
    })
}
