//! Set algebra over IPv4 CIDR ranges.
//!
//! [`complement`] answers the one question the reconciler needs: given a
//! whitelist and a blacklist, which disjoint ranges must be filtered so that
//! only the whitelisted (and not blacklisted) space stays reachable?

use crate::cidr::Cidr;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Compute the minimal disjoint set of ranges covering the whole IPv4 space
/// except `allowed \ blocked`.
///
/// Starting from `0.0.0.0/0`, every range in `allowed` that is not also in
/// `blocked` is punched out of the working set, most specific first. A hole
/// that is not fully contained in a working range leaves that range alone.
/// Blacklisted ranges that fell inside a punched-out region are re-added, so
/// a blacklist entry is filtered even when a broader whitelist entry nominally
/// admits it.
///
/// With `allowed` empty the result is the full space; with `allowed` covering
/// the full space the result is exactly `blocked`. The total address count is
/// conserved, so for disjoint inputs the outcome does not depend on the
/// iteration order among equal prefix lengths.
#[must_use]
pub fn complement(allowed: &BTreeSet<Cidr>, blocked: &BTreeSet<Cidr>) -> BTreeSet<Cidr> {
    let mut exclusions: Vec<Cidr> = allowed.difference(blocked).copied().collect();
    exclusions.sort_by_key(|c| Reverse(c.prefix_len()));

    let mut working = vec![Cidr::full()];
    for hole in &exclusions {
        working = working.iter().flat_map(|range| range.subtract(hole)).collect();
    }

    // Widest blacklist entries first, so a nested entry finds itself already
    // covered by the time it is considered.
    let mut pending: Vec<Cidr> = blocked.iter().copied().collect();
    pending.sort_by_key(Cidr::prefix_len);
    for entry in pending {
        if working.iter().any(|range| range.contains(&entry)) {
            continue;
        }
        // CIDR ranges never partially overlap: whatever the entry touches in
        // the working set, it swallows whole.
        working.retain(|range| !entry.contains(range));
        working.push(entry);
    }

    working.into_iter().collect()
}
