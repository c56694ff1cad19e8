//! The static whitelist/blacklist policy.

use crate::admission::Posture;
use crate::algebra::complement;
use crate::cidr::Cidr;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

/// Whitelist/blacklist policy loaded once at startup.
///
/// Both lists are sets: duplicates collapse, and a blacklist entry need not
/// be related to any whitelist entry. For blocking decisions the blacklist
/// wins, so a range listed on both sides stays filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionSpec {
    whitelist: BTreeSet<Cidr>,
    blacklist: BTreeSet<Cidr>,
}

impl AdmissionSpec {
    /// Build a spec from whitelist and blacklist ranges
    pub fn new<W, B>(whitelist: W, blacklist: B) -> Self
    where
        W: IntoIterator<Item = Cidr>,
        B: IntoIterator<Item = Cidr>,
    {
        Self {
            whitelist: whitelist.into_iter().collect(),
            blacklist: blacklist.into_iter().collect(),
        }
    }

    /// The built-in fallback policy: loopback and RFC 1918 private ranges
    /// whitelisted, nothing blacklisted.
    #[must_use]
    pub fn builtin_defaults() -> Self {
        let whitelist = [
            (Ipv4Addr::new(127, 0, 0, 0), 8),
            (Ipv4Addr::new(10, 0, 0, 0), 8),
            (Ipv4Addr::new(172, 16, 0, 0), 12),
            (Ipv4Addr::new(192, 168, 0, 0), 16),
        ]
        .into_iter()
        .map(|(addr, prefix)| Cidr::new(addr, prefix).expect("valid default range"));

        Self::new(whitelist, [])
    }

    /// Whitelisted ranges
    #[must_use]
    pub const fn whitelist(&self) -> &BTreeSet<Cidr> {
        &self.whitelist
    }

    /// Blacklisted ranges
    #[must_use]
    pub const fn blacklist(&self) -> &BTreeSet<Cidr> {
        &self.blacklist
    }

    /// The filter set the node should have applied under `posture`.
    ///
    /// Open: the blacklist alone. Restricted: the complement of the
    /// whitelist, i.e. everything else, with blacklisted ranges filtered
    /// even where the whitelist nominally admits them. An empty whitelist
    /// degenerates to blocking `0.0.0.0/0` outright.
    #[must_use]
    pub fn desired_filters(&self, posture: Posture) -> BTreeSet<Cidr> {
        match posture {
            Posture::Unrestricted => self.blacklist.clone(),
            Posture::Restricted => complement(&self.whitelist, &self.blacklist),
        }
    }
}

impl Default for AdmissionSpec {
    fn default() -> Self {
        Self::builtin_defaults()
    }
}
