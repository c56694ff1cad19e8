//! Canonical IPv4 CIDR ranges and prefix-tree splitting.
//!
//! [`Cidr`] wraps [`ipnet::Ipv4Net`] and enforces the canonical form
//! (host bits zeroed), so two ranges compare equal iff their
//! (network address, prefix length) pairs match. On top of that it adds the
//! two conversions the node RPC needs (`/ip4/<addr>/ipcidr/<prefix>`
//! multiaddrs) and the [`subtract`](Cidr::subtract) primitive the range
//! algebra is built from.

use crate::error::{CoreError, Result};
use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A contiguous IPv4 address range in canonical CIDR form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cidr(Ipv4Net);

impl Cidr {
    /// Create a range from a network address and prefix length.
    ///
    /// The address is truncated to its network address, so
    /// `Cidr::new(10.0.0.1, 8)` and `Cidr::new(10.0.0.0, 8)` are equal.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self> {
        Ipv4Net::new(addr, prefix_len)
            .map(|net| Self(net.trunc()))
            .map_err(|_| CoreError::InvalidPrefix(prefix_len))
    }

    /// The full IPv4 address space, `0.0.0.0/0`.
    #[must_use]
    pub fn full() -> Self {
        Self::from_bits(0, 0)
    }

    /// Construct from a raw network address. Callers guarantee
    /// `prefix_len <= 32`.
    fn from_bits(bits: u32, prefix_len: u8) -> Self {
        let net = Ipv4Net::new(Ipv4Addr::from(bits), prefix_len)
            .expect("prefix length is at most 32");
        Self(net.trunc())
    }

    /// Network address of the range
    #[must_use]
    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    /// Prefix length of the range
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Number of addresses covered by the range
    #[must_use]
    pub fn addr_count(&self) -> u64 {
        1u64 << (32 - self.prefix_len())
    }

    /// Whether `other` is fully contained in (or equal to) this range
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.0.contains(&other.0)
    }

    /// Subtract `hole` from this range.
    ///
    /// If `hole` is not a subset of this range, the range is returned
    /// unchanged. Otherwise the range is halved along the prefix-tree bit
    /// boundary down to `hole`'s depth, keeping the sibling of every step:
    /// the result is the disjoint cover of `self` minus `hole`, at most
    /// `hole.prefix_len() - self.prefix_len()` ranges (empty when
    /// `hole == self`).
    #[must_use]
    pub fn subtract(&self, hole: &Self) -> Vec<Self> {
        if !self.contains(hole) {
            return vec![*self];
        }

        let hole_bits = u32::from(hole.network());
        let mut siblings = Vec::with_capacity(usize::from(hole.prefix_len() - self.prefix_len()));

        for depth in (self.prefix_len() + 1)..=hole.prefix_len() {
            let bit = 1u32 << (32 - depth);
            // The half that contains the hole keeps being split; its sibling
            // survives whole.
            let on_path = hole_bits & prefix_mask(depth);
            siblings.push(Self::from_bits(on_path ^ bit, depth));
        }

        siblings
    }

    /// Parse a swarm filter multiaddr of the form `/ip4/<addr>/ipcidr/<prefix>`.
    pub fn from_multiaddr(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidMultiaddr(s.to_string());

        let mut parts = s.split('/');
        if parts.next() != Some("") || parts.next() != Some("ip4") {
            return Err(invalid());
        }
        let addr: Ipv4Addr = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        if parts.next() != Some("ipcidr") {
            return Err(invalid());
        }
        let prefix_len: u8 = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Self::new(addr, prefix_len).map_err(|_| invalid())
    }

    /// Render as a swarm filter multiaddr, e.g. `/ip4/10.0.0.0/ipcidr/8`
    #[must_use]
    pub fn to_multiaddr(&self) -> String {
        format!("/ip4/{}/ipcidr/{}", self.network(), self.prefix_len())
    }
}

/// Mask selecting the first `prefix_len` bits. `prefix_len` must be in 1..=32.
const fn prefix_mask(prefix_len: u8) -> u32 {
    u32::MAX << (32 - prefix_len)
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len())
    }
}

impl FromStr for Cidr {
    type Err = CoreError;

    /// Parse dotted CIDR notation. A bare address is treated as a /32 host
    /// range.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidCidr(s.to_string());

        if s.contains('/') {
            let net: Ipv4Net = s.parse().map_err(|_| invalid())?;
            Ok(Self(net.trunc()))
        } else {
            let addr: Ipv4Addr = s.parse().map_err(|_| invalid())?;
            Self::new(addr, 32).map_err(|_| invalid())
        }
    }
}
