//! Hysteresis admission control.
//!
//! One [`Sample`] arrives per monitoring cycle; [`next_posture`] folds it
//! into the current [`Posture`]. The enter and exit latency thresholds
//! differ, so a latency hovering between them never flips the posture back
//! and forth.

use crate::error::{CoreError, Result};
use std::fmt;

/// Latency above which an open node restricts itself (milliseconds)
pub const LATENCY_RESTRICT_THRESHOLD_MS: i64 = 40;

/// Latency below which a restricted node reopens (milliseconds)
pub const LATENCY_RELAX_THRESHOLD_MS: i64 = 30;

/// Connected-peer count above which an open node restricts itself
pub const MAX_PEER_COUNT: u64 = 800;

/// The node's current admission stance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    /// Accept connections from anywhere not blacklisted
    Unrestricted,
    /// Accept connections only from whitelisted ranges
    Restricted,
}

impl Posture {
    /// Numeric flag for the per-cycle record stream (0 open, 1 restricted)
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Unrestricted => 0,
            Self::Restricted => 1,
        }
    }

    /// Whether the protective posture is active
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        matches!(self, Self::Restricted)
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("unrestricted"),
            Self::Restricted => f.write_str("restricted"),
        }
    }
}

/// One cycle's worth of network health signals.
///
/// A sample is never partially filled: a lost probe window carries no
/// latency value and sets the loss flag instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    avg_latency_ms: Option<i64>,
    peer_count: u64,
    probe_loss: bool,
}

impl Sample {
    /// A sample whose probe window completed
    #[must_use]
    pub const fn measured(avg_latency_ms: i64, peer_count: u64) -> Self {
        Self {
            avg_latency_ms: Some(avg_latency_ms),
            peer_count,
            probe_loss: false,
        }
    }

    /// A sample whose probe window lost at least one probe
    #[must_use]
    pub const fn lost(peer_count: u64) -> Self {
        Self {
            avg_latency_ms: None,
            peer_count,
            probe_loss: true,
        }
    }

    /// Average round-trip latency over the window, if all probes returned
    #[must_use]
    pub const fn avg_latency_ms(&self) -> Option<i64> {
        self.avg_latency_ms
    }

    /// Latency for the record stream, with `-1` as the lost-window sentinel
    #[must_use]
    pub fn latency_record(&self) -> i64 {
        self.avg_latency_ms.unwrap_or(-1)
    }

    /// Connected peers at sampling time
    #[must_use]
    pub const fn peer_count(&self) -> u64 {
        self.peer_count
    }

    /// Whether the probe window lost a probe
    #[must_use]
    pub const fn probe_loss(&self) -> bool {
        self.probe_loss
    }
}

/// Thresholds driving the hysteresis decision.
///
/// The relax threshold is strictly below the restrict threshold; the band
/// between them is dead, holding whatever posture was last reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    latency_restrict_ms: i64,
    latency_relax_ms: i64,
    max_peers: u64,
}

impl Thresholds {
    /// Build a custom threshold set, rejecting pairs that would collapse
    /// the dead band.
    pub fn new(latency_restrict_ms: i64, latency_relax_ms: i64, max_peers: u64) -> Result<Self> {
        if latency_relax_ms >= latency_restrict_ms {
            return Err(CoreError::InvalidThresholds {
                restrict_ms: latency_restrict_ms,
                relax_ms: latency_relax_ms,
            });
        }
        Ok(Self {
            latency_restrict_ms,
            latency_relax_ms,
            max_peers,
        })
    }

    /// Latency above which an open node restricts itself
    #[must_use]
    pub const fn latency_restrict_ms(&self) -> i64 {
        self.latency_restrict_ms
    }

    /// Latency below which a restricted node reopens
    #[must_use]
    pub const fn latency_relax_ms(&self) -> i64 {
        self.latency_relax_ms
    }

    /// Peer-count ceiling
    #[must_use]
    pub const fn max_peers(&self) -> u64 {
        self.max_peers
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            latency_restrict_ms: LATENCY_RESTRICT_THRESHOLD_MS,
            latency_relax_ms: LATENCY_RELAX_THRESHOLD_MS,
            max_peers: MAX_PEER_COUNT,
        }
    }
}

/// Fold one sample into the current posture.
///
/// An open node restricts itself when *any* distress signal fires: a lost
/// probe, latency above the restrict threshold, or peer overflow. A
/// restricted node reopens only when *all* of them have recovered, with
/// latency below the (lower) relax threshold.
#[must_use]
pub fn next_posture(current: Posture, sample: &Sample, thresholds: &Thresholds) -> Posture {
    match current {
        Posture::Unrestricted => {
            let high_latency = sample
                .avg_latency_ms()
                .is_some_and(|ms| ms > thresholds.latency_restrict_ms());
            if sample.probe_loss() || high_latency || sample.peer_count() > thresholds.max_peers() {
                Posture::Restricted
            } else {
                Posture::Unrestricted
            }
        }
        Posture::Restricted => {
            let low_latency = sample
                .avg_latency_ms()
                .is_some_and(|ms| ms < thresholds.latency_relax_ms());
            if !sample.probe_loss() && low_latency && sample.peer_count() <= thresholds.max_peers() {
                Posture::Unrestricted
            } else {
                Posture::Restricted
            }
        }
    }
}

/// The admission state machine.
///
/// Starts out [`Posture::Unrestricted`]: the protective posture is only ever
/// a response to an observed sample, never a boot-time default, so operators
/// are not locked out by a restart.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    thresholds: Thresholds,
    posture: Posture,
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl AdmissionController {
    /// Create a controller in the open posture
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            posture: Posture::Unrestricted,
        }
    }

    /// Current posture
    #[must_use]
    pub const fn posture(&self) -> Posture {
        self.posture
    }

    /// Feed one sample; returns true when the posture changed
    pub fn observe(&mut self, sample: &Sample) -> bool {
        let next = next_posture(self.posture, sample, &self.thresholds);
        let changed = next != self.posture;
        self.posture = next;
        changed
    }
}
