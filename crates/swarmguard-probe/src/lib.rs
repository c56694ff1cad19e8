//! Latency probing and sample collection.
//!
//! [`PingProbe`] shells out to the system `ping` for a single round-trip
//! measurement; [`Sampler`] runs a window of probes and folds them into one
//! [`Sample`](swarmguard_core::Sample) for the admission controller. The
//! probe never fails loudly: any problem (timeout, non-zero exit,
//! unparseable output) is a lost probe.

mod probe;
mod sampler;

pub use probe::{LatencyProbe, PingProbe};
pub use sampler::{Sampler, SamplerConfig};
