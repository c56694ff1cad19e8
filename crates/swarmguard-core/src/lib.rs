//! Core types and admission logic for the swarmguard network monitor.
//!
//! This crate holds everything that can be reasoned about without I/O:
//!
//! - **[`Cidr`]**: a canonical IPv4 address range with prefix-tree splitting
//! - **Range algebra**: [`algebra::complement`] computes the block set that
//!   realizes a whitelist/blacklist policy over the full IPv4 space
//! - **Admission control**: the hysteresis state machine deciding between
//!   the [`Posture::Unrestricted`] and [`Posture::Restricted`] postures
//! - **[`AdmissionSpec`]**: the static whitelist/blacklist configuration and
//!   the desired filter set it implies under each posture

pub mod admission;
pub mod algebra;
pub mod cidr;
mod error;
pub mod spec;

pub use admission::{AdmissionController, Posture, Sample, Thresholds};
pub use cidr::Cidr;
pub use error::{CoreError, Result};
pub use spec::AdmissionSpec;
