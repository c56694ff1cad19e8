//! Configuration loading.
//!
//! Configuration problems are never fatal: a missing or malformed file
//! falls back to the built-in defaults with a warning, and an individual
//! CIDR entry that does not parse is skipped the same way.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use swarmguard_core::{AdmissionSpec, Cidr, Thresholds};
use tracing::warn;

const fn default_interval_secs() -> u64 {
    60
}

fn default_api_url() -> String {
    String::from("http://127.0.0.1:5001")
}

const fn default_probe_target() -> Ipv4Addr {
    Ipv4Addr::new(8, 8, 8, 8)
}

/// Monitor configuration file contents
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node RPC endpoint
    pub api_url: String,

    /// Address the latency probe pings
    pub probe_target: Ipv4Addr,

    /// Seconds between monitoring cycles
    pub interval_secs: u64,

    /// Whitelist/blacklist policy
    pub filters: FilterConfig,

    /// Hysteresis thresholds
    pub thresholds: ThresholdConfig,
}

/// Whitelist/blacklist ranges, as CIDR strings.
///
/// The whitelist distinguishes "absent" (use the built-in loopback and
/// private ranges) from explicitly empty (block the whole space when
/// restricted).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub whitelist: Option<Vec<String>>,
    pub blacklist: Vec<String>,
}

/// Threshold overrides for the admission controller
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub latency_restrict_ms: i64,
    pub latency_relax_ms: i64,
    pub max_peers: u64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            latency_restrict_ms: swarmguard_core::admission::LATENCY_RESTRICT_THRESHOLD_MS,
            latency_relax_ms: swarmguard_core::admission::LATENCY_RELAX_THRESHOLD_MS,
            max_peers: swarmguard_core::admission::MAX_PEER_COUNT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            probe_target: default_probe_target(),
            interval_secs: default_interval_secs(),
            filters: FilterConfig::default(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

impl Config {
    /// The default config file location, e.g.
    /// `~/.config/swarmguard/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "swarmguard", "swarmguard")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration, falling back to the defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    warn!("no config directory available, using built-in defaults");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using built-in defaults");
            return Self::default();
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config unreadable, using built-in defaults");
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config malformed, using built-in defaults");
                Self::default()
            }
        }
    }

    /// Build the admission spec from the configured filter lists.
    ///
    /// An absent whitelist means the built-in loopback and private ranges.
    pub fn admission_spec(&self) -> AdmissionSpec {
        let whitelist = match &self.filters.whitelist {
            Some(entries) => parse_ranges(entries, "whitelist"),
            None => AdmissionSpec::builtin_defaults().whitelist().clone(),
        };
        let blacklist = parse_ranges(&self.filters.blacklist, "blacklist");

        AdmissionSpec::new(whitelist, blacklist)
    }

    /// Build the controller thresholds, falling back to the defaults when
    /// the configured pair would defeat hysteresis
    pub fn thresholds(&self) -> Thresholds {
        match Thresholds::new(
            self.thresholds.latency_restrict_ms,
            self.thresholds.latency_relax_ms,
            self.thresholds.max_peers,
        ) {
            Ok(thresholds) => thresholds,
            Err(err) => {
                warn!(error = %err, "ignoring configured thresholds");
                Thresholds::default()
            }
        }
    }
}

/// Parse CIDR strings, skipping (with a warning) anything invalid
fn parse_ranges(entries: &[String], list: &str) -> BTreeSet<Cidr> {
    entries
        .iter()
        .filter_map(|entry| match entry.parse() {
            Ok(cidr) => Some(cidr),
            Err(err) => {
                warn!(list, entry = %entry, error = %err, "skipping unparseable range");
                None
            }
        })
        .collect()
}
