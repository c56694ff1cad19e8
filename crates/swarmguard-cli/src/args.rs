//! Command-line argument definitions using clap.

use clap::Parser;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Network health monitor for a node's swarm admission
///
/// Samples latency and peer count on a fixed cadence and keeps the node's
/// swarm connection filters in step with the resulting posture: open
/// (blacklist only) or restricted (everything outside the whitelist).
#[derive(Parser, Debug)]
#[command(name = "swarmguard")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Node RPC endpoint (overrides the configuration file)
    #[arg(long, env = "SWARMGUARD_API_URL")]
    pub api_url: Option<String>,

    /// Address the latency probe pings (overrides the configuration file)
    #[arg(long)]
    pub probe_target: Option<Ipv4Addr>,

    /// Seconds between monitoring cycles (overrides the configuration file)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Directory for the rotated record stream
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Run a single monitoring cycle and exit
    #[arg(long)]
    pub once: bool,
}
