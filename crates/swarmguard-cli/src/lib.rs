//! # swarmguard-cli
//!
//! Daemon wiring for the swarmguard network health monitor: argument
//! parsing, configuration, logging and the monitor loop.

pub mod args;
pub mod config;
pub mod logging;
pub mod monitor;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use swarmguard_client::NodeClient;
use swarmguard_probe::{PingProbe, Sampler, SamplerConfig};
use tracing::info;

use args::Args;
use config::Config;
use monitor::Monitor;

/// Entry point for the `swarmguard` binary
pub async fn run() -> Result<()> {
    let args = Args::parse();

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _guard = logging::init(&log_dir)?;

    let mut config = Config::load_or_default(args.config.as_deref());
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(probe_target) = args.probe_target {
        config.probe_target = probe_target;
    }
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }

    info!(
        api_url = %config.api_url,
        probe_target = %config.probe_target,
        interval_secs = config.interval_secs,
        log_dir = %log_dir.display(),
        "swarmguard starting"
    );

    let client = NodeClient::builder().base_url(&config.api_url).build();
    let sampler = Sampler::with_config(
        PingProbe::new(config.probe_target),
        SamplerConfig::default(),
    );
    let mut monitor = Monitor::new(
        client,
        sampler,
        config.admission_spec(),
        config.thresholds(),
        Duration::from_secs(config.interval_secs),
    );

    if args.once {
        monitor.run_cycle().await;
        return Ok(());
    }

    monitor.run().await;
    Ok(())
}
