//! Single-shot latency probes via the system `ping`.

use async_trait::async_trait;
use regex::Regex;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::process::Command;
use tracing::trace;

/// A source of one round-trip latency measurement.
///
/// Implementations return `None` on any failure, including not answering
/// within `timeout`; they never error.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    /// Measure one round trip, in milliseconds
    async fn measure_latency(&self, timeout: Duration) -> Option<f64>;
}

/// Probe that spawns the system `ping` for each measurement
pub struct PingProbe {
    target: Ipv4Addr,
    time_pattern: Regex,
}

impl PingProbe {
    /// Create a probe against the given target address
    #[must_use]
    pub fn new(target: Ipv4Addr) -> Self {
        Self {
            target,
            time_pattern: Regex::new(r"time=([\d.]+) ms").expect("valid pattern"),
        }
    }

    /// Target address this probe measures against
    #[must_use]
    pub const fn target(&self) -> Ipv4Addr {
        self.target
    }
}

#[async_trait]
impl LatencyProbe for PingProbe {
    async fn measure_latency(&self, timeout: Duration) -> Option<f64> {
        // `ping -W` takes whole seconds.
        let timeout_secs = timeout.as_secs().max(1);

        let output = Command::new("ping")
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(timeout_secs.to_string())
            .arg(self.target.to_string())
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            trace!(target = %self.target, status = ?output.status, "probe did not return");
            return None;
        }

        parse_latency(&self.time_pattern, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the round-trip time from a `ping` output line
fn parse_latency(pattern: &Regex, output: &str) -> Option<f64> {
    pattern
        .captures(output)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        Regex::new(r"time=([\d.]+) ms").unwrap()
    }

    #[test]
    fn test_parse_latency_from_ping_output() {
        let output = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.\n\
                      64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=13.6 ms\n\n\
                      --- 8.8.8.8 ping statistics ---\n\
                      1 packets transmitted, 1 received, 0% packet loss, time 0ms\n";
        assert_eq!(parse_latency(&pattern(), output), Some(13.6));
    }

    #[test]
    fn test_parse_latency_integral_time() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=60 time=4 ms";
        assert_eq!(parse_latency(&pattern(), line), Some(4.0));
    }

    #[test]
    fn test_parse_latency_rejects_garbage() {
        assert_eq!(parse_latency(&pattern(), ""), None);
        assert_eq!(parse_latency(&pattern(), "Request timeout for icmp_seq 1"), None);
        assert_eq!(parse_latency(&pattern(), "time= ms"), None);
    }
}
