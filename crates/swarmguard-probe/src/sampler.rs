//! Collecting one probe window into a [`Sample`].

use crate::probe::LatencyProbe;
use std::time::Duration;
use swarmguard_core::Sample;
use tokio::time::sleep;
use tracing::debug;

/// Probe window configuration
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Probes averaged per window
    pub sample_count: usize,

    /// Timeout per probe
    pub probe_timeout: Duration,

    /// Pause between consecutive probes
    pub probe_pause: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_count: 10,
            probe_timeout: Duration::from_secs(2),
            probe_pause: Duration::from_secs(1),
        }
    }
}

/// Runs a window of sequential probes and averages them.
///
/// A single lost probe anywhere in the window marks the whole sample as
/// lost and short-circuits the remaining probes.
pub struct Sampler<P> {
    probe: P,
    config: SamplerConfig,
}

impl<P: LatencyProbe> Sampler<P> {
    /// Create a sampler with the default window configuration
    pub fn new(probe: P) -> Self {
        Self::with_config(probe, SamplerConfig::default())
    }

    /// Create a sampler with a custom window configuration
    pub fn with_config(probe: P, config: SamplerConfig) -> Self {
        Self { probe, config }
    }

    /// Run one probe window, attaching the given peer count to the sample
    pub async fn collect(&self, peer_count: u64) -> Sample {
        let count = self.config.sample_count.max(1);
        let mut total = 0.0;

        for i in 0..count {
            if i > 0 {
                sleep(self.config.probe_pause).await;
            }

            match self.probe.measure_latency(self.config.probe_timeout).await {
                Some(latency_ms) => total += latency_ms,
                None => {
                    debug!(probe = i + 1, of = count, "probe lost, abandoning window");
                    return Sample::lost(peer_count);
                }
            }
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let avg = (total / count as f64) as i64;
        Sample::measured(avg, peer_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed script of probe results and counts invocations
    struct ScriptedProbe {
        script: Mutex<Vec<Option<f64>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedProbe {
        fn new(script: Vec<Option<f64>>) -> Self {
            let mut script = script;
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LatencyProbe for ScriptedProbe {
        async fn measure_latency(&self, _timeout: Duration) -> Option<f64> {
            *self.calls.lock().unwrap() += 1;
            self.script.lock().unwrap().pop().expect("script exhausted")
        }
    }

    fn quick_config(sample_count: usize) -> SamplerConfig {
        SamplerConfig {
            sample_count,
            probe_timeout: Duration::from_secs(2),
            probe_pause: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_collect_averages_the_window() {
        let probe = ScriptedProbe::new(vec![Some(10.0), Some(20.0), Some(30.0)]);
        let sampler = Sampler::with_config(probe, quick_config(3));

        let sample = sampler.collect(42).await;
        assert_eq!(sample.avg_latency_ms(), Some(20));
        assert_eq!(sample.peer_count(), 42);
        assert!(!sample.probe_loss());
    }

    #[tokio::test]
    async fn test_collect_truncates_fractional_average() {
        let probe = ScriptedProbe::new(vec![Some(10.9), Some(10.9)]);
        let sampler = Sampler::with_config(probe, quick_config(2));

        let sample = sampler.collect(0).await;
        assert_eq!(sample.avg_latency_ms(), Some(10));
    }

    #[tokio::test]
    async fn test_lost_probe_short_circuits_the_window() {
        let probe = ScriptedProbe::new(vec![Some(10.0), None, Some(10.0), Some(10.0)]);
        let sampler = Sampler::with_config(probe, quick_config(4));

        let sample = sampler.collect(7).await;
        assert!(sample.probe_loss());
        assert_eq!(sample.avg_latency_ms(), None);
        assert_eq!(sample.latency_record(), -1);
        assert_eq!(sample.peer_count(), 7);
        // The window stopped at the lost probe.
        assert_eq!(sampler.probe.calls(), 2);
    }
}
