//! The monitoring loop.
//!
//! One cycle per interval: read the peer count, run a probe window, feed
//! the sample to the admission controller, and reconcile the node's filters
//! against the posture that came out. Nothing in a cycle is fatal: an
//! unreachable node degrades the sample and the reconciliation is retried
//! on the next cycle.

use std::time::Duration;
use swarmguard_client::{reconcile, NodeClient};
use swarmguard_core::{AdmissionController, AdmissionSpec, Posture, Sample, Thresholds};
use swarmguard_probe::{LatencyProbe, Sampler};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What one cycle observed and decided
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    /// The sample fed to the controller
    pub sample: Sample,
    /// Posture after the sample
    pub posture: Posture,
    /// Whether this cycle's sample flipped the posture
    pub posture_changed: bool,
}

/// Drives sampling, admission control and reconciliation on a fixed cadence
pub struct Monitor<P> {
    client: NodeClient,
    sampler: Sampler<P>,
    controller: AdmissionController,
    spec: AdmissionSpec,
    interval: Duration,
}

impl<P: LatencyProbe> Monitor<P> {
    /// Assemble a monitor; the controller starts in the open posture
    pub fn new(
        client: NodeClient,
        sampler: Sampler<P>,
        spec: AdmissionSpec,
        thresholds: Thresholds,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            sampler,
            controller: AdmissionController::new(thresholds),
            spec,
            interval,
        }
    }

    /// Run until the process receives SIGINT.
    ///
    /// Shutdown lands between cycles: a cycle in flight finishes its
    /// reconciliation pass before the loop exits.
    pub async fn run(&mut self) {
        // A crashed prior run may have left its protective filters behind;
        // converge onto the starting posture before the first sample.
        self.reconcile_posture().await;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, exiting");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    /// Run one monitoring cycle
    pub async fn run_cycle(&mut self) -> CycleReport {
        let peer_count = match self.client.swarm().peer_count().await {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "peer count unavailable, recording 0");
                0
            }
        };

        let sample = self.sampler.collect(peer_count).await;
        let posture_changed = self.controller.observe(&sample);
        let posture = self.controller.posture();

        if posture_changed {
            info!(%posture, "posture changed");
        }

        self.reconcile_posture().await;

        info!(
            avg_latency_ms = sample.latency_record(),
            peer_count = sample.peer_count(),
            posture_flag = posture.flag(),
            "cycle"
        );

        CycleReport {
            sample,
            posture,
            posture_changed,
        }
    }

    /// Converge the node's filters onto the current posture's desired set.
    /// Failures are logged and left for the next cycle.
    async fn reconcile_posture(&self) {
        let desired = self.spec.desired_filters(self.controller.posture());

        match reconcile(&self.client, &desired).await {
            Ok(result) if result.already_converged => {
                debug!("filters already converged");
            }
            Ok(result) => {
                info!(added = result.added, removed = result.removed, "filters reconciled");
            }
            Err(err) if err.is_unavailable() => {
                warn!(error = %err, "node unreachable, reconciliation deferred");
            }
            Err(err) => {
                warn!(error = %err, "reconciliation incomplete, retrying next cycle");
            }
        }
    }
}
