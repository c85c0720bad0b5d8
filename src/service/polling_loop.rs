use std::time::Duration;

use tokio::sync::watch;

use super::{LoopStats, wait_for_shutdown};
use crate::data_source::SampleSource;
use crate::processing::{LuminosityEstimator, Percent, RawSample};
use crate::reporter::Reporter;

/// Sample value used for a cycle whose read failed
pub const DEGRADED_SAMPLE: RawSample = 0;

/// Sample, convert, report, sleep; until shutdown or the cycle limit
pub struct PollingLoop {
    source: Box<dyn SampleSource>,
    estimator: LuminosityEstimator,
    reporter: Box<dyn Reporter>,
    interval: Duration,
    max_cycles: Option<u64>,
    stats: LoopStats,
}

impl PollingLoop {
    pub fn new(
        source: Box<dyn SampleSource>,
        estimator: LuminosityEstimator,
        reporter: Box<dyn Reporter>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            estimator,
            reporter,
            interval,
            max_cycles: None,
            stats: LoopStats::new(),
        }
    }

    /// Stop after `max_cycles` cycles instead of running until shutdown
    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    fn limit_reached(&self) -> bool {
        self.max_cycles
            .is_some_and(|max_cycles| self.stats.cycles >= max_cycles)
    }

    /// Run cycles until the shutdown flag is raised or the cycle limit is hit
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> LoopStats {
        tracing::info!(
            "Polling {} every {:?}, reporting to {}",
            self.source.name(),
            self.interval,
            self.reporter.name()
        );

        while !*shutdown.borrow() && !self.limit_reached() {
            self.run_cycle().await;

            if self.limit_reached() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    tracing::info!("Received shutdown signal");
                    break;
                }
            }
        }

        if self.stats.is_clean() {
            tracing::info!("Polling loop finished after {} cycles", self.stats.cycles);
        } else {
            tracing::warn!(
                "Polling loop finished: {} cycles, {} delivered, {} read failures, {} send failures",
                self.stats.cycles,
                self.stats.delivered(),
                self.stats.read_failures,
                self.stats.send_failures
            );
        }

        self.stats
    }

    /// Run one sample and report cycle, returning the reported percentage
    ///
    /// Failures are logged and counted; they never abort the loop.
    pub async fn run_cycle(&mut self) -> Percent {
        let raw = self.read_sample().await;
        let percent = self.estimator.compute_percent(raw);

        tracing::debug!("Sample: raw={}, luminosity={}%", raw, percent);

        if let Err(e) = self.reporter.report(percent).await {
            tracing::error!("Failed to report luminosity: {}", e);
            self.stats.send_failures += 1;
        }

        self.stats.cycles += 1;
        percent
    }

    async fn read_sample(&mut self) -> RawSample {
        match self.source.read_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Sample read failed, using {}: {}", DEGRADED_SAMPLE, e);
                self.stats.read_failures += 1;
                DEGRADED_SAMPLE
            }
        }
    }
}

#[cfg(test)]
impl PollingLoop {
    fn stats(&self) -> LoopStats {
        self.stats
    }
}
