//! Lifecycle and scheduler loop of the `system` input.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::emitter::{gather_once, report_cycle};
use super::sample::SampleQueue;
use super::INPUT_NAME;
use crate::core::config::CollectorConfig;
use crate::error::{Result, SysgatherError};
use crate::platform::{HostSource, MetricSource};

/// Periodically samples host load, CPU count, uptime and logged-in users.
///
/// `start` spawns one background task on the current Tokio runtime; `stop` signals it
/// and returns immediately. Ticks never overlap: each cycle runs after the previous
/// cycle and its sleep have finished.
pub struct SystemStats<S = HostSource> {
    config: CollectorConfig,
    interval: Duration,
    /// Moved into the loop task on start
    source: Option<S>,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl SystemStats<HostSource> {
    pub fn new(config: CollectorConfig, default_interval: Duration) -> Self {
        Self::with_source(config, default_interval, HostSource::new())
    }
}

impl<S: MetricSource + 'static> SystemStats<S> {
    pub fn with_source(config: CollectorConfig, default_interval: Duration, source: S) -> Self {
        if config.print_configs {
            log::info!("{} input config: {:?}", INPUT_NAME, config);
        }

        let interval = config.interval(default_interval);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            interval,
            source: Some(source),
            shutdown_tx,
            handle: None,
        }
    }

    /// Effective tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the scheduler loop writing to `queue`. Fails if already started.
    pub fn start(&mut self, queue: SampleQueue) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SysgatherError::NoRuntime(e.to_string()))?;
        let source = self
            .source
            .take()
            .ok_or_else(|| SysgatherError::already_started(INPUT_NAME))?;

        let shutdown = self.shutdown_tx.subscribe();
        self.handle = Some(runtime.spawn(loop_gather(
            source,
            self.config.collect_user_number,
            self.interval,
            queue,
            shutdown,
        )));

        log::debug!("{} input started, interval {:?}", INPUT_NAME, self.interval);
        Ok(())
    }

    /// Request loop termination. Idempotent; does not wait for the loop to exit.
    pub fn stop(&self) {
        if self.shutdown_tx.send_replace(true) {
            log::trace!("{} input already stopping", INPUT_NAME);
        }
    }

    /// Whether the loop task has been spawned and has not exited yet.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the loop task to exit. Returns immediately if it was never started.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::error!("{} loop task failed: {}", INPUT_NAME, e);
            }
        }
    }
}

async fn loop_gather<S: MetricSource + 'static>(
    source: S,
    collect_user_number: bool,
    interval: Duration,
    queue: SampleQueue,
    mut shutdown: watch::Receiver<bool>,
) {
    // Shared with the blocking pool; a panicking cycle leaves it unlocked
    let source = Arc::new(Mutex::new(source));

    loop {
        if *shutdown.borrow_and_update() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            // Stop signaled, or the owning collector was dropped
            _ = shutdown.changed() => break,
        }

        let outcome = gather_once(&source, collect_user_number, &queue).await;
        report_cycle(&outcome);
    }

    log::debug!("{} input stopped", INPUT_NAME);
}
