//! Poll scheduler.
//!
//! A [`PollScheduler`] owns one background task that runs a fetch →
//! normalize → filter → sort cycle immediately and then on a fixed
//! interval, publishing each outcome as a [`SyncStatus`] on a `watch`
//! channel.
//!
//! Every session carries a generation token. `stop` bumps the generation
//! under the status lock, so a cycle that was in flight when the scheduler
//! stopped sees a stale token and its result is dropped instead of applied.

mod status;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lotsync_core::{LotRecord, Pipeline};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::LotSource;
use crate::error::{FetchError, SchedulerError};

pub use status::{Snapshot, SyncStatus};

/// Runs a single fetch → normalize → filter → sort pass.
///
/// # Errors
///
/// Propagates the [`FetchError`] from `source`; an unrecognized body is
/// an empty list, not an error.
pub async fn run_cycle<S: LotSource>(
    source: &S,
    pipeline: &Pipeline,
) -> Result<Vec<LotRecord>, FetchError> {
    let body = source.fetch_lots().await?;
    Ok(pipeline.run(&body))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Polling,
    Stopped,
}

pub struct PollScheduler<S: LotSource> {
    source: Arc<S>,
    pipeline: Arc<Pipeline>,
    interval: Duration,
    generation: Arc<AtomicU64>,
    state: SchedulerState,
    status_tx: Arc<watch::Sender<SyncStatus>>,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl<S: LotSource> PollScheduler<S> {
    /// Creates an idle scheduler. A zero `interval` is raised to 1 ms.
    #[must_use]
    pub fn new(source: S, pipeline: Pipeline, interval: Duration) -> Self {
        let (status_tx, _) = watch::channel(SyncStatus::Loading);
        let (stop_tx, _) = watch::channel(false);
        Self {
            source: Arc::new(source),
            pipeline: Arc::new(pipeline),
            interval: interval.max(Duration::from_millis(1)),
            generation: Arc::new(AtomicU64::new(0)),
            state: SchedulerState::Idle,
            status_tx: Arc::new(status_tx),
            stop_tx,
            handle: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// A receiver that observes every status update, starting from the
    /// current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    /// The latest published status.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status_tx.borrow().clone()
    }

    /// Arms the scheduler: one cycle now, then one per interval.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyRunning`] if already started and
    /// [`SchedulerError::AlreadyStopped`] after [`PollScheduler::stop`].
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        match self.state {
            SchedulerState::Polling => return Err(SchedulerError::AlreadyRunning),
            SchedulerState::Stopped => return Err(SchedulerError::AlreadyStopped),
            SchedulerState::Idle => {}
        }

        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session = PollSession {
            source: Arc::clone(&self.source),
            pipeline: Arc::clone(&self.pipeline),
            interval: self.interval,
            generation: Arc::clone(&self.generation),
            token,
            status_tx: Arc::clone(&self.status_tx),
            stop_rx: self.stop_tx.subscribe(),
        };

        tracing::info!(interval = ?self.interval, "poll scheduler started");
        self.handle = Some(tokio::spawn(session.run()));
        self.state = SchedulerState::Polling;
        Ok(())
    }

    /// Disarms the timer and retires the current session.
    ///
    /// A cycle already in flight finishes its request, but its result is
    /// discarded. Calling `stop` more than once is harmless.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        let generation = &self.generation;
        self.status_tx.send_if_modified(|_| {
            generation.fetch_add(1, Ordering::SeqCst);
            false
        });
        self.stop_tx.send_replace(true);
        if self.state == SchedulerState::Polling {
            tracing::info!("poll scheduler stopped");
        }
        self.state = SchedulerState::Stopped;
    }

    /// Stops the scheduler and waits for its task to exit, including any
    /// in-flight request.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "poll task ended abnormally");
            }
        }
    }
}

impl<S: LotSource> Drop for PollScheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State moved into the spawned poll task.
struct PollSession<S: LotSource> {
    source: Arc<S>,
    pipeline: Arc<Pipeline>,
    interval: Duration,
    generation: Arc<AtomicU64>,
    token: u64,
    status_tx: Arc<watch::Sender<SyncStatus>>,
    stop_rx: watch::Receiver<bool>,
}

impl<S: LotSource> PollSession<S> {
    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        // A slow cycle pushes the next one back rather than bunching ticks.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.stop_rx.changed() => break,
                _ = ticker.tick() => {}
            }

            let outcome = run_cycle(self.source.as_ref(), &self.pipeline).await;
            if !self.apply(outcome) {
                tracing::debug!(token = self.token, "discarding result from retired poll session");
                break;
            }
        }
    }

    /// Publishes and logs `outcome` unless this session has been retired.
    /// Returns whether it was applied.
    fn apply(&self, outcome: Result<Vec<LotRecord>, FetchError>) -> bool {
        let mut applied = false;
        self.status_tx.send_if_modified(|status| {
            if self.generation.load(Ordering::SeqCst) != self.token {
                return false;
            }
            match &outcome {
                Ok(records) => tracing::info!(lots = records.len(), "poll cycle succeeded"),
                Err(e) => tracing::warn!(error = %e, "poll cycle failed"),
            }
            status.apply(outcome, Utc::now());
            applied = true;
            true
        });
        applied
    }
}
