//! Probing workers and the pool that runs them.
//!
//! Workers never talk to each other. They share the candidate cursor, the
//! checkpoint marker, the results sink and the outcome counters, all of which
//! are safe under concurrent use.

use crate::checkpoint::Checkpointer;
use crate::error::{Result, ScanError};
use crate::sequence::SharedSequence;
use crate::sink::ResultSink;
use namescout_core::{Outcome, PacingConfig};
use namescout_probe::Prober;
use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Delays applied between probes and after rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after a blocked outcome
    pub cooldown: Duration,
    /// Lower bound of the random inter-probe delay
    pub delay_min: Duration,
    /// Upper bound of the random inter-probe delay
    pub delay_max: Duration,
}

impl Pacing {
    /// No delays at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            cooldown: Duration::ZERO,
            delay_min: Duration::ZERO,
            delay_max: Duration::ZERO,
        }
    }

    /// Random delay within `[delay_min, delay_max]`.
    #[must_use]
    pub fn inter_probe_delay(&self) -> Duration {
        if self.delay_max <= self.delay_min {
            return self.delay_min;
        }
        let min = u64::try_from(self.delay_min.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.delay_max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(config: &PacingConfig) -> Self {
        Self {
            cooldown: config.cooldown(),
            delay_min: Duration::from_millis(config.delay_min_ms),
            delay_max: Duration::from_millis(config.delay_max_ms),
        }
    }
}

/// Outcome counters shared by all workers.
#[derive(Debug, Default)]
pub struct ScanStats {
    available: AtomicU64,
    taken: AtomicU64,
    blocked: AtomicU64,
    unknown: AtomicU64,
    error: AtomicU64,
}

/// Point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub available: u64,
    pub taken: u64,
    pub blocked: u64,
    pub unknown: u64,
    pub error: u64,
}

impl OutcomeCounts {
    /// Number of probes issued.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.available + self.taken + self.blocked + self.unknown + self.error
    }
}

impl ScanStats {
    /// Count one outcome.
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Available => &self.available,
            Outcome::Taken => &self.taken,
            Outcome::Blocked => &self.blocked,
            Outcome::Unknown => &self.unknown,
            Outcome::Error => &self.error,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current counts.
    pub fn snapshot(&self) -> OutcomeCounts {
        OutcomeCounts {
            available: self.available.load(Ordering::Relaxed),
            taken: self.taken.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
        }
    }
}

/// Everything a worker needs, shared by the whole pool.
pub(crate) struct WorkerContext {
    pub sequence: Arc<SharedSequence>,
    pub prober: Arc<dyn Prober>,
    pub sink: Arc<ResultSink>,
    pub checkpointer: Arc<Checkpointer>,
    pub stats: Arc<ScanStats>,
    pub pacing: Pacing,
    pub shutdown: CancellationToken,
}

impl WorkerContext {
    /// Sleep for `duration` unless shutdown comes first.
    ///
    /// Returns `false` if the sleep was cut short by shutdown.
    async fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.shutdown.is_cancelled();
        }
        tokio::select! {
            () = self.shutdown.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }
}

/// Pull, probe and record until the sequence is exhausted or shutdown is
/// requested.
///
/// The checkpoint marker is moved to each candidate before it is probed, so a
/// candidate in flight during a crash counts as checked.
pub(crate) async fn run_worker(id: usize, ctx: Arc<WorkerContext>) -> Result<()> {
    tracing::debug!("Worker {} started", id);

    loop {
        if ctx.shutdown.is_cancelled() {
            tracing::debug!("Worker {} stopping on shutdown", id);
            return Ok(());
        }

        let Some(candidate) = ctx
            .sequence
            .pull_with(|c| ctx.checkpointer.progress().mark(c))
        else {
            tracing::debug!("Worker {} finished, candidates exhausted", id);
            return Ok(());
        };

        let outcome = ctx.prober.classify(&candidate).await;
        ctx.stats.record(outcome);

        match outcome {
            Outcome::Available => {
                if let Err(e) = ctx.sink.append(&candidate).await {
                    tracing::error!("Worker {} could not record {}: {}", id, candidate, e);
                    return Err(e);
                }
                ctx.checkpointer.persist().await;
                tracing::info!("[AVAILABLE] {}", candidate);
            }
            Outcome::Taken => {
                tracing::debug!("[TAKEN] {}", candidate);
            }
            Outcome::Blocked => {
                // The blocked candidate stays consumed; it is not retried
                tracing::warn!(
                    "[RATE LIMIT] {} blocked, worker {} cooling down for {:?}",
                    candidate,
                    id,
                    ctx.pacing.cooldown
                );
                if !ctx.pause(ctx.pacing.cooldown).await {
                    return Ok(());
                }
                continue;
            }
            Outcome::Unknown | Outcome::Error => {
                tracing::debug!("[{}] {}", outcome.to_string().to_uppercase(), candidate);
            }
        }

        if !ctx.pause(ctx.pacing.inter_probe_delay()).await {
            return Ok(());
        }
    }
}

/// Run `workers` workers to completion.
///
/// A worker that fails (results file unwritable) or panics cancels the rest
/// of the pool; the first such error is returned once every worker has
/// exited.
pub(crate) async fn run_pool(ctx: Arc<WorkerContext>, workers: usize) -> Result<()> {
    let mut set = JoinSet::new();
    for id in 0..workers {
        set.spawn(run_worker(id, Arc::clone(&ctx)));
    }

    let mut first_error = None;
    while let Some(joined) = set.join_next().await {
        let failure = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(e) => {
                tracing::error!("Worker task aborted: {}", e);
                ScanError::WorkerFailed(e.to_string())
            }
        };
        ctx.shutdown.cancel();
        first_error.get_or_insert(failure);
    }

    first_error.map_or(Ok(()), Err)
}
