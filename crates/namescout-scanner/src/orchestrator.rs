//! Scan orchestrator for a resumable availability sweep.
//!
//! This module provides the `ScanOrchestrator`, which resumes from the last
//! checkpoint, runs the worker pool against the shared candidate sequence,
//! keeps the checkpoint flushed in the background, and performs the final
//! save on every exit path.

use crate::checkpoint::{spawn_flush_loop, CheckpointStore, Checkpointer};
use crate::error::Result;
use crate::sequence::{CandidateSequence, SharedSequence};
use crate::sink::ResultSink;
use crate::worker::{run_pool, OutcomeCounts, Pacing, ScanStats, WorkerContext};
use chrono::{DateTime, Utc};
use namescout_core::{AppConfig, Candidate, CandidateRules, StorageConfig};
use namescout_probe::Prober;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default number of concurrent workers.
const DEFAULT_THREADS: usize = 5;

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the final checkpoint was written
    pub finished_at: DateTime<Utc>,
    /// Probe outcomes by kind
    pub counts: OutcomeCounts,
    /// Checkpoint value at exit
    pub last_checked: Option<Candidate>,
    /// Whether shutdown was requested before the sequence ran out
    pub interrupted: bool,
}

/// Orchestrates one sweep over the candidate space.
pub struct ScanOrchestrator {
    /// Candidate space to enumerate
    rules: CandidateRules,
    /// Remote availability check
    prober: Arc<dyn Prober>,
    /// Checkpoint and results locations
    storage: StorageConfig,
    /// Delays between probes
    pacing: Pacing,
    /// Number of concurrent workers
    threads: usize,
    /// Cancelled to request a graceful shutdown
    shutdown: CancellationToken,
}

impl ScanOrchestrator {
    /// Create a new orchestrator.
    #[must_use]
    pub fn new(
        rules: CandidateRules,
        prober: Arc<dyn Prober>,
        storage: StorageConfig,
        pacing: Pacing,
    ) -> Self {
        Self {
            rules,
            prober,
            storage,
            pacing,
            threads: DEFAULT_THREADS,
            shutdown: CancellationToken::new(),
        }
    }

    /// Create an orchestrator from a validated configuration.
    pub fn from_config(config: &AppConfig, prober: Arc<dyn Prober>) -> Result<Self> {
        config.validate()?;
        let rules = config.rules()?;
        Ok(Self::new(
            rules,
            prober,
            config.storage.clone(),
            Pacing::from(&config.pacing),
        )
        .with_threads(config.scan.threads))
    }

    /// Set the number of concurrent workers.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Token that requests a graceful shutdown when cancelled.
    ///
    /// Signal handlers cancel this; the run then stops pulling candidates,
    /// lets in-flight probes finish and writes the final checkpoint.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the sweep until the candidates are exhausted or shutdown is
    /// requested.
    ///
    /// Fails before probing anything if the results file cannot be opened.
    /// A results write failure during the run stops the pool and is returned
    /// after the final checkpoint save.
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();

        let sink = Arc::new(ResultSink::open(&self.storage.results_path).await?);
        tracing::info!("Recording discoveries to {}", sink.path().display());

        let store = CheckpointStore::new(&self.storage.checkpoint_path);
        let resume_after = match store.load().await {
            Ok(last) => last,
            Err(e) => {
                tracing::warn!(
                    "Could not read checkpoint {}: {}, starting from the beginning",
                    store.path().display(),
                    e
                );
                None
            }
        };
        match &resume_after {
            Some(last) => tracing::info!("Resuming after {}", last),
            None => tracing::info!("Starting from the first candidate"),
        }

        let sequence = CandidateSequence::resume_after(self.rules.clone(), resume_after.as_ref());
        let checkpointer = Arc::new(Checkpointer::new(store, resume_after));
        let flusher = spawn_flush_loop(Arc::clone(&checkpointer), self.storage.flush_interval());
        let stats = Arc::new(ScanStats::default());

        let ctx = Arc::new(WorkerContext {
            sequence: Arc::new(SharedSequence::new(sequence)),
            prober: Arc::clone(&self.prober),
            sink,
            checkpointer,
            stats: Arc::clone(&stats),
            pacing: self.pacing,
            shutdown: self.shutdown.child_token(),
        });

        tracing::info!("Starting {} workers", self.threads);
        let pool_result = run_pool(ctx, self.threads).await;

        let last_checked = flusher.stop_and_flush().await;
        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            counts: stats.snapshot(),
            last_checked,
            interrupted: self.shutdown.is_cancelled(),
        };

        pool_result?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use namescout_core::Outcome;

    struct NeverProber;

    #[async_trait]
    impl Prober for NeverProber {
        async fn classify(&self, _candidate: &Candidate) -> Outcome {
            Outcome::Unknown
        }
    }

    fn orchestrator() -> ScanOrchestrator {
        ScanOrchestrator::new(
            CandidateRules::default(),
            Arc::new(NeverProber),
            StorageConfig::default(),
            Pacing::none(),
        )
    }

    #[test]
    fn test_thread_count() {
        assert_eq!(orchestrator().threads, DEFAULT_THREADS);
        assert_eq!(orchestrator().with_threads(0).threads, 1);
        assert_eq!(orchestrator().with_threads(12).threads, 12);
    }

    #[test]
    fn test_shutdown_token_is_shared() {
        let orchestrator = orchestrator();
        orchestrator.shutdown_token().cancel();
        assert!(orchestrator.shutdown.is_cancelled());
    }
}
