//! Crash-safe checkpoint persistence.
//!
//! The checkpoint is the last candidate handed to a worker. It lives in
//! memory as [`Progress`] and on disk as a small JSON record that is always
//! replaced atomically: the new record is written to a temporary sibling,
//! synced, then renamed over the canonical file. A crash at any point leaves
//! either the old record or the new one, never a torn write.

use crate::error::CheckpointError;
use namescout_core::Candidate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::MutexGuard;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// On-disk checkpoint format.
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRecord {
    last: Option<Candidate>,
}

/// Durable store for the checkpoint file.
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    /// Serializes writers within this process so they never share a temp file
    write_lock: tokio::sync::Mutex<()>,
}

impl CheckpointStore {
    /// Create a store for the given canonical path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Canonical checkpoint path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the last checkpointed candidate.
    ///
    /// A missing file means no run has checkpointed yet and yields `None`.
    pub async fn load(&self) -> Result<Option<Candidate>, CheckpointError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let record: CheckpointRecord = serde_json::from_str(&contents)?;
                Ok(record.last)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically replace the checkpoint with `last`.
    pub async fn save(&self, last: Option<&Candidate>) -> Result<(), CheckpointError> {
        self.stage(last).await?.commit().await
    }

    /// Atomically replace the checkpoint with the value `current` returns.
    ///
    /// `current` runs after the write lock is taken, so concurrent savers
    /// publish their values in the order they read them.
    pub async fn save_with<F>(&self, current: F) -> Result<Option<Candidate>, CheckpointError>
    where
        F: FnOnce() -> Option<Candidate>,
    {
        let staged = self.stage_with(current).await?;
        let last = staged.last.clone();
        staged.commit().await?;
        Ok(last)
    }

    /// Write `last` to the temporary file without publishing it.
    ///
    /// The canonical file is untouched until [`StagedCheckpoint::commit`]
    /// runs. Other writers wait until the staged value is committed or
    /// dropped.
    pub async fn stage(
        &self,
        last: Option<&Candidate>,
    ) -> Result<StagedCheckpoint<'_>, CheckpointError> {
        self.stage_with(|| last.cloned()).await
    }

    async fn stage_with<F>(&self, current: F) -> Result<StagedCheckpoint<'_>, CheckpointError>
    where
        F: FnOnce() -> Option<Candidate>,
    {
        let guard = self.write_lock.lock().await;
        let temp_path = self.temp_path();

        let record = CheckpointRecord { last: current() };
        let contents = serde_json::to_vec(&record)?;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(&contents).await?;
        file.flush().await?;
        file.sync_all().await?;

        Ok(StagedCheckpoint {
            temp_path,
            target: &self.path,
            last: record.last,
            _guard: guard,
        })
    }
}

/// A checkpoint written to its temporary file but not yet published.
#[derive(Debug)]
pub struct StagedCheckpoint<'a> {
    temp_path: PathBuf,
    target: &'a Path,
    last: Option<Candidate>,
    _guard: MutexGuard<'a, ()>,
}

impl StagedCheckpoint<'_> {
    /// Publish the staged record by renaming it over the canonical file.
    pub async fn commit(self) -> Result<(), CheckpointError> {
        tokio::fs::rename(&self.temp_path, self.target).await?;
        Ok(())
    }
}

/// In-memory "last observed candidate" marker shared by all workers.
#[derive(Debug, Default)]
pub struct Progress {
    last: Mutex<Option<Candidate>>,
}

impl Progress {
    /// Start from a previously persisted value.
    pub fn new(initial: Option<Candidate>) -> Self {
        Self {
            last: Mutex::new(initial),
        }
    }

    /// Record `candidate` as the most recently observed.
    pub fn mark(&self, candidate: &Candidate) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last = Some(candidate.clone());
    }

    /// Current value.
    pub fn snapshot(&self) -> Option<Candidate> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Pairs the in-memory marker with its durable store.
#[derive(Debug)]
pub struct Checkpointer {
    store: CheckpointStore,
    progress: Progress,
}

impl Checkpointer {
    /// Create a checkpointer seeded with the value loaded at startup.
    pub fn new(store: CheckpointStore, initial: Option<Candidate>) -> Self {
        Self {
            store,
            progress: Progress::new(initial),
        }
    }

    /// The shared marker.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// The durable store.
    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Save the current marker, logging instead of failing.
    ///
    /// Returns whether the save succeeded.
    pub async fn persist(&self) -> bool {
        match self.store.save_with(|| self.progress.snapshot()).await {
            Ok(snapshot) => {
                tracing::trace!("Checkpoint saved at {:?}", snapshot);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to save checkpoint to {}: {}",
                    self.store.path().display(),
                    e
                );
                false
            }
        }
    }
}

/// Handle to the background flush task.
///
/// Consumed by [`FlushHandle::stop_and_flush`], so the final save runs at
/// most once per handle.
#[derive(Debug)]
pub struct FlushHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
    checkpointer: Arc<Checkpointer>,
}

/// Start saving the checkpoint every `interval` until stopped.
pub fn spawn_flush_loop(checkpointer: Arc<Checkpointer>, interval: Duration) -> FlushHandle {
    let token = CancellationToken::new();
    let task_token = token.clone();
    let task_checkpointer = Arc::clone(&checkpointer);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                () = task_token.cancelled() => break,
                _ = ticker.tick() => {
                    task_checkpointer.persist().await;
                }
            }
        }
        tracing::debug!("Checkpoint flush loop stopped");
    });

    FlushHandle {
        token,
        task,
        checkpointer,
    }
}

impl FlushHandle {
    /// Stop the periodic task, then save one final time.
    ///
    /// Returns the value that was persisted.
    pub async fn stop_and_flush(self) -> Option<Candidate> {
        self.token.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Checkpoint flush task ended abnormally: {}", e);
        }

        self.checkpointer.persist().await;
        self.checkpointer.progress().snapshot()
    }
}
