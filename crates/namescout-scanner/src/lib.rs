//! Namescout Scanner - resumable availability sweep.
//!
//! This crate enumerates candidates in a fixed order, probes them with a pool
//! of concurrent workers, appends available ones to a results file, and
//! checkpoints progress so an interrupted run picks up where it stopped.
//!
//! # Features
//!
//! - Deterministic enumeration that resumes from a single remembered value
//! - Concurrent workers sharing one cursor with no duplicates or gaps
//! - Cooldown on rate limiting and randomized pacing between probes
//! - Atomic checkpoint replacement, flushed periodically and on shutdown
//!
//! # Example
//!
//! ```rust,ignore
//! use namescout_core::AppConfig;
//! use namescout_probe::HttpProber;
//! use namescout_scanner::ScanOrchestrator;
//! use std::sync::Arc;
//!
//! let config = AppConfig::default();
//! let prober = Arc::new(HttpProber::new(&config.probe)?);
//! let orchestrator = ScanOrchestrator::from_config(&config, prober)?;
//!
//! let summary = orchestrator.run().await?;
//! println!("{} available", summary.counts.available);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod checkpoint;
#[allow(missing_docs)]
pub mod error;
pub mod orchestrator;
pub mod sequence;
pub mod sink;
#[allow(missing_docs)]
pub mod worker;

// Re-export commonly used types
pub use checkpoint::{
    spawn_flush_loop, CheckpointStore, Checkpointer, FlushHandle, Progress, StagedCheckpoint,
};
pub use error::{CheckpointError, Result, ScanError};
pub use orchestrator::{RunSummary, ScanOrchestrator};
pub use sequence::{CandidateSequence, SharedSequence};
pub use sink::ResultSink;
pub use worker::{OutcomeCounts, Pacing, ScanStats};
