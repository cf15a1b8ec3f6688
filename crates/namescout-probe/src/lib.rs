//! Remote availability probing.
//!
//! Provides the [`Prober`] seam used by the worker pool and an HTTP
//! implementation that rotates the client identity per request.

pub mod client;
pub mod error;
pub mod identity;

pub use client::{build_probe_url, outcome_for_status, HttpProber, Prober};
pub use error::{ProbeError, Result};
pub use identity::IdentityPool;
