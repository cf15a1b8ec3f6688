//! Namescout Core - Foundation crate for the Namescout availability scanner.
//!
//! This crate provides shared types, error handling and configuration
//! management that the other Namescout crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`Candidate`, `CandidateRules`, `Outcome`)
//!
//! # Example
//!
//! ```rust
//! use namescout_core::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let rules = config.rules()?;
//! assert!(rules.is_valid("a_1"));
//! assert!(!rules.is_valid(".ab"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, PacingConfig, ProbeConfig, ScanConfig, StorageConfig, CANDIDATE_PLACEHOLDER,
};
pub use error::{ConfigError, ConfigResult, NamescoutError, Result};
pub use types::{Alphabet, Candidate, CandidateRules, Outcome, DEFAULT_ALPHABET};
