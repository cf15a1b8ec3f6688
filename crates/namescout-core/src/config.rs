//! Configuration management for Namescout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Alphabet, CandidateRules, DEFAULT_ALPHABET};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder replaced by the candidate in [`ProbeConfig::url_template`].
pub const CANDIDATE_PLACEHOLDER: &str = "{candidate}";

/// Main application configuration.
///
/// This is loaded from `~/.config/namescout/config.toml` (or platform
/// equivalent) unless an explicit path is given. Missing sections and fields
/// take their default values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Candidate space and pool size
    pub scan: ScanConfig,
    /// Remote probe settings
    pub probe: ProbeConfig,
    /// Delays between probes and after rate limiting
    pub pacing: PacingConfig,
    /// Checkpoint and results file locations
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the XDG config directory, falling back to
    /// defaults if the file does not exist.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration (explicit path or XDG default) with environment
    /// variable overrides applied.
    ///
    /// Supports the following environment variables:
    /// - `NAMESCOUT_THREADS`: Override the worker pool size
    /// - `NAMESCOUT_MAX_LEN`: Override the maximum candidate length
    /// - `NAMESCOUT_COOLDOWN_SECS`: Override the rate-limit cooldown
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(threads) = lookup("NAMESCOUT_THREADS").and_then(|v| v.parse().ok()) {
            self.scan.threads = threads;
            tracing::debug!("Override scan.threads from env: {}", threads);
        }

        if let Some(max_len) = lookup("NAMESCOUT_MAX_LEN").and_then(|v| v.parse().ok()) {
            self.scan.max_len = max_len;
            tracing::debug!("Override scan.max_len from env: {}", max_len);
        }

        if let Some(secs) = lookup("NAMESCOUT_COOLDOWN_SECS").and_then(|v| v.parse().ok()) {
            self.pacing.cooldown_secs = secs;
            tracing::debug!("Override pacing.cooldown_secs from env: {}", secs);
        }
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        self.rules()?;

        if self.scan.threads == 0 {
            return Err(invalid("scan.threads", "must be at least 1"));
        }
        if !self.probe.url_template.contains(CANDIDATE_PLACEHOLDER) {
            return Err(invalid(
                "probe.url_template",
                format!("must contain {CANDIDATE_PLACEHOLDER}"),
            ));
        }
        if self.probe.timeout_secs == 0 {
            return Err(invalid("probe.timeout_secs", "must be at least 1"));
        }
        if self.probe.user_agents.is_empty() {
            return Err(invalid("probe.user_agents", "must not be empty"));
        }
        if self.pacing.delay_min_ms > self.pacing.delay_max_ms {
            return Err(invalid(
                "pacing.delay_min_ms",
                format!(
                    "{} exceeds delay_max_ms {}",
                    self.pacing.delay_min_ms, self.pacing.delay_max_ms
                ),
            ));
        }
        if self.storage.flush_interval_secs == 0 {
            return Err(invalid("storage.flush_interval_secs", "must be at least 1"));
        }

        Ok(())
    }

    /// Build the candidate rules described by the `[scan]` section.
    pub fn rules(&self) -> ConfigResult<CandidateRules> {
        let alphabet = Alphabet::new(&self.scan.alphabet)
            .map_err(|e| invalid("scan.alphabet", e.to_string()))?;
        CandidateRules::new(alphabet, self.scan.min_len, self.scan.max_len)
            .map_err(|e| invalid("scan.min_len", e.to_string()))
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/namescout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "namescout", "namescout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Candidate space and pool size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Characters candidates are drawn from, in enumeration order
    pub alphabet: String,
    /// Shortest candidate length
    pub min_len: usize,
    /// Longest candidate length
    pub max_len: usize,
    /// Number of concurrent workers
    pub threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            min_len: 1,
            max_len: 4,
            threads: 5,
        }
    }
}

/// Remote probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// URL with a `{candidate}` placeholder
    pub url_template: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agents picked from at random, one per request
    pub user_agents: Vec<String>,
}

impl ProbeConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url_template: "https://www.instagram.com/{candidate}/".to_string(),
            timeout_secs: 10,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
                "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0)".to_string(),
                "Mozilla/5.0 (Linux; Android 11)".to_string(),
            ],
        }
    }
}

/// Delays between probes and after rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after a blocked outcome, in seconds
    pub cooldown_secs: u64,
    /// Lower bound of the random inter-probe delay, in milliseconds
    pub delay_min_ms: u64,
    /// Upper bound of the random inter-probe delay, in milliseconds
    pub delay_max_ms: u64,
}

impl PacingConfig {
    /// Cooldown as a `Duration`.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 90,
            delay_min_ms: 800,
            delay_max_ms: 1500,
        }
    }
}

/// Checkpoint and results file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Checkpoint file (JSON, replaced atomically)
    pub checkpoint_path: PathBuf,
    /// Results file (append-only, one candidate per line)
    pub results_path: PathBuf,
    /// Interval of the background checkpoint flush, in seconds
    pub flush_interval_secs: u64,
}

impl StorageConfig {
    /// Flush interval as a `Duration`.
    #[must_use]
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            checkpoint_path: PathBuf::from(".namescout_checkpoint.json"),
            results_path: PathBuf::from("available.txt"),
            flush_interval_secs: 5,
        }
    }
}
