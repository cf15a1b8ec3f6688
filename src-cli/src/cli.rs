//! Command-line arguments.

use clap::Parser;
use namescout_core::AppConfig;
use std::path::PathBuf;

/// CLI entry point
#[derive(Parser, Debug, Default)]
#[command(name = "namescout", version)]
#[command(about = "Sweep short account names for availability, resuming where the last run stopped")]
pub struct Cli {
    /// Number of concurrent workers (overrides config)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Path to a TOML config file (defaults to the XDG config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Checkpoint file (overrides config)
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Results file available names are appended to (overrides config)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(threads) = self.threads {
            config.scan.threads = threads;
        }
        if let Some(path) = &self.checkpoint {
            config.storage.checkpoint_path.clone_from(path);
        }
        if let Some(path) = &self.output {
            config.storage.results_path.clone_from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["namescout"]).expect("parse");
        assert!(cli.threads.is_none());
        assert!(cli.config.is_none());

        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.scan.threads, 5);
    }

    #[test]
    fn test_threads_short_and_long() {
        let short = Cli::try_parse_from(["namescout", "-t", "12"]).expect("parse");
        let long = Cli::try_parse_from(["namescout", "--threads", "12"]).expect("parse");
        assert_eq!(short.threads, Some(12));
        assert_eq!(long.threads, Some(12));
    }

    #[test]
    fn test_rejects_non_numeric_threads() {
        assert!(Cli::try_parse_from(["namescout", "--threads", "many"]).is_err());
    }

    #[test]
    fn test_overrides_storage_paths() {
        let cli = Cli::try_parse_from([
            "namescout",
            "--checkpoint",
            "/tmp/ckpt.json",
            "--output",
            "/tmp/found.txt",
            "-t",
            "2",
        ])
        .expect("parse");

        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.scan.threads, 2);
        assert_eq!(config.storage.checkpoint_path, PathBuf::from("/tmp/ckpt.json"));
        assert_eq!(config.storage.results_path, PathBuf::from("/tmp/found.txt"));
    }
}
