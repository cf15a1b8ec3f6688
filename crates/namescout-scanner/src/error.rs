use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("results file {path}: {source}")]
    Sink {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] namescout_core::ConfigError),

    #[error("worker task failed: {0}")]
    WorkerFailed(String),
}

/// Checkpoint persistence errors.
///
/// These never abort a run; call sites log them and carry on.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_names_path() {
        let err = ScanError::Sink {
            path: "available.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "no space left"),
        };
        assert!(err.to_string().starts_with("results file available.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
