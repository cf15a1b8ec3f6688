//! Append-only log of discovered candidates.

use crate::error::{Result, ScanError};
use namescout_core::Candidate;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Results file, one discovered candidate per line.
///
/// Opened once in append mode for the whole run; existing lines are never
/// rewritten. Appends from different workers are serialized.
#[derive(Debug)]
pub struct ResultSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl ResultSink {
    /// Open (or create) the results file for appending.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| sink_error(&path, source))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Results file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one candidate and make it durable before returning.
    pub async fn append(&self, candidate: &Candidate) -> Result<()> {
        let line = format!("{candidate}\n");
        let mut file = self.file.lock().await;

        file.write_all(line.as_bytes())
            .await
            .map_err(|source| sink_error(&self.path, source))?;
        file.flush()
            .await
            .map_err(|source| sink_error(&self.path, source))?;
        file.sync_data()
            .await
            .map_err(|source| sink_error(&self.path, source))?;

        Ok(())
    }
}

fn sink_error(path: &Path, source: std::io::Error) -> ScanError {
    ScanError::Sink {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_writes_lines() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("available.txt");
        let sink = ResultSink::open(&path).await.expect("open sink");

        sink.append(&Candidate::new("a")).await.expect("append");
        sink.append(&Candidate::new("bb")).await.expect("append");

        let contents = std::fs::read_to_string(&path).expect("read results");
        assert_eq!(contents, "a\nbb\n");
    }

    #[tokio::test]
    async fn test_reopen_appends_without_truncating() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("available.txt");

        let sink = ResultSink::open(&path).await.expect("open sink");
        sink.append(&Candidate::new("a")).await.expect("append");
        drop(sink);

        let sink = ResultSink::open(&path).await.expect("reopen sink");
        sink.append(&Candidate::new("b")).await.expect("append");

        let contents = std::fs::read_to_string(&path).expect("read results");
        assert_eq!(contents, "a\nb\n");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_never_interleave() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("available.txt");
        let sink = Arc::new(ResultSink::open(&path).await.expect("open sink"));

        let mut tasks = Vec::new();
        for worker in 0..8 {
            let sink = Arc::clone(&sink);
            tasks.push(tokio::spawn(async move {
                for i in 0..25 {
                    let candidate = Candidate::new(format!("w{worker}_{i}"));
                    sink.append(&candidate).await.expect("append");
                }
            }));
        }
        for task in tasks {
            task.await.expect("append task");
        }

        let contents = std::fs::read_to_string(&path).expect("read results");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|l| l.starts_with('w') && l.contains('_')));
    }

    #[tokio::test]
    async fn test_open_in_missing_directory_fails() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("missing").join("available.txt");

        let err = ResultSink::open(&path).await.expect_err("open should fail");
        assert!(matches!(err, ScanError::Sink { .. }));
    }
}
