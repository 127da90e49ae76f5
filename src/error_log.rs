//! Best-effort persistence of per-address verification errors.
//!
//! Writers never fail the caller: a write error is reported through
//! `tracing` together with the entry that could not be stored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

pub const ERROR_LOG_FILE: &str = "errors.log";

#[async_trait]
pub trait ErrorLog: Send + Sync {
    async fn log_error(&self, email: &str, message: &str);
}

/// Emits each entry as a `warn` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLog;

#[async_trait]
impl ErrorLog for TracingErrorLog {
    async fn log_error(&self, email: &str, message: &str) {
        tracing::warn!(target: "mailprobe::errors", %email, "{message}");
    }
}

/// Appends `[timestamp] [email] message` lines to `<dir>/errors.log`.
#[derive(Debug, Clone)]
pub struct FileErrorLog {
    path: PathBuf,
}

impl FileErrorLog {
    /// Creates `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(ERROR_LOG_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, entry: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}

pub(crate) fn format_entry(email: &str, message: &str) -> String {
    let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    format!("[{now}] [{email}] {message}\n")
}

#[async_trait]
impl ErrorLog for FileErrorLog {
    async fn log_error(&self, email: &str, message: &str) {
        let entry = format_entry(email, message);
        if let Err(err) = self.append(&entry).await {
            tracing::error!(
                path = %self.path.display(),
                error = %err,
                original = entry.trim_end(),
                "could not write to error log"
            );
        }
    }
}
