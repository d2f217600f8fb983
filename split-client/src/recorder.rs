//! Exchange capture: persists each prompt/response pair for offline inspection.
//!
//! Every exchange becomes two sibling files in the capture directory,
//! `<YYYYMMDD_HHMMSS>_request.txt` and `<YYYYMMDD_HHMMSS>_response.txt`.
//! Names have one-second resolution, so two exchanges within the same second
//! overwrite each other.

use crate::error::RecorderError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Timestamp pattern of capture file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A prompt and the text it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    /// When the exchange completed.
    pub timestamp: DateTime<Local>,
    /// Prompt text sent to the model.
    pub prompt: String,
    /// Text returned by the model.
    pub response: String,
}

impl ExchangeRecord {
    /// Records an exchange that completed now.
    #[must_use]
    pub fn now(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            prompt: prompt.into(),
            response: response.into(),
        }
    }

    /// File name prefix shared by the request and response files.
    #[must_use]
    pub fn stem(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Paths written for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFiles {
    /// `<stem>_request.txt`.
    pub request: PathBuf,
    /// `<stem>_response.txt`.
    pub response: PathBuf,
}

/// Writes exchanges into a capture directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct ExchangeRecorder {
    dir: PathBuf,
}

impl ExchangeRecorder {
    /// Creates a recorder for `dir`. Nothing touches the filesystem yet.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The capture directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `record` as a request file and a response file.
    ///
    /// # Errors
    ///
    /// Returns a [`RecorderError`] if the directory cannot be created or
    /// either file cannot be written.
    pub async fn record(&self, record: &ExchangeRecord) -> Result<CapturedFiles, RecorderError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| RecorderError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let stem = record.stem();
        let files = CapturedFiles {
            request: self.dir.join(format!("{stem}_request.txt")),
            response: self.dir.join(format!("{stem}_response.txt")),
        };

        write_file(&files.request, &record.prompt).await?;
        write_file(&files.response, &record.response).await?;

        tracing::info!(
            event = "exchange_captured",
            stem = %stem,
            dir = %self.dir.display(),
            "Captured: {stem}"
        );
        Ok(files)
    }

    /// Records an exchange and swallows any failure with a warning.
    ///
    /// Capture is a debugging aid; it never fails the call it observes.
    pub async fn record_best_effort(&self, prompt: &str, response: &str) {
        let record = ExchangeRecord::now(prompt, response);
        if let Err(e) = self.record(&record).await {
            tracing::warn!(
                event = "exchange_capture_failed",
                dir = %self.dir.display(),
                error = %e,
                "capture failed: {e}"
            );
        }
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), RecorderError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| RecorderError::Write {
            path: path.to_path_buf(),
            source,
        })
}
