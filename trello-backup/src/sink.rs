#![doc = "Local directory sink: persists the CSV export on the filesystem."]
//
//! # Local Directory Sink
//!
//! Implements [`trello_backup_core::contract::Sink`] for a plain directory. The
//! payload is written to a temporary file inside the target directory and then
//! atomically renamed to its final name, so a failed write never leaves a
//! partial export behind.
//!
//! - Construct [`LocalDirSink`] from the `sink` section of the YAML config.
//! - The returned locator is a `file://` URL of the persisted export.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

use trello_backup_core::contract::{Sink, SinkError};

pub struct LocalDirSink {
    output_dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Blocking filesystem work, run off the async executor.
    fn write_atomically(output_dir: &Path, name: &str, payload: &[u8]) -> Result<PathBuf, SinkError> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            tracing::error!(error = ?e, path = %output_dir.display(), "Failed to create output directory");
            e
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(output_dir)?;
        tmp.write_all(payload)?;
        tmp.as_file().sync_all()?;

        let target = output_dir.join(name);
        tmp.persist(&target).map_err(|e| {
            tracing::error!(error = ?e.error, path = %target.display(), "Failed to persist export file");
            e.error
        })?;

        Ok(std::fs::canonicalize(&target).unwrap_or(target))
    }
}

#[async_trait]
impl Sink for LocalDirSink {
    async fn store(&self, name: &str, payload: Vec<u8>) -> Result<String, SinkError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(format!("invalid export file name: {name:?}").into());
        }

        tracing::info!(
            file = name,
            bytes = payload.len(),
            output_dir = %self.output_dir.display(),
            "Writing export to local directory"
        );
        let output_dir = self.output_dir.clone();
        let file_name = name.to_string();
        let path = tokio::task::spawn_blocking(move || {
            Self::write_atomically(&output_dir, &file_name, &payload)
        })
        .await??;
        let locator = format!("file://{}", path.display());
        tracing::info!(locator = %locator, "Export written");
        Ok(locator)
    }
}
