//! One complete backup run: aggregate, serialize, store.
//!
//! [`backup`] is the typed entrypoint; [`run_backup`] adapts its result to the
//! `{success, locator | error}` shape returned to whatever triggered the run.
//! Either the full CSV reaches the sink or the run reports failure.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::aggregate::{aggregate, SkippedCard};
use crate::contract::{BoardSource, Sink};
use crate::error::ExportError;
use crate::export::{export_file_name, export_rows};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct BackupReceipt {
    pub file_name: String,
    pub locator: String,
    pub rows: usize,
    pub skipped: Vec<SkippedCard>,
}

/// Result shape at the trigger boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackupOutcome {
    pub fn succeeded(locator: impl Into<String>) -> Self {
        Self {
            success: true,
            locator: Some(locator.into()),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            locator: None,
            error: Some(message.into()),
        }
    }
}

impl From<Result<BackupReceipt, ExportError>> for BackupOutcome {
    fn from(result: Result<BackupReceipt, ExportError>) -> Self {
        match result {
            Ok(receipt) => BackupOutcome::succeeded(receipt.locator),
            Err(e) => BackupOutcome::failed(e.to_string()),
        }
    }
}

pub async fn backup<S, K>(source: &S, sink: &K, now: DateTime<Utc>) -> Result<BackupReceipt, ExportError>
where
    S: BoardSource + ?Sized,
    K: Sink + ?Sized,
{
    let report = aggregate(source).await?;
    let file_name = export_file_name(now);
    let locator = export_rows(&report.rows, &file_name, sink).await?;

    Ok(BackupReceipt {
        file_name,
        locator,
        rows: report.rows.len(),
        skipped: report.skipped,
    })
}

/// Run a backup and report it in the boundary shape. Never returns an error.
pub async fn run_backup<S, K>(source: &S, sink: &K, now: DateTime<Utc>) -> BackupOutcome
where
    S: BoardSource + ?Sized,
    K: Sink + ?Sized,
{
    let result = backup(source, sink, now).await;
    match &result {
        Ok(receipt) => info!(
            file = %receipt.file_name,
            locator = %receipt.locator,
            rows = receipt.rows,
            skipped = receipt.skipped.len(),
            "[BACKUP] Backup complete"
        ),
        Err(e) => error!(error = %e, "[BACKUP][ERROR] Backup failed"),
    }
    result.into()
}
