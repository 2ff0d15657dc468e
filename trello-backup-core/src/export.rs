//! CSV serialization of export rows and hand-off to a [`Sink`].

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::contract::Sink;
use crate::error::ExportError;
use crate::row::{ExportRow, COLUMNS};

pub const FILE_PREFIX: &str = "trello_export";

/// Payload name for an export taken at `now`: `trello_export_YYYY-MM-DD.csv`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("{FILE_PREFIX}_{}.csv", now.format("%Y-%m-%d"))
}

/// Serialize `rows` under the fixed [`COLUMNS`] header.
///
/// Every record has exactly one value per column: [`ExportRow::values`] is
/// sized by [`COLUMNS`], and the non-flexible writer rejects any other length.
pub fn rows_to_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for row in rows {
        writer.write_record(row.values())?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

/// Serialize `rows` and store them in `sink` under `name`. Returns the locator.
pub async fn export_rows<K>(rows: &[ExportRow], name: &str, sink: &K) -> Result<String, ExportError>
where
    K: Sink + ?Sized,
{
    let payload = rows_to_csv(rows)?;
    info!(file = name, rows = rows.len(), bytes = payload.len(), "[EXPORT] Storing CSV payload");

    match sink.store(name, payload).await {
        Ok(locator) => {
            info!(file = name, locator = %locator, "[EXPORT] Sink accepted payload");
            Ok(locator)
        }
        Err(e) => {
            error!(file = name, error = %e, "[EXPORT][ERROR] Sink rejected payload");
            Err(ExportError::Sink {
                name: name.to_string(),
                message: e.to_string(),
            })
        }
    }
}
