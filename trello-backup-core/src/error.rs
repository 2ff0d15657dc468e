//! Error types for the export pipeline.

use thiserror::Error;

/// Failure of a single request against the Trello API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error for {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Trello returned HTTP {status} for {path}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    #[error("failed to decode response for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of an export run, or of one card within it.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to list boards: {0}")]
    Boards(#[source] FetchError),

    #[error("failed to fetch {stage} for board '{board}': {source}")]
    Board {
        board: String,
        stage: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("failed to fetch details for card '{card}': {source}")]
    Card {
        card: String,
        #[source]
        source: FetchError,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("sink rejected '{name}': {message}")]
    Sink { name: String, message: String },
}
