//! Rate-limited access to the Trello REST API.
//!
//! Every outbound request passes through a single [`AdmissionLane`]. The lane
//! admits one caller per interval and hands out admission in the order callers
//! arrived, no matter how many fetches are in flight concurrently. Failures are
//! surfaced unchanged; nothing here retries.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error};

use crate::config::{Credentials, TrelloConfig};
use crate::error::FetchError;

/// Single-lane admission queue enforcing a minimum spacing between dispatches.
///
/// Waiters queue on a fair (FIFO) async mutex; the holder sleeps until its slot
/// opens and books the next slot before releasing the lock.
#[derive(Debug)]
pub struct AdmissionLane {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl AdmissionLane {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for this caller's turn. Returns the instant the caller was admitted.
    pub async fn admit(&self) -> Instant {
        let mut next_slot = self.next_slot.lock().await;
        if let Some(slot) = *next_slot {
            sleep_until(slot).await;
        }
        let admitted = Instant::now();
        *next_slot = Some(admitted + self.interval);
        admitted
    }
}

/// HTTP client for the Trello API, throttled by an [`AdmissionLane`].
#[derive(Debug)]
pub struct RateLimitedClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    lane: AdmissionLane,
}

impl RateLimitedClient {
    pub fn new(config: &TrelloConfig, credentials: Credentials) -> Self {
        Self::with_http_client(Client::new(), config, credentials)
    }

    pub fn with_http_client(http: Client, config: &TrelloConfig, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            lane: AdmissionLane::new(config.min_interval()),
        }
    }

    pub fn lane(&self) -> &AdmissionLane {
        &self.lane
    }

    /// GET `path` (relative to the base URL) and decode the JSON body.
    ///
    /// `query` is appended alongside the key/token pair. The returned error
    /// carries the path only, never the credentials.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        self.lane.admit().await;
        debug!(path, "Dispatching Trello request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[
                ("key", self.credentials.key.as_str()),
                ("token", self.credentials.token.as_str()),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, path, "Trello API returned error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source: source.without_url(),
            })?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            path: path.to_string(),
            source,
        })
    }
}
