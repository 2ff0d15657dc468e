use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 200;

/// Connection settings for the Trello API. Secrets live in [`Credentials`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrelloConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minimum spacing between two dispatched requests.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_min_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL_MS
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl TrelloConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            min_interval_ms = self.min_interval_ms,
            "Loaded TrelloConfig"
        );
        debug!(?self, "TrelloConfig loaded (full debug)");
    }
}

/// API key/token pair. The token is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("token", &"<redacted>")
            .finish()
    }
}
