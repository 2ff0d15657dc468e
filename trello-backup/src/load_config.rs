/// `load_config` module: Loads a static YAML config and injects Trello secrets from the environment.
///
/// This module is the only place where untrusted YAML is parsed and mapped to strongly-typed structs.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into [`CliConfig`]
/// - Inject `TRELLO_KEY` / `TRELLO_TOKEN` from the environment (never from the file)
/// - Reject settings the pipeline cannot run with, with a message naming the cause
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use trello_backup_core::config::{Credentials, TrelloConfig};

pub const KEY_ENV: &str = "TRELLO_KEY";
pub const TOKEN_ENV: &str = "TRELLO_TOKEN";

#[derive(Debug)]
pub struct CliConfig {
    pub trello: TrelloConfig,
    pub sink: SinkSection,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkSection {
    Local { output_dir: PathBuf },
}

impl Default for SinkSection {
    fn default() -> Self {
        SinkSection::Local {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Loads a static YAML config file (no secrets) and injects required env vars for secrets.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    #[derive(Debug, Deserialize)]
    struct RawConfig {
        #[serde(default)]
        trello: TrelloConfig,
        #[serde(default)]
        sink: SinkSection,
    }

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if raw.trello.min_interval_ms == 0 {
        error!("trello.min_interval_ms must be greater than zero");
        anyhow::bail!("trello.min_interval_ms must be greater than zero");
    }

    let credentials = Credentials::new(required_env(KEY_ENV)?, required_env(TOKEN_ENV)?);
    raw.trello.trace_loaded();

    Ok(CliConfig {
        trello: raw.trello,
        sink: raw.sink,
        credentials,
    })
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            info!(var = name, "Secret found in env");
            Ok(value)
        }
        Ok(_) => {
            error!(var = name, "Environment variable is empty");
            Err(anyhow::anyhow!("{name} environment variable is empty"))
        }
        Err(e) => {
            error!(error = ?e, var = name, "Environment variable not set");
            Err(anyhow::anyhow!("{name} environment variable not set: {e}"))
        }
    }
}
