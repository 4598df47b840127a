//! `load_config` module: Loads a static YAML config into the typed settings the CLI needs.
//!
//! # Responsibilities
//! - Parse the user-supplied YAML file into `CliConfig`
//! - Fill defaults for optional keys (API URL, commit message, token variable)
//! - Keep secrets out of the file: only the *name* of the token variable lives here,
//!   the token itself is read from the environment at push time
//!
//! # Errors
//! All errors use `anyhow::Error` and mention whether the file could not be read or parsed.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tool_library_push_core::config::{PublisherConfig, StoreConfig};
use tool_library_push_core::credentials::DEFAULT_TOKEN_ENV;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub store: StoreConfig,
    /// Directory holding the exported `*.json` tool libraries.
    pub library_dir: PathBuf,
    #[serde(default)]
    pub publish: PublisherConfig,
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

/// Loads a static YAML config file (no secrets).
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

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    config.store.trace_loaded();
    config.publish.trace_loaded();
    info!(
        library_dir = %config.library_dir.display(),
        token_env = %config.token_env,
        "Config loaded"
    );

    Ok(config)
}
