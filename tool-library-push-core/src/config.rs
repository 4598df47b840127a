use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_COMMIT_MESSAGE: &str = "tool library push";

/// Coordinates of the single repository tool libraries are pushed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub owner: String,
    pub repo: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl StoreConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        StoreConfig {
            api_url: default_api_url(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            api_url = %self.api_url,
            owner = %self.owner,
            repo = %self.repo,
            "Loaded StoreConfig"
        );
    }
}

/// Behaviour of a single publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub commit_message: String,
    /// Treat a 404 on lookup as "create the file" instead of a failure.
    pub create_missing: bool,
    /// Emit per-step diagnostics (URLs, observed sha, response bodies). Set from the CLI.
    #[serde(skip)]
    pub debug: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        PublisherConfig {
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            create_missing: true,
            debug: false,
        }
    }
}

impl PublisherConfig {
    pub fn trace_loaded(&self) {
        info!(
            commit_message = %self.commit_message,
            create_missing = self.create_missing,
            debug = self.debug,
            "Loaded PublisherConfig"
        );
        debug!(?self, "PublisherConfig loaded (full debug)");
    }
}
