#![doc = "GitHub Contents API implementation of the ContentStore trait."]
//
//! # GitHub store
//!
//! Wires [`ContentStore`] to `GET`/`PUT /repos/{owner}/{repo}/contents/{name}.json`.
//!
//! - Lookups send only the `accept` header; the repository is assumed readable without a token.
//! - Writes add `Authorization: Bearer <token>`.
//! - Statuses are handed back untouched; the publisher decides what they mean.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use tracing::{debug, error, info};

use crate::config::StoreConfig;
use crate::contract::{ContentStore, ResourceName, StoreResponse};
use crate::error::PublishError;

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("tool-library-push/", env!("CARGO_PKG_VERSION"));

pub struct GitHubContentsClient {
    client: Client,
    config: StoreConfig,
    base: Url,
}

impl GitHubContentsClient {
    pub fn new(config: StoreConfig) -> Result<Self, PublishError> {
        let base = Url::parse(&config.api_url).map_err(|e| {
            error!(error = ?e, api_url = %config.api_url, "Failed to parse store API URL");
            PublishError::InvalidApiUrl {
                url: config.api_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if base.cannot_be_a_base() {
            return Err(PublishError::InvalidApiUrl {
                url: config.api_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| {
                error!(error = ?source, "Failed to build HTTP client");
                PublishError::NetworkError {
                    url: config.api_url.clone(),
                    source,
                }
            })?;
        info!(
            api_url = %config.api_url,
            owner = %config.owner,
            repo = %config.repo,
            "Initialized GitHubContentsClient"
        );
        Ok(GitHubContentsClient {
            client,
            config,
            base,
        })
    }

    /// Full URL of the document for `name`; identical for lookup and write.
    ///
    /// Every part is pushed as a single path segment, so `#`, `?`, `%`, `/` and
    /// spaces in a name are percent-encoded instead of changing the URL's shape.
    pub fn document_url(&self, name: &ResourceName) -> Url {
        let mut url = self.base.clone();
        // `new` rejects bases that cannot carry a path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str(), "contents"])
                .push(&name.file_name());
        }
        url
    }
}

#[async_trait]
impl ContentStore for GitHubContentsClient {
    async fn get_document(&self, name: &ResourceName) -> Result<StoreResponse, PublishError> {
        let url = self.document_url(name);
        debug!(url = %url, "GET document");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|source| {
                error!(error = ?source, url = %url, "Lookup request failed");
                PublishError::NetworkError {
                    url: url.to_string(),
                    source,
                }
            })?;

        read_response(url.as_str(), response).await
    }

    async fn put_document(
        &self,
        name: &ResourceName,
        payload: String,
        token: &str,
    ) -> Result<StoreResponse, PublishError> {
        let url = self.document_url(name);
        debug!(url = %url, bytes = payload.len(), "PUT document");

        let response = self
            .client
            .put(url.clone())
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| {
                error!(error = ?source, url = %url, "Write request failed");
                PublishError::NetworkError {
                    url: url.to_string(),
                    source,
                }
            })?;

        read_response(url.as_str(), response).await
    }
}

async fn read_response(url: &str, response: Response) -> Result<StoreResponse, PublishError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|source| PublishError::NetworkError {
            url: url.to_string(),
            source,
        })?;
    debug!(url = %url, status, "Store responded");
    Ok(StoreResponse { status, body })
}
