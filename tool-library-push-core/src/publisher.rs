//! Publishes one tool library to the remote store: look up the current sha, encode, write.
//!
//! # Flow
//! `Idle -> FetchingVersion -> Encoding -> Writing -> {Succeeded | Failed}`
//!   - The credential is resolved first; a missing token fails before any network call
//!   - The lookup sends no Authorization header
//!   - A 404 lookup means "create" when [`PublisherConfig::create_missing`] is set; any
//!     other non-200 lookup aborts without writing
//!   - The write carries the sha from the lookup, or none when creating
//!
//! # Error Handling
//! There are no retries. Any failure returns immediately with a [`PublishError`] that
//! preserves the store's status and body where one exists.
//!
//! # Concurrency
//! The two calls are awaited in sequence. Two publishes of the same name can race;
//! the store's sha check rejects the loser with a conflict.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, error, info};

use crate::config::PublisherConfig;
use crate::contract::{
    ContentStore, CredentialSource, PublishOutcome, PublishRequest, RemoteDocument,
    ResourceName, WritePayload,
};
use crate::error::PublishError;

/// Step of a publish, reported as the `stage` field on tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Idle,
    FetchingVersion,
    Encoding,
    Writing,
    Succeeded,
    Failed,
}

impl PublishStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStage::Idle => "idle",
            PublishStage::FetchingVersion => "fetching_version",
            PublishStage::Encoding => "encoding",
            PublishStage::Writing => "writing",
            PublishStage::Succeeded => "succeeded",
            PublishStage::Failed => "failed",
        }
    }
}

pub struct RemoteJsonPublisher<S, C> {
    store: S,
    credentials: C,
    config: PublisherConfig,
}

impl<S, C> RemoteJsonPublisher<S, C>
where
    S: ContentStore,
    C: CredentialSource,
{
    pub fn new(store: S, credentials: C, config: PublisherConfig) -> Self {
        Self {
            store,
            credentials,
            config,
        }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub async fn publish(&self, request: PublishRequest) -> Result<PublishOutcome, PublishError> {
        let name = request.name.clone();
        info!(name = %name, stage = PublishStage::Idle.as_str(), "Starting publish");

        match self.run(request).await {
            Ok(outcome) => {
                info!(
                    name = %name,
                    status = outcome.status,
                    sha = outcome.sha.as_deref().unwrap_or("-"),
                    stage = PublishStage::Succeeded.as_str(),
                    "Publish succeeded"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(
                    name = %name,
                    error = %e,
                    stage = PublishStage::Failed.as_str(),
                    "Publish failed"
                );
                Err(e)
            }
        }
    }

    async fn run(&self, request: PublishRequest) -> Result<PublishOutcome, PublishError> {
        let token = match self.credentials.token() {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(PublishError::MissingCredential {
                    source_name: self.credentials.describe(),
                })
            }
        };

        let sha = self.fetch_version(&request.name).await?;

        self.trace(&request.name, PublishStage::Encoding, "Encoding content");
        let payload = WritePayload {
            message: self.config.commit_message.clone(),
            content: encode_content(&request.content),
            sha,
        };
        let payload = serde_json::to_string(&payload).map_err(|source| {
            PublishError::SerializationError {
                what: "write payload",
                source,
            }
        })?;

        self.trace(&request.name, PublishStage::Writing, "Writing document");
        let response = self
            .store
            .put_document(&request.name, payload, &token)
            .await?;

        if self.config.debug {
            info!(
                name = %request.name,
                status = response.status,
                body = %response.body,
                "Write response"
            );
        }

        if !response.is_success() {
            return Err(PublishError::from_write_status(
                request.name.as_str(),
                response.status,
                response.body,
            ));
        }

        // Best-effort: the store's success body is not validated.
        let body = serde_json::from_str::<serde_json::Value>(&response.body)
            .unwrap_or(serde_json::Value::String(response.body));
        let sha = body
            .get("content")
            .and_then(|c| c.get("sha"))
            .and_then(|s| s.as_str())
            .map(str::to_string);

        Ok(PublishOutcome {
            name: request.name.to_string(),
            status: response.status,
            sha,
            body,
        })
    }

    /// Returns the sha to present on write, or `None` when the document will be created.
    async fn fetch_version(&self, name: &ResourceName) -> Result<Option<String>, PublishError> {
        self.trace(name, PublishStage::FetchingVersion, "Looking up current revision");
        let response = self.store.get_document(name).await?;

        match response.status {
            200 => {
                let document: RemoteDocument =
                    serde_json::from_str(&response.body).map_err(|source| {
                        PublishError::SerializationError {
                            what: "lookup response",
                            source,
                        }
                    })?;
                match document.sha {
                    Some(sha) => {
                        if self.config.debug {
                            info!(name = %name, sha = %sha, "Found current revision");
                        }
                        Ok(Some(sha))
                    }
                    None => Err(PublishError::LookupFailure {
                        name: name.to_string(),
                        status: response.status,
                        body: response.body,
                    }),
                }
            }
            404 if self.config.create_missing => {
                info!(name = %name, "No remote document yet, it will be created");
                Ok(None)
            }
            status => Err(PublishError::LookupFailure {
                name: name.to_string(),
                status,
                body: response.body,
            }),
        }
    }

    fn trace(&self, name: &ResourceName, stage: PublishStage, message: &str) {
        if self.config.debug {
            info!(name = %name, stage = stage.as_str(), "{message}");
        } else {
            debug!(name = %name, stage = stage.as_str(), "{message}");
        }
    }
}

/// Standard padded base64 of the content's UTF-8 bytes.
pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}
