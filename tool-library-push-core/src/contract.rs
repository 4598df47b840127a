//! # contract: types and seams for publishing tool libraries
//!
//! This module defines the plain data moved through a publish and the traits the
//! publisher depends on:
//! - [`ContentStore`]: the remote, versioned document store (GitHub Contents API in production)
//! - [`Catalog`]: the local source of tool libraries
//! - [`CredentialSource`]: supplies the bearer token at publish time
//! - [`UserNotifier`]: surfaces the final outcome to whoever pressed the button
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`, so tests can script the store and the
//!   catalog without a network or a filesystem.
//!
//! ## Versioning
//! - The store assigns an opaque `sha` on every write. A write must present the sha
//!   last observed for that document or the store rejects it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::automock;

use crate::error::PublishError;

/// Logical name of a tool library. Identifies both the local asset and the remote `<name>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName(String);

impl ResourceName {
    /// Rejects empty (or whitespace-only) names.
    pub fn new(name: impl Into<String>) -> Result<Self, PublishError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PublishError::InvalidName);
        }
        Ok(ResourceName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the remote document, unencoded. The store encodes it as one path segment.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One publish invocation: the library name and its serialized JSON.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub name: ResourceName,
    /// Passed through opaquely; the publisher never inspects its structure.
    pub content: String,
}

/// The store's view of a document, as returned by a successful lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDocument {
    #[serde(default)]
    pub name: String,
    /// Base64 text as delivered by the store.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
}

/// JSON body of a write. Field order matters to anyone diffing request logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WritePayload {
    pub message: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Raw status and body of a store call; interpretation is left to the publisher.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub status: u16,
    pub body: String,
}

impl StoreResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub name: String,
    pub status: u16,
    /// Sha the store assigned to the new revision, when it reported one.
    pub sha: Option<String>,
    pub body: serde_json::Value,
}

/// Remote document store with read-with-version and conditional-write semantics.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the current document. Non-2xx statuses are returned, not raised.
    async fn get_document(&self, name: &ResourceName) -> Result<StoreResponse, PublishError>;

    /// Overwrite (or create) the document with a serialized [`WritePayload`].
    async fn put_document(
        &self,
        name: &ResourceName,
        payload: String,
        token: &str,
    ) -> Result<StoreResponse, PublishError>;
}

/// Local collection of tool libraries.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Catalog: Send + Sync {
    /// Names available for publishing, sorted.
    fn list_names(&self) -> Result<Vec<String>, PublishError>;

    /// JSON text of the named library.
    fn serialize(&self, name: &str) -> Result<String, PublishError>;
}

/// Supplies the bearer token used for writes. Read on every call, never cached.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait CredentialSource: Send + Sync {
    /// Where the token comes from, for diagnostics.
    fn describe(&self) -> String;

    fn token(&self) -> Option<String>;
}

/// Receives the terminal outcome of a publish.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait UserNotifier {
    fn published(&self, outcome: &PublishOutcome);

    fn failed(&self, error: &PublishError);
}
