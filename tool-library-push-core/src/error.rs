use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a publish. HTTP-derived variants keep the store's status and body.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("tool library name must not be empty")]
    InvalidName,

    #[error("no bearer token available from {source_name}")]
    MissingCredential { source_name: String },

    #[error("request to {url} could not complete")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store API URL {url} is not usable: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("lookup of {name} failed with status {status}: {body}")]
    LookupFailure {
        name: String,
        status: u16,
        body: String,
    },

    #[error("write of {name} was not authorized (status {status}): {body}")]
    AuthError {
        name: String,
        status: u16,
        body: String,
    },

    #[error("write of {name} conflicts with the stored revision (status {status}): {body}")]
    WriteConflict {
        name: String,
        status: u16,
        body: String,
    },

    #[error("write of {name} failed with status {status}: {body}")]
    WriteFailure {
        name: String,
        status: u16,
        body: String,
    },

    #[error("could not handle {what} as JSON")]
    SerializationError {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("no tool library named {name} in {location}")]
    UnknownResource { name: String, location: String },

    #[error("tool library catalog at {path} is unreadable")]
    Catalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    /// HTTP status reported by the store, if the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::LookupFailure { status, .. }
            | PublishError::AuthError { status, .. }
            | PublishError::WriteConflict { status, .. }
            | PublishError::WriteFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body reported by the store, if the error came from one.
    pub fn body(&self) -> Option<&str> {
        match self {
            PublishError::LookupFailure { body, .. }
            | PublishError::AuthError { body, .. }
            | PublishError::WriteConflict { body, .. }
            | PublishError::WriteFailure { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Maps a rejected write to the most specific variant the status allows.
    pub(crate) fn from_write_status(name: &str, status: u16, body: String) -> Self {
        let name = name.to_string();
        match status {
            401 | 403 => PublishError::AuthError { name, status, body },
            // GitHub answers 409 for a stale sha and 422 when the sha is missing.
            409 | 422 => PublishError::WriteConflict { name, status, body },
            _ => PublishError::WriteFailure { name, status, body },
        }
    }
}
