#![doc = "tool-library-push-core: core logic for pushing CNC tool libraries to GitHub."]

//! This crate holds everything except the command-line surface: the data model and
//! traits, the publisher, the GitHub Contents API client, and the local catalog.
//!
//! # Usage
//! Build a [`publisher::RemoteJsonPublisher`] from a [`github::GitHubContentsClient`] and a
//! [`credentials::EnvCredentials`], then call [`push::push_library`] with a
//! [`catalog::DirectoryCatalog`].

pub mod catalog;
pub mod config;
pub mod contract;
pub mod credentials;
pub mod error;
pub mod github;
pub mod publisher;
pub mod push;

pub use error::PublishError;
