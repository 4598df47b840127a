//! This module implements the CLI interface for tool-library-push: command parsing and
//! the glue from a parsed command to the core push flow.
//!
//! All publishing logic lives in the [`tool-library-push-core`] crate. This module only
//! wires configuration, the catalog, credentials and the notifier together.
//!
//! ## Commands
//! - `list`: print the tool libraries found in the configured library directory
//! - `push --library <name>`: publish one library to the configured repository
//!
//! `--debug` is global: it raises log verbosity and switches on per-step diagnostics in
//! the publisher.
//!
//! [`tool-library-push-core`]: ../../tool-library-push-core/

use crate::load_config::load_config;
use crate::notify::ConsoleNotifier;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tool_library_push_core::catalog::DirectoryCatalog;
use tool_library_push_core::contract::{Catalog, UserNotifier};
use tool_library_push_core::credentials::EnvCredentials;
use tool_library_push_core::github::GitHubContentsClient;
use tool_library_push_core::publisher::RemoteJsonPublisher;
use tool_library_push_core::push::{push_library, report};

/// CLI for tool-library-push: publish local CNC tool libraries to GitHub.
#[derive(Parser)]
#[clap(
    name = "tool-library-push",
    version,
    about = "Push a local CNC tool library to a GitHub repository as JSON"
)]
pub struct Cli {
    /// Verbose logging and per-step publish diagnostics
    #[clap(long, global = true)]
    pub debug: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tool libraries available for pushing
    List {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Push one tool library to the configured repository
    Push {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Name of the tool library (file stem in the library directory)
        #[clap(long)]
        library: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::List { config } => {
            let config = load_config(config)?;
            let catalog = DirectoryCatalog::new(config.library_dir);
            let names = match catalog.list_names() {
                Ok(names) => names,
                Err(e) => {
                    tracing::error!(command = "list", error = %e, "Listing failed");
                    ConsoleNotifier.failed(&e);
                    return Err(anyhow::Error::new(e));
                }
            };
            tracing::info!(command = "list", count = names.len(), "Listed tool libraries");
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Push { config, library } => {
            let config = load_config(config)?;
            tracing::info!(command = "push", library = %library, "Starting push");

            let mut publish_config = config.publish.clone();
            publish_config.debug = cli.debug;

            let result = match GitHubContentsClient::new(config.store.clone()) {
                Ok(store) => {
                    let credentials = EnvCredentials::new(config.token_env.clone());
                    let publisher = RemoteJsonPublisher::new(store, credentials, publish_config);
                    let catalog = DirectoryCatalog::new(config.library_dir.clone());
                    push_library(&catalog, &publisher, &library).await
                }
                Err(e) => Err(e),
            };
            report(&ConsoleNotifier, &result);

            match result {
                Ok(outcome) => {
                    tracing::info!(command = "push", status = outcome.status, "Push complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "push", error = %e, "Push failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
