use std::process::ExitCode;

use clap::Parser;
use tool_library_push::cli::{run, Cli};
use tool_library_push_core::PublishError;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    match run(cli).await {
        Ok(()) => {
            tracing::info!("CLI completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            // Publish errors have already been shown by the notifier.
            if e.downcast_ref::<PublishError>().is_none() {
                eprintln!("Error: {e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
