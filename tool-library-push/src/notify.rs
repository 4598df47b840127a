use std::error::Error;
use std::io::Write;

use tool_library_push_core::contract::{PublishOutcome, UserNotifier};
use tool_library_push_core::PublishError;

/// Prints push outcomes to the terminal: success on stdout, failures with their full cause chain on stderr.
pub struct ConsoleNotifier;

impl UserNotifier for ConsoleNotifier {
    fn published(&self, outcome: &PublishOutcome) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", success_message(outcome));
    }

    fn failed(&self, error: &PublishError) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", failure_message(error));
    }
}

pub fn success_message(outcome: &PublishOutcome) -> String {
    match &outcome.sha {
        Some(sha) => format!(
            "Pushed tool library {} (status {}, sha {})",
            outcome.name, outcome.status, sha
        ),
        None => format!(
            "Pushed tool library {} (status {})",
            outcome.name, outcome.status
        ),
    }
}

pub fn failure_message(error: &PublishError) -> String {
    let mut message = format!("Failed:\n{error}");
    let mut cause = error.source();
    while let Some(e) = cause {
        message.push_str(&format!("\n  caused by: {e}"));
        cause = e.source();
    }
    message
}
