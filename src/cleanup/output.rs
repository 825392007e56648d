//! Where surfaced command output goes.

use super::action::CleanupAction;
use super::executor::{CommandOutcome, CommandStatus};
use std::io::Write;

/// Receives the outcome of every command whose output policy says it
/// should be shown, in batch order.
pub trait OutputReporter: Send + Sync {
    fn report(&self, action: &CleanupAction, outcome: &CommandOutcome);
}

/// Emits surfaced output as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl OutputReporter for TracingReporter {
    fn report(&self, action: &CleanupAction, outcome: &CommandOutcome) {
        if outcome.succeeded() {
            tracing::info!(
                action = action.id(),
                "{}\n{}",
                outcome.command_line,
                outcome.stdout.trim_end()
            );
        } else {
            tracing::warn!(
                action = action.id(),
                "{} ({})\n{}{}",
                outcome.command_line,
                outcome.status,
                outcome.stdout,
                outcome.stderr.trim_end()
            );
        }
    }
}

/// Prints surfaced output on the terminal, like an output window would.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn render(action: &CleanupAction, outcome: &CommandOutcome) -> String {
        let mut text = format!(
            "== {} [{}]\n$ {}\n",
            action.clean_title(),
            outcome.working_dir.display(),
            outcome.command_line
        );
        text.push_str(&outcome.stdout);
        if !outcome.stdout.is_empty() && !outcome.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&outcome.stderr);
        if !outcome.stderr.is_empty() && !outcome.stderr.ends_with('\n') {
            text.push('\n');
        }
        match &outcome.status {
            CommandStatus::Exited(status) if status.success() => {}
            status => text.push_str(&format!("-- {status}\n")),
        }
        text
    }
}

impl OutputReporter for ConsoleReporter {
    fn report(&self, action: &CleanupAction, outcome: &CommandOutcome) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(Self::render(action, outcome).as_bytes()) {
            tracing::debug!("Could not print command output: {}", e);
        }
    }
}
