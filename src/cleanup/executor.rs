//! Running a cleanup action against a selection.

use super::action::{CleanupAction, OutputWindowPolicy};
use super::output::{OutputReporter, TracingReporter};
use super::prompt::{confirmation_message, ConfirmationPrompt, FixedAnswer};
use super::refresh::{instructions_for, RefreshDispatcher, RefreshInstruction};
use super::selection::{SelectedEntry, Selection};
use super::template::{CommandTemplate, ExpansionContext, Placeholder};
use super::walker::{DirectoryWalker, FsWalker};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::subprocess::{
    ExitStatus, ProcessCommandBuilder, ProcessError, ProcessRunner, SubprocessManager,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How one command of a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    /// The process ran; this is how it exited.
    Exited(ExitStatus),
    /// The process could not be started.
    SpawnFailed(String),
    /// The process started but could not be waited for.
    Failed(String),
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(status) => write!(f, "{status}"),
            CommandStatus::SpawnFailed(reason) => write!(f, "could not start: {reason}"),
            CommandStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of one expanded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// The entry (or recursive match) the command was expanded for.
    pub entry: PathBuf,
    pub command_line: String,
    pub working_dir: PathBuf,
    pub status: CommandStatus,
    /// Empty when the action's output policy is `ShowNever`.
    pub stdout: String,
    pub stderr: String,
    /// Whether the output was handed to the output reporter.
    pub surfaced: bool,
    pub duration: Duration,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(&self.status, CommandStatus::Exited(status) if status.success())
    }
}

/// Everything that happened during one completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub action_id: String,
    pub outcomes: Vec<CommandOutcome>,
    pub refresh: Vec<RefreshInstruction>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(CommandOutcome::succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    pub fn surfaced(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.surfaced)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The user declined; nothing was spawned and nothing refreshed.
    Cancelled,
    Completed(BatchReport),
}

impl ExecutionResult {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            ExecutionResult::Cancelled => None,
            ExecutionResult::Completed(report) => Some(report),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionResult::Cancelled)
    }
}

/// A fully expanded command waiting to run.
#[derive(Debug, Clone)]
struct PlannedCommand {
    entry: PathBuf,
    command_line: String,
    working_dir: PathBuf,
}

/// Runs cleanup actions.
///
/// The executor holds no per-invocation state, so one instance can serve
/// any number of concurrent [`execute`](Self::execute) calls.
pub struct CleanupExecutor {
    runner: Arc<dyn ProcessRunner>,
    prompt: Arc<dyn ConfirmationPrompt>,
    walker: Arc<dyn DirectoryWalker>,
    reporter: Arc<dyn OutputReporter>,
    refresh: RefreshDispatcher,
    shell: String,
    context: ExpansionContext,
}

impl CleanupExecutor {
    /// Executor with `/bin/sh`, the default trash directory, a filesystem
    /// walker, log output and a prompt that always declines.
    pub fn new(subprocess: SubprocessManager, refresh: RefreshDispatcher) -> Self {
        Self::from_config(&EngineConfig::default(), subprocess, refresh)
    }

    pub fn from_config(
        config: &EngineConfig,
        subprocess: SubprocessManager,
        refresh: RefreshDispatcher,
    ) -> Self {
        Self {
            runner: subprocess.runner(),
            prompt: Arc::new(FixedAnswer::no()),
            walker: Arc::new(FsWalker),
            reporter: Arc::new(TracingReporter),
            refresh,
            shell: config.shell.clone(),
            context: ExpansionContext::new(config.trash_dir.clone()),
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn ConfirmationPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_walker(mut self, walker: Arc<dyn DirectoryWalker>) -> Self {
        self.walker = walker;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn OutputReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_context(mut self, context: ExpansionContext) -> Self {
        self.context = context;
        self
    }

    /// Run `action` on `selection`.
    ///
    /// Fails only for a stale pairing (`NotApplicable`) or a template that
    /// cannot be expanded; in both cases no process is started and no
    /// refresh is issued. Once the batch runs, every command is attempted
    /// and the refresh instructions follow regardless of exit statuses.
    pub async fn execute(
        &self,
        action: &CleanupAction,
        selection: &Selection,
    ) -> Result<ExecutionResult> {
        if let Err(e) = action.check_applicable(selection) {
            debug!("Refusing to run: {}", e);
            return Err(e);
        }
        let template = CommandTemplate::parse(action.command())?;

        if action.requires_confirmation() {
            let message = confirmation_message(action, selection);
            match self.prompt.confirm(&message).await {
                Ok(true) => {}
                Ok(false) => {
                    info!("Action '{}' cancelled by user", action.id());
                    return Ok(ExecutionResult::Cancelled);
                }
                Err(e) => {
                    warn!("Confirmation for '{}' failed, not running: {}", action.id(), e);
                    return Ok(ExecutionResult::Cancelled);
                }
            }
        }

        let batch = self.plan(action, &template, selection).await?;
        debug!(
            "Action '{}' expanded to {} command(s)",
            action.id(),
            batch.len()
        );

        if template.uses(Placeholder::TrashDir) {
            if let Err(e) = tokio::fs::create_dir_all(&self.context.trash_dir).await {
                warn!(
                    "Could not create trash directory {}: {}",
                    self.context.trash_dir.display(),
                    e
                );
            }
        }

        let mut outcomes = Vec::with_capacity(batch.len());
        for planned in batch {
            let outcome = self.run_one(action, planned).await;
            if outcome.surfaced {
                self.reporter.report(action, &outcome);
            }
            outcomes.push(outcome);
        }

        let refresh = instructions_for(action.refresh_policy(), selection);
        self.refresh.dispatch(&refresh);

        let report = BatchReport {
            action_id: action.id().to_string(),
            outcomes,
            refresh,
        };
        let failed = report.failures().count();
        if failed == 0 {
            info!(
                "Action '{}' finished: {} command(s) succeeded",
                action.id(),
                report.outcomes.len()
            );
        } else {
            warn!(
                "Action '{}' finished: {} of {} command(s) failed",
                action.id(),
                failed,
                report.outcomes.len()
            );
        }
        Ok(ExecutionResult::Completed(report))
    }

    /// Expand the whole batch before anything runs.
    async fn plan(
        &self,
        action: &CleanupAction,
        template: &CommandTemplate<'_>,
        selection: &Selection,
    ) -> Result<Vec<PlannedCommand>> {
        let mut batch = Vec::new();
        let mut context = self.context.clone();
        for entry in selection {
            let targets = if action.recurse() {
                self.descendants(entry)
                    .await
                    .into_iter()
                    .filter(|target| action.works_for_kind(target.kind()))
                    .collect()
            } else {
                vec![entry.clone()]
            };

            for target in targets {
                batch.push(PlannedCommand {
                    command_line: template.expand(&target, &mut context)?,
                    working_dir: target.directory_path().to_path_buf(),
                    entry: target.path().to_path_buf(),
                });
            }
        }
        Ok(batch)
    }

    /// Walk off the async threads; directory trees can be large.
    ///
    /// A walk that dies still yields the entry itself.
    async fn descendants(&self, entry: &SelectedEntry) -> Vec<SelectedEntry> {
        let walker = Arc::clone(&self.walker);
        let root = entry.clone();
        match tokio::task::spawn_blocking(move || walker.walk(&root)).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Walking {} failed, running on it alone: {}",
                    entry.path().display(),
                    e
                );
                vec![entry.clone()]
            }
        }
    }

    async fn run_one(&self, action: &CleanupAction, planned: PlannedCommand) -> CommandOutcome {
        let command = ProcessCommandBuilder::shell(&self.shell, &planned.command_line)
            .current_dir(&planned.working_dir)
            .build();

        let started = std::time::Instant::now();
        let (status, stdout, stderr, duration) = match self.runner.run(command).await {
            Ok(output) => (
                status_for_exit(output.status, &output.stderr),
                output.stdout,
                output.stderr,
                output.duration,
            ),
            Err(e) => {
                warn!("Command '{}' did not run: {}", planned.command_line, e);
                (
                    status_for_error(&e),
                    String::new(),
                    String::new(),
                    started.elapsed(),
                )
            }
        };

        let mut outcome = CommandOutcome {
            entry: planned.entry,
            command_line: planned.command_line,
            working_dir: planned.working_dir,
            status,
            stdout,
            stderr,
            surfaced: false,
            duration,
        };
        apply_output_policy(action.output_window_policy(), &mut outcome);
        outcome
    }
}

/// The shell reports a program it cannot find (127) or cannot execute (126)
/// through its exit code; those count as spawn failures.
fn status_for_exit(status: ExitStatus, stderr: &str) -> CommandStatus {
    match status {
        ExitStatus::Error(code @ (126 | 127)) => {
            let reason = stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or(if code == 127 {
                    "command not found"
                } else {
                    "permission denied"
                });
            CommandStatus::SpawnFailed(format!("{reason} (exit code {code})"))
        }
        status => CommandStatus::Exited(status),
    }
}

fn status_for_error(error: &ProcessError) -> CommandStatus {
    if error.is_spawn_failure() {
        CommandStatus::SpawnFailed(error.to_string())
    } else {
        CommandStatus::Failed(error.to_string())
    }
}

fn apply_output_policy(policy: OutputWindowPolicy, outcome: &mut CommandOutcome) {
    outcome.surfaced = match policy {
        OutputWindowPolicy::ShowAlways => true,
        OutputWindowPolicy::ShowIfErrorOutput => {
            !outcome.stderr.is_empty() || !outcome.succeeded()
        }
        OutputWindowPolicy::ShowNever => {
            outcome.stdout.clear();
            outcome.stderr.clear();
            false
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn outcome(status: CommandStatus, stderr: &str) -> CommandOutcome {
        CommandOutcome {
            entry: PathBuf::from("/x"),
            command_line: "true".to_string(),
            working_dir: PathBuf::from("/"),
            status,
            stdout: "out".to_string(),
            stderr: stderr.to_string(),
            surfaced: false,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_show_if_error_output() {
        let ok = CommandStatus::Exited(ExitStatus::Success);
        let failed = CommandStatus::Exited(ExitStatus::Error(1));

        let mut quiet = outcome(ok.clone(), "");
        apply_output_policy(OutputWindowPolicy::ShowIfErrorOutput, &mut quiet);
        assert!(!quiet.surfaced);

        let mut noisy = outcome(ok.clone(), "warning: something\n");
        apply_output_policy(OutputWindowPolicy::ShowIfErrorOutput, &mut noisy);
        assert!(noisy.surfaced);

        let mut blank_line = outcome(ok, "\n");
        apply_output_policy(OutputWindowPolicy::ShowIfErrorOutput, &mut blank_line);
        assert!(blank_line.surfaced);

        let mut nonzero = outcome(failed, "");
        apply_output_policy(OutputWindowPolicy::ShowIfErrorOutput, &mut nonzero);
        assert!(nonzero.surfaced);

        let mut spawn = outcome(CommandStatus::SpawnFailed("nope".into()), "");
        apply_output_policy(OutputWindowPolicy::ShowIfErrorOutput, &mut spawn);
        assert!(spawn.surfaced);
    }

    #[test]
    fn test_show_never_keeps_status() {
        let mut failed = outcome(CommandStatus::Exited(ExitStatus::Error(4)), "boom");
        apply_output_policy(OutputWindowPolicy::ShowNever, &mut failed);
        assert!(!failed.surfaced);
        assert!(failed.stdout.is_empty());
        assert!(failed.stderr.is_empty());
        assert_eq!(failed.status, CommandStatus::Exited(ExitStatus::Error(4)));
        assert!(!failed.succeeded());
    }

    #[test]
    fn test_show_always() {
        let mut ok = outcome(CommandStatus::Exited(ExitStatus::Success), "");
        apply_output_policy(OutputWindowPolicy::ShowAlways, &mut ok);
        assert!(ok.surfaced);
        assert_eq!(ok.stdout, "out");
    }

    #[test]
    fn test_status_for_error() {
        assert!(matches!(
            status_for_error(&ProcessError::CommandNotFound("sh".into())),
            CommandStatus::SpawnFailed(_)
        ));
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert!(matches!(
            status_for_error(&ProcessError::Io(io)),
            CommandStatus::Failed(_)
        ));
    }

    #[test]
    fn test_shell_not_found_and_not_executable_are_spawn_failures() {
        assert_eq!(
            status_for_exit(ExitStatus::Error(127), "sh: 1: wrglbrmpf: not found\n"),
            CommandStatus::SpawnFailed("sh: 1: wrglbrmpf: not found (exit code 127)".into())
        );
        assert_eq!(
            status_for_exit(ExitStatus::Error(126), ""),
            CommandStatus::SpawnFailed("permission denied (exit code 126)".into())
        );
        assert_eq!(
            status_for_exit(ExitStatus::Error(2), "make: *** No rule\n"),
            CommandStatus::Exited(ExitStatus::Error(2))
        );
        assert_eq!(
            status_for_exit(ExitStatus::Success, ""),
            CommandStatus::Exited(ExitStatus::Success)
        );
    }

    #[test]
    fn test_report_helpers() {
        let report = BatchReport {
            action_id: "x".to_string(),
            outcomes: vec![
                outcome(CommandStatus::Exited(ExitStatus::Success), ""),
                outcome(CommandStatus::SpawnFailed("gone".into()), ""),
            ],
            refresh: Vec::new(),
        };
        assert!(!report.all_succeeded());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.failures().next().unwrap().entry, Path::new("/x"));
        let result = ExecutionResult::Completed(report);
        assert!(!result.is_cancelled());
        assert!(result.report().is_some());
        assert!(ExecutionResult::Cancelled.report().is_none());
    }
}
