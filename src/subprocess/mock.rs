use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

type ArgsPredicate = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// [`ProcessRunner`] that answers from scripted replies and records every
/// command it receives.
///
/// Replies are tried in registration order; the first one whose program and
/// argument predicate fit the command answers it, as often as it is hit.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    replies: Arc<Mutex<Vec<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct ScriptedReply {
    program: String,
    args: Option<ArgsPredicate>,
    output: ProcessOutput,
    spawn_failure: bool,
}

impl ScriptedReply {
    fn fits(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self
                .args
                .as_ref()
                .map_or(true, |predicate| predicate(&command.args))
    }
}

/// Builder for one scripted reply; registered by [`finish`](Self::finish).
pub struct MockCommandConfig {
    runner: MockProcessRunner,
    reply: ScriptedReply,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reply for commands running `program`. Succeeds silently
    /// unless configured otherwise.
    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            reply: ScriptedReply {
                program: program.to_string(),
                args: None,
                output: ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::from_millis(1),
                },
                spawn_failure: false,
            },
        }
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<ProcessCommand> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        lock(&self.calls).push(command.clone());

        let replies = lock(&self.replies);
        let reply = replies
            .iter()
            .find(|reply| reply.fits(&command))
            .ok_or_else(|| {
                ProcessError::MockExpectationNotMet(format!(
                    "no scripted reply for {}",
                    command.display()
                ))
            })?;

        if reply.spawn_failure {
            return Err(ProcessError::CommandNotFound(command.program.clone()));
        }
        Ok(reply.output.clone())
    }
}

impl MockCommandConfig {
    /// Only answer commands whose arguments satisfy `predicate`.
    pub fn with_args<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.reply.args = Some(Box::new(predicate));
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        self.reply.output.stdout = stdout.to_string();
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        self.reply.output.stderr = stderr.to_string();
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.reply.output.status = match code {
            0 => ExitStatus::Success,
            code => ExitStatus::Error(code),
        };
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    /// Answer as if the program could not be started at all.
    pub fn fails_to_spawn(mut self) -> Self {
        self.reply.spawn_failure = true;
        self
    }

    pub fn finish(self) {
        lock(&self.runner.replies).push(self.reply);
    }
}
