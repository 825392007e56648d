use std::path::PathBuf;

use super::runner::ProcessCommand;

/// Step-by-step construction of a [`ProcessCommand`].
#[derive(Debug, Clone)]
pub struct ProcessCommandBuilder {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessCommandBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// `shell -c line`, the form every expanded cleanup command runs in.
    pub fn shell(shell: &str, line: &str) -> Self {
        Self::new(shell).arg("-c").arg(line)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> ProcessCommand {
        ProcessCommand {
            program: self.program,
            args: self.args,
            working_dir: self.working_dir,
        }
    }
}
