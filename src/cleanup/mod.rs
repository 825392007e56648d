//! Cleanup action engine
//!
//! Decides which cleanup actions apply to a selection of tree entries,
//! expands their command templates, runs the resulting shell commands one
//! after another and tells the directory model how to catch up afterwards.
//!
//! - `selection` - entries the user selected
//! - `action` / `catalog` / `standard` - action definitions and the ordered catalog
//! - `template` - placeholder expansion with shell quoting
//! - `executor` - confirmation, batch execution, output capture
//! - `refresh` - refresh instructions for the directory model

pub mod action;
pub mod catalog;
pub mod executor;
pub mod output;
pub mod prompt;
pub mod refresh;
pub mod selection;
pub mod standard;
pub mod template;
pub mod walker;


pub use action::{ActionSpec, CleanupAction, OutputWindowPolicy, RefreshPolicy};
pub use catalog::CleanupCatalog;
pub use executor::{BatchReport, CleanupExecutor, CommandOutcome, CommandStatus, ExecutionResult};
pub use output::{ConsoleReporter, OutputReporter, TracingReporter};
pub use prompt::{ConfirmationPrompt, FixedAnswer, StdinPrompter};
pub use refresh::{RefreshDispatcher, RefreshInstruction, RefreshKind};
pub use selection::{EntryKind, SelectedEntry, Selection};
pub use template::{CommandTemplate, ExpansionContext, Placeholder};
pub use walker::{DirectoryWalker, FsWalker};
