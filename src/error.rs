use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single cleanup invocation or of catalog configuration.
///
/// None of these are fatal to the host: an invocation that fails simply
/// reports the error and leaves the catalog and directory model untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanupError {
    #[error("Action '{action}' is not applicable: {reason}")]
    NotApplicable { action: String, reason: String },

    #[error("Malformed command template '{template}': unknown placeholder '{token}' at byte {position}")]
    MalformedTemplate {
        template: String,
        token: String,
        position: usize,
    },

    #[error("Selection is empty")]
    EmptySelection,

    #[error("Path is not valid UTF-8 and cannot be placed on a command line: {0:?}")]
    NonUtf8Path(PathBuf),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Duplicate action id: {0}")]
    DuplicateActionId(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CleanupError>;
