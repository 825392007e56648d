//! # dirstat-cleanup
//!
//! Cleanup actions for disk usage browsers: decide which actions apply to a
//! selection of tree entries, expand shell-safe command lines, run them as
//! a sequential batch and tell the directory model what to refresh.
//!
//! ## Modules
//!
//! - `cleanup` - Action catalog, template expansion, executor and refresh instructions
//! - `subprocess` - Process runner abstraction (tokio-backed and mock)
//! - `config` - `config.toml` loading
//! - `app` - Logging and error reporting for the binary
//! - `error` - Engine error type
pub mod app;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod subprocess;

pub use cleanup::{
    CleanupAction, CleanupCatalog, CleanupExecutor, ExecutionResult, RefreshDispatcher,
    RefreshInstruction, Selection,
};
pub use error::{CleanupError, Result};
