use crate::cleanup::ActionSpec;
use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;

pub use loader::ConfigLoader;

/// Directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "dirstat", "dirstat-cleanup")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// `files` directory of the user's XDG trash.
pub fn default_trash_dir() -> PathBuf {
    dirs::data_dir()
        .map(|data| data.join("Trash").join("files"))
        .unwrap_or_else(|| PathBuf::from(".Trash"))
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

/// Engine settings read from `config.toml`.
///
/// ```toml
/// shell = "/bin/bash"
/// disabled = ["cleanupOpenInTerminal"]
///
/// [[action]]
/// id = "cleanupDu"
/// title = "Disk &usage"
/// command = "du -sh %p"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shell that runs each expanded command line as `shell -c line`.
    pub shell: String,
    /// Target of the `%t` placeholder.
    pub trash_dir: PathBuf,
    /// Tracing filter directive; overrides the verbosity flags.
    pub log_filter: Option<String>,
    /// Ids of actions that start out disabled.
    pub disabled: Vec<String>,
    /// Extra actions appended after the standard set.
    #[serde(rename = "action")]
    pub actions: Vec<ActionSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            trash_dir: default_trash_dir(),
            log_filter: None,
            disabled: Vec::new(),
            actions: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn merge_env_vars(&mut self) {
        if let Ok(shell) = std::env::var("DIRSTAT_CLEANUP_SHELL") {
            self.shell = shell;
        }

        if let Ok(trash_dir) = std::env::var("DIRSTAT_CLEANUP_TRASH_DIR") {
            self.trash_dir = PathBuf::from(trash_dir);
        }

        if let Ok(filter) = std::env::var("DIRSTAT_CLEANUP_LOG") {
            self.log_filter = Some(filter);
        }
    }
}
