//! Cleanup action definitions.

use super::selection::{EntryKind, Selection};
use crate::error::{CleanupError, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// How the directory model has to reconcile itself after an action ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    #[default]
    NoRefresh,
    RefreshThis,
    RefreshParent,
    AssumeDeleted,
}

/// When captured command output is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputWindowPolicy {
    #[default]
    ShowAlways,
    ShowIfErrorOutput,
    ShowNever,
}

/// A configured cleanup action.
///
/// Everything but the enabled flag is fixed once the action is built.
#[derive(Debug)]
pub struct CleanupAction {
    id: String,
    title: String,
    command: String,
    works_for_file: bool,
    works_for_dir: bool,
    works_for_dot_entry: bool,
    requires_confirmation: bool,
    recurse: bool,
    refresh_policy: RefreshPolicy,
    output_window_policy: OutputWindowPolicy,
    enabled: AtomicBool,
}

impl CleanupAction {
    /// New action that applies to files and directories but not dot entries.
    pub fn new(id: impl Into<String>, command: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            command: command.into(),
            works_for_file: true,
            works_for_dir: true,
            works_for_dot_entry: false,
            requires_confirmation: false,
            recurse: false,
            refresh_policy: RefreshPolicy::NoRefresh,
            output_window_policy: OutputWindowPolicy::ShowAlways,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn works_for(mut self, file: bool, dir: bool, dot_entry: bool) -> Self {
        self.works_for_file = file;
        self.works_for_dir = dir;
        self.works_for_dot_entry = dot_entry;
        self
    }

    pub fn with_confirmation(mut self, requires_confirmation: bool) -> Self {
        self.requires_confirmation = requires_confirmation;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn with_output_window_policy(mut self, policy: OutputWindowPolicy) -> Self {
        self.output_window_policy = policy;
        self
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        self.enabled.store(enabled, Ordering::Relaxed);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title including the `&` accelerator marker.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title without accelerator markers; `&&` stands for a literal `&`.
    pub fn clean_title(&self) -> String {
        let mut clean = String::with_capacity(self.title.len());
        let mut chars = self.title.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '&' {
                if chars.peek() == Some(&'&') {
                    chars.next();
                    clean.push('&');
                }
            } else {
                clean.push(c);
            }
        }
        clean
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }

    pub fn recurse(&self) -> bool {
        self.recurse
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    pub fn output_window_policy(&self) -> OutputWindowPolicy {
        self.output_window_policy
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn works_for_kind(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::File => self.works_for_file,
            EntryKind::Directory => self.works_for_dir,
            EntryKind::DotEntry => self.works_for_dot_entry,
        }
    }

    /// True if the action is enabled and works for every entry's kind.
    pub fn is_applicable_to(&self, selection: &Selection) -> bool {
        self.is_enabled()
            && selection
                .iter()
                .all(|entry| self.works_for_kind(entry.kind()))
    }

    /// Like [`is_applicable_to`](Self::is_applicable_to), with the reason on rejection.
    pub fn check_applicable(&self, selection: &Selection) -> Result<()> {
        if !self.is_enabled() {
            return Err(CleanupError::NotApplicable {
                action: self.id.clone(),
                reason: "action is disabled".to_string(),
            });
        }
        if let Some(entry) = selection
            .iter()
            .find(|entry| !self.works_for_kind(entry.kind()))
        {
            return Err(CleanupError::NotApplicable {
                action: self.id.clone(),
                reason: format!(
                    "does not work for {} {}",
                    entry.kind(),
                    entry.path().display()
                ),
            });
        }
        Ok(())
    }

    pub fn spec(&self) -> ActionSpec {
        ActionSpec {
            id: self.id.clone(),
            title: Some(self.title.clone()),
            command: self.command.clone(),
            works_for_file: self.works_for_file,
            works_for_dir: self.works_for_dir,
            works_for_dot_entry: self.works_for_dot_entry,
            requires_confirmation: self.requires_confirmation,
            recurse: self.recurse,
            refresh_policy: self.refresh_policy,
            output_window_policy: self.output_window_policy,
            enabled: self.is_enabled(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration surface of one action, as read from a `[[action]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub command: String,
    #[serde(default = "default_true")]
    pub works_for_file: bool,
    #[serde(default = "default_true")]
    pub works_for_dir: bool,
    #[serde(default)]
    pub works_for_dot_entry: bool,
    #[serde(default)]
    pub requires_confirmation: bool,
    #[serde(default)]
    pub recurse: bool,
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
    #[serde(default)]
    pub output_window_policy: OutputWindowPolicy,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl From<ActionSpec> for CleanupAction {
    fn from(spec: ActionSpec) -> Self {
        let title = spec.title.unwrap_or_else(|| spec.id.clone());
        CleanupAction::new(spec.id, spec.command, title)
            .works_for(spec.works_for_file, spec.works_for_dir, spec.works_for_dot_entry)
            .with_confirmation(spec.requires_confirmation)
            .with_recurse(spec.recurse)
            .with_refresh_policy(spec.refresh_policy)
            .with_output_window_policy(spec.output_window_policy)
            .with_enabled(spec.enabled)
    }
}
