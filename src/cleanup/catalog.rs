//! The ordered catalog of cleanup actions.

use super::action::CleanupAction;
use super::selection::Selection;
use super::standard;
use crate::config::EngineConfig;
use crate::error::{CleanupError, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Ordered set of actions with unique ids.
///
/// Order is presentation order and never changes; only the per-action
/// enabled flags are mutable, and they can be flipped through a shared
/// reference while other threads query [`applicable_actions`](Self::applicable_actions).
#[derive(Debug, Default)]
pub struct CleanupCatalog {
    actions: Vec<CleanupAction>,
}

impl CleanupCatalog {
    pub fn new(actions: Vec<CleanupAction>) -> Result<Self> {
        let mut seen = HashSet::new();
        for action in &actions {
            if !seen.insert(action.id()) {
                return Err(CleanupError::DuplicateActionId(action.id().to_string()));
            }
        }
        Ok(Self { actions })
    }

    /// The standard action set, in its fixed order.
    pub fn standard() -> Self {
        Self {
            actions: standard::standard_actions(),
        }
    }

    /// Standard actions, then configured extras, then configured disables.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut actions = standard::standard_actions();
        actions.extend(config.actions.iter().cloned().map(CleanupAction::from));
        let catalog = Self::new(actions)?;

        for id in &config.disabled {
            catalog.set_enabled(id, false)?;
        }

        for action in &catalog.actions {
            if let Err(e) = super::template::validate(action.command()) {
                warn!("Action '{}' will fail on every invocation: {}", action.id(), e);
            }
        }

        debug!(
            "Cleanup catalog built with {} actions ({} disabled)",
            catalog.len(),
            config.disabled.len()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanupAction> {
        self.actions.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CleanupAction> {
        self.actions.iter().find(|action| action.id() == id)
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let action = self
            .get(id)
            .ok_or_else(|| CleanupError::UnknownAction(id.to_string()))?;
        action.set_enabled(enabled);
        debug!("Action '{}' enabled={}", id, enabled);
        Ok(())
    }

    /// Enabled actions that work for every entry of `selection`, in catalog order.
    pub fn applicable_actions(&self, selection: &Selection) -> Vec<&CleanupAction> {
        self.actions
            .iter()
            .filter(|action| action.is_applicable_to(selection))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CleanupCatalog {
    type Item = &'a CleanupAction;
    type IntoIter = std::slice::Iter<'a, CleanupAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::action::ActionSpec;
    use crate::cleanup::selection::SelectedEntry;

    fn ids(actions: &[&CleanupAction]) -> Vec<String> {
        actions.iter().map(|a| a.id().to_string()).collect()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = CleanupCatalog::new(vec![
            CleanupAction::new("a", "true", "A"),
            CleanupAction::new("a", "false", "A again"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            CleanupError::DuplicateActionId("a".to_string())
        );
    }

    #[test]
    fn test_applicable_actions_preserve_order() {
        let catalog = CleanupCatalog::new(vec![
            CleanupAction::new("c", "true", "C").works_for(true, true, true),
            CleanupAction::new("a", "true", "A").works_for(false, true, false),
            CleanupAction::new("b", "true", "B").works_for(true, false, false),
            CleanupAction::new("d", "true", "D").works_for(true, true, false),
        ])
        .unwrap();

        let file = Selection::single(SelectedEntry::file("/x/y"));
        assert_eq!(ids(&catalog.applicable_actions(&file)), ["c", "b", "d"]);

        let dir = Selection::single(SelectedEntry::directory("/x"));
        assert_eq!(ids(&catalog.applicable_actions(&dir)), ["c", "a", "d"]);

        let dot = Selection::single(SelectedEntry::dot_entry("/x"));
        assert_eq!(ids(&catalog.applicable_actions(&dot)), ["c"]);
    }

    #[test]
    fn test_toggling_does_not_reorder() {
        let catalog = CleanupCatalog::standard();
        let before: Vec<String> = catalog.iter().map(|a| a.id().to_string()).collect();

        catalog.set_enabled("cleanupMoveToTrash", false).unwrap();
        catalog.set_enabled("cleanupMoveToTrash", true).unwrap();

        let after: Vec<String> = catalog.iter().map(|a| a.id().to_string()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_disabled_actions_filtered_but_kept() {
        let catalog = CleanupCatalog::standard();
        let file = Selection::single(SelectedEntry::file("/x/y"));

        catalog.set_enabled("cleanupHardDelete", false).unwrap();
        let applicable = catalog.applicable_actions(&file);
        assert!(!ids(&applicable).contains(&"cleanupHardDelete".to_string()));
        assert!(catalog.get("cleanupHardDelete").is_some());
    }

    #[test]
    fn test_set_enabled_unknown_action() {
        let catalog = CleanupCatalog::standard();
        assert_eq!(
            catalog.set_enabled("nope", false),
            Err(CleanupError::UnknownAction("nope".to_string()))
        );
    }

    #[test]
    fn test_from_config_appends_and_disables() {
        let config = EngineConfig {
            disabled: vec!["cleanupOpenInTerminal".to_string()],
            actions: vec![ActionSpec {
                id: "cleanupDu".to_string(),
                title: Some("Disk &usage".to_string()),
                command: "du -sh %p".to_string(),
                works_for_file: true,
                works_for_dir: true,
                works_for_dot_entry: false,
                requires_confirmation: false,
                recurse: false,
                refresh_policy: Default::default(),
                output_window_policy: Default::default(),
                enabled: true,
            }],
            ..EngineConfig::default()
        };

        let catalog = CleanupCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.iter().last().unwrap().id(), "cleanupDu");
        assert!(!catalog.get("cleanupOpenInTerminal").unwrap().is_enabled());
    }

    #[test]
    fn test_from_config_rejects_unknown_disable() {
        let config = EngineConfig {
            disabled: vec!["cleanupMissing".to_string()],
            ..EngineConfig::default()
        };
        assert!(matches!(
            CleanupCatalog::from_config(&config),
            Err(CleanupError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_concurrent_toggle_and_query() {
        let catalog = std::sync::Arc::new(CleanupCatalog::standard());
        let selection = Selection::single(SelectedEntry::file("/x/y"));

        let writer = {
            let catalog = std::sync::Arc::clone(&catalog);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    catalog.set_enabled("cleanupHardDelete", i % 2 == 0).unwrap();
                }
            })
        };
        for _ in 0..1000 {
            let applicable = catalog.applicable_actions(&selection);
            assert!(applicable.iter().any(|a| a.id() == "cleanupMoveToTrash"));
        }
        writer.join().unwrap();
    }
}
