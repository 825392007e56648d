//! The predefined cleanup actions.

use super::action::{CleanupAction, OutputWindowPolicy, RefreshPolicy};

pub fn standard_actions() -> Vec<CleanupAction> {
    let mut actions = vec![
        open_in_file_manager(),
        open_in_terminal(),
        move_to_trash(),
        hard_delete(),
        compress_subtree(),
        make_clean(),
        delete_junk(),
    ];
    actions.extend(debug_actions());
    actions
}

pub fn open_in_file_manager() -> CleanupAction {
    CleanupAction::new("cleanupOpenInFileManager", "xdg-open %p", "Open in &File Manager")
        .works_for(true, true, true)
        .with_refresh_policy(RefreshPolicy::NoRefresh)
}

pub fn open_in_terminal() -> CleanupAction {
    CleanupAction::new(
        "cleanupOpenInTerminal",
        "x-terminal-emulator --workdir %p",
        "Open in &Terminal",
    )
    .works_for(false, true, true)
    .with_refresh_policy(RefreshPolicy::NoRefresh)
    .with_output_window_policy(OutputWindowPolicy::ShowNever)
}

pub fn move_to_trash() -> CleanupAction {
    CleanupAction::new("cleanupMoveToTrash", "mv %p %t", "Delete (to Trash &Bin)")
        .works_for(true, true, false)
        .with_refresh_policy(RefreshPolicy::AssumeDeleted)
}

pub fn hard_delete() -> CleanupAction {
    CleanupAction::new("cleanupHardDelete", "rm -rf %p", "&Delete (no way to undelete!)")
        .works_for(true, true, false)
        .with_confirmation(true)
        .with_refresh_policy(RefreshPolicy::AssumeDeleted)
}

/// Replaces a directory with a bzip2 tarball next to it.
pub fn compress_subtree() -> CleanupAction {
    CleanupAction::new(
        "cleanupCompressSubtree",
        "cd .. && tar cjvf %n.tar.bz2 %n && rm -rf %n",
        "&Compress",
    )
    .works_for(false, true, false)
    .with_refresh_policy(RefreshPolicy::RefreshParent)
}

pub fn make_clean() -> CleanupAction {
    CleanupAction::new("cleanupMakeClean", "make clean", "&make clean")
        .works_for(false, true, true)
        .with_refresh_policy(RefreshPolicy::RefreshThis)
}

/// Runs in the selected directory and in every directory below it.
pub fn delete_junk() -> CleanupAction {
    CleanupAction::new(
        "cleanupDeleteJunk",
        "rm -f *.o *~ *.bak *.auto core",
        "Delete &Junk Files",
    )
    .works_for(false, true, true)
    .with_recurse(true)
    .with_refresh_policy(RefreshPolicy::RefreshThis)
}

#[cfg(feature = "debug-actions")]
pub fn debug_actions() -> Vec<CleanupAction> {
    vec![
        CleanupAction::new("cleanupEchoargs", "echo %p", "echoargs").works_for(true, true, true),
        CleanupAction::new(
            "cleanupEchoargsMixed",
            "echo %n one two; echo three four >&2",
            "Output on stdout and stderr",
        )
        .works_for(true, true, true)
        .with_confirmation(true),
        CleanupAction::new("cleanupCommandNotFound", "wrglbrmpf", "Nonexistent command")
            .works_for(true, true, true),
        CleanupAction::new("cleanupSleepy", "sleep 1; echo %p", "Sleepy echoargs")
            .works_for(true, true, true),
    ]
}

#[cfg(not(feature = "debug-actions"))]
pub fn debug_actions() -> Vec<CleanupAction> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::selection::EntryKind;
    use crate::cleanup::template;

    #[test]
    fn test_standard_order() {
        let ids: Vec<String> = standard_actions()
            .iter()
            .take(7)
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(
            ids,
            [
                "cleanupOpenInFileManager",
                "cleanupOpenInTerminal",
                "cleanupMoveToTrash",
                "cleanupHardDelete",
                "cleanupCompressSubtree",
                "cleanupMakeClean",
                "cleanupDeleteJunk",
            ]
        );
    }

    #[test]
    fn test_standard_templates_are_well_formed() {
        for action in standard_actions() {
            assert!(
                template::validate(action.command()).is_ok(),
                "{} has a malformed template",
                action.id()
            );
        }
    }

    #[test]
    fn test_only_hard_delete_asks_for_confirmation() {
        let confirming: Vec<String> = standard_actions()
            .iter()
            .take(7)
            .filter(|a| a.requires_confirmation())
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(confirming, ["cleanupHardDelete"]);
    }

    #[test]
    fn test_deleting_actions_assume_deleted() {
        for action in [move_to_trash(), hard_delete()] {
            assert_eq!(action.refresh_policy(), RefreshPolicy::AssumeDeleted);
            assert_eq!(action.output_window_policy(), OutputWindowPolicy::ShowAlways);
            assert!(!action.works_for_kind(EntryKind::DotEntry));
        }
    }

    #[test]
    fn test_only_terminal_hides_output() {
        let hidden: Vec<String> = standard_actions()
            .iter()
            .take(7)
            .filter(|a| a.output_window_policy() != OutputWindowPolicy::ShowAlways)
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(hidden, ["cleanupOpenInTerminal"]);
    }

    #[test]
    fn test_compress_refreshes_parent() {
        let action = compress_subtree();
        assert_eq!(action.refresh_policy(), RefreshPolicy::RefreshParent);
        assert!(action.works_for_kind(EntryKind::Directory));
        assert!(!action.works_for_kind(EntryKind::File));
    }

    #[test]
    fn test_delete_junk_recurses() {
        let action = delete_junk();
        assert!(action.recurse());
        assert_eq!(action.clean_title(), "Delete Junk Files");
    }
}
