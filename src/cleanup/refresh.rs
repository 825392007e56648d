//! Refresh instructions sent to the directory model after a batch.

use super::action::RefreshPolicy;
use super::selection::Selection;
use std::collections::HashSet;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshKind {
    /// Re-scan the subtree at `path`.
    RefreshThis,
    /// Re-scan the directory at `path`, which is the parent of a processed entry.
    RefreshParent,
    /// Drop `path` from the in-memory tree without looking at the disk.
    AssumeDeleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshInstruction {
    pub kind: RefreshKind,
    pub path: PathBuf,
}

/// Instructions that follow from `policy` for the entries of `selection`.
///
/// One per entry for `RefreshThis` and `AssumeDeleted`; one per distinct
/// parent directory for `RefreshParent`; none for `NoRefresh`.
pub fn instructions_for(policy: RefreshPolicy, selection: &Selection) -> Vec<RefreshInstruction> {
    match policy {
        RefreshPolicy::NoRefresh => Vec::new(),
        RefreshPolicy::RefreshThis => per_entry(RefreshKind::RefreshThis, selection),
        RefreshPolicy::AssumeDeleted => per_entry(RefreshKind::AssumeDeleted, selection),
        RefreshPolicy::RefreshParent => {
            let mut seen = HashSet::new();
            selection
                .iter()
                .map(|entry| entry.parent_path().to_path_buf())
                .filter(|parent| seen.insert(parent.clone()))
                .map(|path| RefreshInstruction {
                    kind: RefreshKind::RefreshParent,
                    path,
                })
                .collect()
        }
    }
}

fn per_entry(kind: RefreshKind, selection: &Selection) -> Vec<RefreshInstruction> {
    selection
        .iter()
        .map(|entry| RefreshInstruction {
            kind,
            path: entry.path().to_path_buf(),
        })
        .collect()
}

/// Sending half of the refresh queue consumed by the directory model.
#[derive(Debug, Clone)]
pub struct RefreshDispatcher {
    tx: mpsc::UnboundedSender<RefreshInstruction>,
}

impl RefreshDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<RefreshInstruction>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RefreshInstruction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue `instructions`. A model that went away is not an error.
    pub fn dispatch(&self, instructions: &[RefreshInstruction]) {
        for instruction in instructions {
            debug!(
                "Refresh instruction {:?} for {}",
                instruction.kind,
                instruction.path.display()
            );
            if self.tx.send(instruction.clone()).is_err() {
                warn!("Directory model stopped listening; dropping refresh instructions");
                return;
            }
        }
    }
}
