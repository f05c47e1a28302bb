//! Messages published by the inventory state container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A "something changed, re-render" notification.
///
/// Notices are facts about the local state container, not about the remote
/// store: a rejected snapshot or a read failure means the visible list is
/// stale, and the presentation layer may want to say so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryNotice {
    /// The item list was rebuilt from a fresh snapshot; selection is empty.
    ListReplaced {
        revision: u64,
        item_count: usize,
        at: DateTime<Utc>,
    },
    /// A snapshot contained a document that could not be parsed; the
    /// previous list was kept.
    SnapshotRejected { document_id: String, reason: String },
    /// The change feed reported an error; the previous list was kept.
    ReadFailed { reason: String },
    /// Select mode was entered (`true`) or exited (`false`).
    SelectModeChanged { active: bool },
}

impl InventoryNotice {
    /// Stable notice name (e.g. for structured logs).
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryNotice::ListReplaced { .. } => "inventory.list.replaced",
            InventoryNotice::SnapshotRejected { .. } => "inventory.snapshot.rejected",
            InventoryNotice::ReadFailed { .. } => "inventory.read.failed",
            InventoryNotice::SelectModeChanged { .. } => "inventory.select_mode.changed",
        }
    }

    /// Whether the presentation layer has to redraw the item list.
    pub fn requires_render(&self) -> bool {
        matches!(
            self,
            InventoryNotice::ListReplaced { .. } | InventoryNotice::SelectModeChanged { .. }
        )
    }
}
