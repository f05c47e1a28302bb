//! Bulk actions over the current selection.
//!
//! The coordinator only talks to the store. It never touches the local list:
//! the change feed brings the result back as a fresh snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;

use homestock_core::{BatchOp, Entity, FieldUpdate, FieldValue, ItemId, TagLabel};
use homestock_inventory::Item;
use homestock_inventory::tag::ITEMS_FIELD;

use crate::config::InventoryConfig;
use crate::document_store::{DocumentStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkActionError {
    #[error("Please select one or more items.")]
    NothingSelected,

    #[error("Please choose one or more tags.")]
    NoTagsChosen,

    #[error("remote write failed: {0}")]
    RemoteWrite(#[from] StoreError),
}

/// Outcome of a bulk delete. Every requested id ends up in exactly one of
/// `deleted` or `failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub attempted: usize,
    pub deleted: Vec<ItemId>,
    pub failed: Vec<(ItemId, StoreError)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// User-facing summary, counting confirmed deletions only.
    pub fn summary(&self) -> String {
        delete_summary(self.deleted.len())
    }
}

/// Outcome of applying tags to items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagApplyReport {
    pub tags: Vec<TagLabel>,
    pub item_ids: Vec<ItemId>,
}

pub fn delete_summary(count: usize) -> String {
    format!("Deleted {count} item(s).")
}

pub fn confirm_title(count: usize) -> String {
    format!("Confirm deletion of {count} item(s)?")
}

pub struct BulkActionCoordinator {
    store: Arc<dyn DocumentStore>,
    config: InventoryConfig,
}

impl BulkActionCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, config: InventoryConfig) -> Self {
        Self { store, config }
    }

    /// Delete every selected item.
    ///
    /// Deletes are issued concurrently and all of them are awaited before
    /// reporting. There is no rollback: items deleted before a failure stay
    /// deleted.
    pub async fn bulk_delete(&self, selected: &[Item]) -> Result<BulkDeleteReport, BulkActionError> {
        let ids = unique_ids(selected);
        if ids.is_empty() {
            tracing::warn!("bulk delete refused: nothing selected");
            return Err(BulkActionError::NothingSelected);
        }

        let collection = self.config.items_collection.as_str();
        let outcomes = join_all(ids.iter().map(|id| async move {
            let outcome = self.store.delete(collection, id.as_str()).await;
            (id, outcome)
        }))
        .await;

        let mut report = BulkDeleteReport {
            attempted: ids.len(),
            deleted: Vec::with_capacity(ids.len()),
            failed: Vec::new(),
        };
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.deleted.push(id.clone()),
                Err(err) => {
                    tracing::error!(item_id = %id, error = %err, "bulk delete: remote write failed");
                    report.failed.push((id.clone(), err));
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "bulk delete finished"
        );
        Ok(report)
    }

    /// Add every selected item to every chosen tag, in one atomic batch.
    ///
    /// Existing members of a tag are kept; ids already present are not
    /// duplicated.
    pub async fn bulk_apply_tag(
        &self,
        selected: &[Item],
        tags: &[TagLabel],
    ) -> Result<TagApplyReport, BulkActionError> {
        let item_ids = unique_ids(selected);
        if item_ids.is_empty() {
            tracing::warn!("tag apply refused: nothing selected");
            return Err(BulkActionError::NothingSelected);
        }
        let tags: Vec<TagLabel> = tags.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        if tags.is_empty() {
            tracing::warn!("tag apply refused: no tags chosen");
            return Err(BulkActionError::NoTagsChosen);
        }

        let union: Vec<FieldValue> = item_ids.iter().map(|id| FieldValue::from(id.as_str())).collect();
        let ops = tags
            .iter()
            .map(|label| BatchOp::Update {
                collection: self.config.tags_collection.clone(),
                document_id: label.to_string(),
                updates: BTreeMap::from([(ITEMS_FIELD.to_string(), FieldUpdate::ArrayUnion(union.clone()))]),
            })
            .collect();

        if let Err(err) = self.store.batch(ops).await {
            tracing::error!(tags = tags.len(), items = item_ids.len(), error = %err, "tag apply: batch failed");
            return Err(err.into());
        }

        tracing::info!(tags = tags.len(), items = item_ids.len(), "tags applied");
        Ok(TagApplyReport { tags, item_ids })
    }
}

/// Ids of `items` in order, first occurrence wins.
fn unique_ids(items: &[Item]) -> Vec<ItemId> {
    let mut seen = BTreeSet::new();
    items
        .iter()
        .map(|item| item.id())
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}
