//! Single-item writes: add, edit, delete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use homestock_core::{DomainError, ItemId};
use homestock_inventory::{DraftRejected, Item, ItemDraft};

use crate::config::InventoryConfig;
use crate::document_store::{DocumentStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemServiceError {
    #[error(transparent)]
    Draft(#[from] DraftRejected),

    #[error("stored item is malformed: {0}")]
    BadDocument(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ItemService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ItemService {
    pub fn new(store: Arc<dyn DocumentStore>, config: &InventoryConfig) -> Self {
        Self {
            store,
            collection: config.items_collection.clone(),
        }
    }

    /// Validate `draft` against `now` and store it under a new id.
    pub async fn add_item(&self, draft: &ItemDraft, now: DateTime<Utc>) -> Result<ItemId, ItemServiceError> {
        let fields = draft.to_fields(now)?;
        let raw_id = self.store.add(&self.collection, fields).await?;
        let id = ItemId::new(raw_id)?;
        tracing::info!(item_id = %id, "item added");
        Ok(id)
    }

    /// Overwrite the whole document; optional fields left empty are removed.
    ///
    /// Editing an item that was deleted in the meantime fails with
    /// `NotFound` instead of recreating it.
    pub async fn edit_item(&self, id: &ItemId, draft: &ItemDraft, now: DateTime<Utc>) -> Result<(), ItemServiceError> {
        let fields = draft.to_fields(now)?;
        if self.store.get(&self.collection, id.as_str()).await?.is_none() {
            tracing::warn!(item_id = %id, "edit refused: item no longer exists");
            return Err(StoreError::not_found(&self.collection, id.as_str()).into());
        }
        self.store.set(&self.collection, id.as_str(), fields).await?;
        tracing::info!(item_id = %id, "item updated");
        Ok(())
    }

    pub async fn delete_item(&self, id: &ItemId) -> Result<(), ItemServiceError> {
        self.store.delete(&self.collection, id.as_str()).await.map_err(|err| {
            tracing::error!(item_id = %id, error = %err, "item delete failed");
            err
        })?;
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }

    pub async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, ItemServiceError> {
        match self.store.get(&self.collection, id.as_str()).await? {
            Some(doc) => Ok(Some(Item::parse(&doc.id, &doc.fields)?)),
            None => Ok(None),
        }
    }
}
