//! Local directory of tags, backed by the tags collection.

use std::sync::Arc;

use thiserror::Error;

use homestock_core::{DomainError, Entity, ItemId, TagLabel};
use homestock_inventory::Tag;

use crate::bulk::TagApplyReport;
use crate::config::InventoryConfig;
use crate::document_store::{DocumentStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("invalid tag: {0}")]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct TagDirectory {
    store: Arc<dyn DocumentStore>,
    collection: String,
    tags: Vec<Tag>,
}

impl TagDirectory {
    pub fn new(store: Arc<dyn DocumentStore>, config: &InventoryConfig) -> Self {
        Self {
            store,
            collection: config.tags_collection.clone(),
            tags: Vec::new(),
        }
    }

    /// Replace the local list with the tags collection's current contents.
    ///
    /// Documents that do not parse are skipped. Returns how many tags loaded.
    pub async fn load(&mut self) -> Result<usize, TagError> {
        let documents = self.store.list(&self.collection).await?;

        let mut tags = Vec::with_capacity(documents.len());
        for doc in documents {
            match Tag::parse(&doc.id, &doc.fields) {
                Ok(tag) => tags.push(tag),
                Err(err) => tracing::warn!(tag = %doc.id, error = %err, "skipping malformed tag document"),
            }
        }

        tracing::debug!(count = tags.len(), "tags loaded");
        self.tags = tags;
        Ok(self.tags.len())
    }

    /// Create a tag with no items.
    ///
    /// Returns `Ok(false)` without writing when a tag with exactly this label
    /// already exists, locally or in the store. A tag found only in the store
    /// is recorded locally with its current members.
    pub async fn add_tag(&mut self, input: &str) -> Result<bool, TagError> {
        let label = TagLabel::from_input(input)?;
        if self.get(&label).is_some() {
            tracing::debug!(tag = %label, "tag already exists");
            return Ok(false);
        }

        if let Some(doc) = self.store.get(&self.collection, label.as_str()).await? {
            tracing::debug!(tag = %label, "tag already exists in store");
            match Tag::parse(&doc.id, &doc.fields) {
                Ok(tag) => self.tags.push(tag),
                Err(err) => tracing::warn!(tag = %label, error = %err, "existing tag document is malformed"),
            }
            return Ok(false);
        }

        let tag = Tag::new(label);
        self.store
            .set(&self.collection, tag.label().as_str(), tag.to_fields())
            .await?;

        tracing::info!(tag = %tag.label(), "tag created");
        self.tags.push(tag);
        Ok(true)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn labels(&self) -> Vec<TagLabel> {
        self.tags.iter().map(|tag| tag.label().clone()).collect()
    }

    pub fn get(&self, label: &TagLabel) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id() == label)
    }

    /// Mirror a successful tag apply into the local copies.
    pub fn record_applied(&mut self, report: &TagApplyReport) {
        for tag in self.tags.iter_mut().filter(|t| report.tags.contains(t.label())) {
            tag.add_items(report.item_ids.iter());
        }
    }

    /// Tags that contain `id`.
    pub fn tags_of(&self, id: &ItemId) -> Vec<&Tag> {
        self.tags.iter().filter(|tag| tag.contains(id)).collect()
    }
}
