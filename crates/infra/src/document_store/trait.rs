use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use homestock_core::{BatchOp, Document, FieldUpdate, Fields, Snapshot};
use homestock_events::Subscription;

/// Remote store operation error.
///
/// These are infrastructure failures (the store said no, or could not be
/// reached) as opposed to domain errors (a document had the wrong shape).
/// None of them is retried by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("document {collection}/{document_id} not found")]
    NotFound {
        collection: String,
        document_id: String,
    },

    /// The store refused the operation (permissions, precondition, quota).
    #[error("rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached or the feed broke.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn not_found(collection: &str, document_id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            document_id: document_id.to_string(),
        }
    }
}

/// One delivery on a collection's change feed.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEvent {
    /// The complete current contents of the collection.
    Snapshot(Snapshot),
    /// The feed reported an error; more deliveries may follow.
    Failed(StoreError),
}

/// Remote document database, as seen by the inventory.
///
/// ## Feed semantics
///
/// `subscribe` delivers the current snapshot first, then a complete new
/// snapshot after every change to the collection. Snapshots are never diffs.
/// Dropping the subscription unsubscribes.
///
/// ## Write semantics
///
/// - `add` lets the store pick the document id
/// - `set` creates or overwrites the whole document
/// - `update` modifies fields of an existing document (`NotFound` otherwise)
/// - `delete` of a missing document succeeds
/// - `batch` applies every operation or none of them
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn subscribe(&self, collection: &str) -> Subscription<SnapshotEvent>;

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, document_id: &str) -> Result<Option<Document>, StoreError>;

    /// Create a document under a store-assigned id; returns that id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    async fn set(&self, collection: &str, document_id: &str, fields: Fields) -> Result<(), StoreError>;

    async fn update(
        &self,
        collection: &str,
        document_id: &str,
        updates: BTreeMap<String, FieldUpdate>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, document_id: &str) -> Result<(), StoreError>;

    async fn batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn subscribe(&self, collection: &str) -> Subscription<SnapshotEvent> {
        (**self).subscribe(collection)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).list(collection).await
    }

    async fn get(&self, collection: &str, document_id: &str) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, document_id).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        (**self).add(collection, fields).await
    }

    async fn set(&self, collection: &str, document_id: &str, fields: Fields) -> Result<(), StoreError> {
        (**self).set(collection, document_id, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        document_id: &str,
        updates: BTreeMap<String, FieldUpdate>,
    ) -> Result<(), StoreError> {
        (**self).update(collection, document_id, updates).await
    }

    async fn delete(&self, collection: &str, document_id: &str) -> Result<(), StoreError> {
        (**self).delete(collection, document_id).await
    }

    async fn batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        (**self).batch(ops).await
    }
}
