use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use homestock_core::{BatchOp, Document, FieldUpdate, Fields, Snapshot};
use homestock_events::{EventBus, InMemoryEventBus, Subscription};

use super::r#trait::{DocumentStore, SnapshotEvent, StoreError};

type Collection = BTreeMap<String, Fields>;

/// Failures injected by tests.
#[derive(Debug, Default)]
struct FailurePlan {
    rejected_writes: HashSet<(String, String)>,
    unavailable_reads: HashSet<String>,
}

/// In-memory document store.
///
/// Intended for tests/dev. Documents are kept per collection in id order,
/// which is also the order snapshots list them in. Every successful write
/// pushes a fresh snapshot to that collection's subscribers.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    feeds: Mutex<HashMap<String, Arc<InMemoryEventBus<SnapshotEvent>>>>,
    failures: Mutex<FailurePlan>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write touching `collection/document_id` fail with `Rejected`.
    pub fn reject_writes_to(&self, collection: &str, document_id: &str) {
        if let Ok(mut plan) = self.failures.lock() {
            plan.rejected_writes
                .insert((collection.to_string(), document_id.to_string()));
        }
    }

    /// Make reads of `collection` (list, get, new subscriptions) fail with `Unavailable`.
    pub fn fail_reads_of(&self, collection: &str) {
        if let Ok(mut plan) = self.failures.lock() {
            plan.unavailable_reads.insert(collection.to_string());
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut plan) = self.failures.lock() {
            *plan = FailurePlan::default();
        }
    }

    /// Push a feed error to current subscribers of `collection`.
    pub fn emit_feed_error(&self, collection: &str, reason: &str) {
        let feed = self.feed(collection);
        if let Ok(feed) = feed {
            let _ = feed.publish(SnapshotEvent::Failed(StoreError::Unavailable(reason.to_string())));
        }
    }

    /// Current documents of `collection`, bypassing failure injection.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .map(|collections| snapshot_of(&collections, collection).documents)
            .unwrap_or_default()
    }

    fn feed(&self, collection: &str) -> Result<Arc<InMemoryEventBus<SnapshotEvent>>, StoreError> {
        let mut feeds = self.feeds.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(feeds
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(InMemoryEventBus::new()))
            .clone())
    }

    fn check_read(&self, collection: &str) -> Result<(), StoreError> {
        let plan = self.failures.lock().map_err(|_| StoreError::Poisoned)?;
        if plan.unavailable_reads.contains(collection) {
            return Err(StoreError::Unavailable(format!("reads of '{collection}' are failing")));
        }
        Ok(())
    }

    fn check_write(&self, collection: &str, document_id: &str) -> Result<(), StoreError> {
        let plan = self.failures.lock().map_err(|_| StoreError::Poisoned)?;
        if plan
            .rejected_writes
            .contains(&(collection.to_string(), document_id.to_string()))
        {
            return Err(StoreError::Rejected(format!(
                "write to {collection}/{document_id} refused"
            )));
        }
        Ok(())
    }

    /// Apply `mutate` under the write lock, then publish snapshots of every
    /// touched collection while still holding it so feeds stay ordered.
    fn write<T>(
        &self,
        touched: &[&str],
        mutate: impl FnOnce(&mut HashMap<String, Collection>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let out = mutate(&mut collections)?;

        for collection in touched {
            let snapshot = snapshot_of(&collections, collection);
            if let Err(err) = self.feed(collection)?.publish(SnapshotEvent::Snapshot(snapshot)) {
                tracing::warn!(collection = *collection, "snapshot fan-out failed: {err:?}");
            }
        }
        Ok(out)
    }
}

fn snapshot_of(collections: &HashMap<String, Collection>, collection: &str) -> Snapshot {
    let documents = collections
        .get(collection)
        .map(|docs| {
            docs.iter()
                .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                .collect()
        })
        .unwrap_or_default();
    Snapshot {
        collection: collection.to_string(),
        documents,
    }
}

fn apply_updates(
    collections: &mut HashMap<String, Collection>,
    collection: &str,
    document_id: &str,
    updates: &BTreeMap<String, FieldUpdate>,
) -> Result<(), StoreError> {
    let fields = collections
        .get_mut(collection)
        .and_then(|docs| docs.get_mut(document_id))
        .ok_or_else(|| StoreError::not_found(collection, document_id))?;

    for (name, update) in updates {
        if let Some(value) = update.apply(fields.remove(name)) {
            fields.insert(name.clone(), value);
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn subscribe(&self, collection: &str) -> Subscription<SnapshotEvent> {
        let feed = match self.feed(collection) {
            Ok(feed) => feed,
            Err(err) => return detached(SnapshotEvent::Failed(err)),
        };
        if let Err(err) = self.check_read(collection) {
            return feed.subscribe_with(SnapshotEvent::Failed(err));
        }

        match self.collections.read() {
            // Registered under the read lock so no write can slip in between.
            Ok(collections) => {
                feed.subscribe_with(SnapshotEvent::Snapshot(snapshot_of(&collections, collection)))
            }
            Err(_) => feed.subscribe_with(SnapshotEvent::Failed(StoreError::Poisoned)),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.check_read(collection)?;
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(snapshot_of(&collections, collection).documents)
    }

    async fn get(&self, collection: &str, document_id: &str) -> Result<Option<Document>, StoreError> {
        self.check_read(collection)?;
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(document_id))
            .map(|fields| Document::new(document_id, fields.clone())))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let document_id = Uuid::now_v7().simple().to_string();
        self.write(&[collection], |collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(document_id.clone(), fields);
            Ok(document_id.clone())
        })
    }

    async fn set(&self, collection: &str, document_id: &str, fields: Fields) -> Result<(), StoreError> {
        self.check_write(collection, document_id)?;
        self.write(&[collection], |collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(document_id.to_string(), fields);
            Ok(())
        })
    }

    async fn update(
        &self,
        collection: &str,
        document_id: &str,
        updates: BTreeMap<String, FieldUpdate>,
    ) -> Result<(), StoreError> {
        self.check_write(collection, document_id)?;
        self.write(&[collection], |collections| {
            apply_updates(collections, collection, document_id, &updates)
        })
    }

    async fn delete(&self, collection: &str, document_id: &str) -> Result<(), StoreError> {
        self.check_write(collection, document_id)?;
        self.write(&[collection], |collections| {
            if let Some(docs) = collections.get_mut(collection) {
                docs.remove(document_id);
            }
            Ok(())
        })
    }

    async fn batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        if ops.is_empty() {
            return Ok(());
        }
        for op in &ops {
            self.check_write(op.collection(), op.document_id())?;
        }

        let mut touched: Vec<&str> = ops.iter().map(BatchOp::collection).collect();
        touched.sort_unstable();
        touched.dedup();

        self.write(&touched, |collections| {
            // Work on a copy so a late failure leaves the store untouched.
            let mut staged = collections.clone();
            for op in &ops {
                match op {
                    BatchOp::Set {
                        collection,
                        document_id,
                        fields,
                    } => {
                        staged
                            .entry(collection.clone())
                            .or_default()
                            .insert(document_id.clone(), fields.clone());
                    }
                    BatchOp::Update {
                        collection,
                        document_id,
                        updates,
                    } => apply_updates(&mut staged, collection, document_id, updates)?,
                    BatchOp::Delete {
                        collection,
                        document_id,
                    } => {
                        if let Some(docs) = staged.get_mut(collection) {
                            docs.remove(document_id);
                        }
                    }
                }
            }
            *collections = staged;
            Ok(())
        })
    }
}

fn detached(initial: SnapshotEvent) -> Subscription<SnapshotEvent> {
    InMemoryEventBus::new().subscribe_with(initial)
}
