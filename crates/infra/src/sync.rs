//! Snapshot-driven inventory state container.
//!
//! `InventorySyncStore` owns the visible item list and its selection. The only
//! way the list changes is `apply`, fed either by hand or by `pump`ing the
//! store's change feed. Observers learn about changes through `subscribe`.
//!
//! ```text
//! store feed ──SnapshotEvent──▶ apply ──▶ InventoryView ──InventoryNotice──▶ subscribers
//! ```

use std::sync::Arc;
use std::sync::mpsc::TryRecvError;

use chrono::Utc;
use thiserror::Error;

use homestock_core::{DomainError, ItemId, Snapshot};
use homestock_events::{EventBus, InMemoryEventBus, InventoryNotice, Subscription};
use homestock_inventory::{InventoryView, Item};

use crate::document_store::{DocumentStore, SnapshotEvent, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A document in the snapshot could not be parsed; the snapshot was dropped.
    #[error("bad document '{document_id}': {source}")]
    BadDocument {
        document_id: String,
        #[source]
        source: DomainError,
    },

    /// The change feed reported an error.
    #[error("remote read failed: {0}")]
    RemoteRead(#[from] StoreError),

    #[error("snapshot for collection '{got}' delivered to '{expected}' store")]
    UnexpectedCollection { expected: String, got: String },
}

/// Parse every document of a snapshot, all or nothing.
pub fn parse_snapshot(snapshot: &Snapshot) -> Result<Vec<Item>, SyncError> {
    snapshot
        .documents
        .iter()
        .map(|doc| {
            Item::parse(&doc.id, &doc.fields).map_err(|source| SyncError::BadDocument {
                document_id: doc.id.clone(),
                source,
            })
        })
        .collect()
}

pub struct InventorySyncStore {
    collection: String,
    view: InventoryView,
    notices: Arc<InMemoryEventBus<InventoryNotice>>,
    feed: Option<Subscription<SnapshotEvent>>,
}

impl InventorySyncStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            view: InventoryView::new(),
            notices: Arc::new(InMemoryEventBus::new()),
            feed: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Start listening to the store's feed for our collection.
    ///
    /// Replaces any previous feed. The store delivers the current snapshot
    /// right away; it is applied on the next `pump`.
    pub fn attach(&mut self, store: &dyn DocumentStore) {
        tracing::debug!(collection = %self.collection, "attaching to change feed");
        self.feed = Some(store.subscribe(&self.collection));
    }

    /// Stop listening. The current list stays as it is.
    pub fn detach(&mut self) {
        self.feed = None;
    }

    pub fn is_attached(&self) -> bool {
        self.feed.is_some()
    }

    /// Apply every feed delivery queued so far, without blocking.
    ///
    /// Returns how many deliveries were processed. A closed feed detaches.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let next = match &self.feed {
                Some(feed) => feed.try_recv(),
                None => return processed,
            };
            match next {
                Ok(event) => {
                    // Failures are already logged and published as notices.
                    let _ = self.apply(event);
                    processed += 1;
                }
                Err(TryRecvError::Empty) => return processed,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!(collection = %self.collection, "change feed closed; detaching");
                    self.feed = None;
                    return processed;
                }
            }
        }
    }

    /// Single update entry point.
    ///
    /// A snapshot replaces the list wholesale (selection cleared) only if
    /// every document parses; otherwise the previous list is kept untouched.
    /// A feed error also keeps the previous list. Returns the new revision.
    pub fn apply(&mut self, event: SnapshotEvent) -> Result<u64, SyncError> {
        match event {
            SnapshotEvent::Snapshot(snapshot) => self.apply_snapshot(&snapshot),
            SnapshotEvent::Failed(err) => {
                tracing::error!(collection = %self.collection, error = %err, "change feed reported an error; keeping stale list");
                self.notify(InventoryNotice::ReadFailed {
                    reason: err.to_string(),
                });
                Err(SyncError::RemoteRead(err))
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<u64, SyncError> {
        if snapshot.collection != self.collection {
            tracing::warn!(expected = %self.collection, got = %snapshot.collection, "ignoring snapshot for another collection");
            return Err(SyncError::UnexpectedCollection {
                expected: self.collection.clone(),
                got: snapshot.collection.clone(),
            });
        }

        let items = match parse_snapshot(snapshot) {
            Ok(items) => items,
            Err(err) => {
                tracing::error!(collection = %self.collection, error = %err, "rejecting snapshot");
                if let SyncError::BadDocument { document_id, source } = &err {
                    self.notify(InventoryNotice::SnapshotRejected {
                        document_id: document_id.clone(),
                        reason: source.to_string(),
                    });
                }
                return Err(err);
            }
        };

        let item_count = items.len();
        let revision = self.view.replace(items);
        tracing::info!(collection = %self.collection, revision, items = item_count, "inventory snapshot applied");

        self.notify(InventoryNotice::ListReplaced {
            revision,
            item_count,
            at: Utc::now(),
        });
        Ok(revision)
    }

    /// Observe changes to the list and select mode.
    pub fn subscribe(&self) -> Subscription<InventoryNotice> {
        self.notices.subscribe()
    }

    pub fn view(&self) -> &InventoryView {
        &self.view
    }

    pub fn items(&self) -> &[Item] {
        self.view.items()
    }

    pub fn enter_select_mode(&mut self) {
        if !self.view.in_select_mode() {
            self.view.enter_select_mode();
            self.notify(InventoryNotice::SelectModeChanged { active: true });
        }
    }

    /// Leave select mode; every mark is cleared.
    pub fn exit_select_mode(&mut self) {
        if self.view.in_select_mode() {
            self.view.exit_select_mode();
            self.notify(InventoryNotice::SelectModeChanged { active: false });
        }
    }

    pub fn toggle(&mut self, id: &ItemId) -> bool {
        self.view.toggle(id)
    }

    pub fn set_selected(&mut self, id: &ItemId, selected: bool) -> bool {
        self.view.set_selected(id, selected)
    }

    /// Selected items in list order; input to the bulk actions.
    pub fn selected_items(&self) -> Vec<Item> {
        self.view.selected_items()
    }

    /// Unmark everything after a bulk action, staying in select mode.
    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
    }

    fn notify(&self, notice: InventoryNotice) {
        tracing::debug!(kind = notice.kind(), "publishing inventory notice");
        if let Err(err) = self.notices.publish(notice) {
            tracing::warn!("failed to publish inventory notice: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use homestock_core::{Document, Entity, FieldValue, Fields};
    use homestock_inventory::field;

    use crate::document_store::InMemoryDocumentStore;

    fn item_fields(description: &str, cost: Option<&str>) -> Fields {
        let mut fields = Fields::new();
        fields.insert(field::DESCRIPTION.into(), description.into());
        fields.insert(
            field::ACQUISITION_DATE.into(),
            Utc.with_ymd_and_hms(2023, 3, 3, 0, 0, 0).unwrap().into(),
        );
        if let Some(cost) = cost {
            fields.insert(field::COST.into(), cost.into());
        }
        fields
    }

    fn snapshot(docs: Vec<(&str, Fields)>) -> SnapshotEvent {
        SnapshotEvent::Snapshot(Snapshot {
            collection: "items".into(),
            documents: docs.into_iter().map(|(id, f)| Document::new(id, f)).collect(),
        })
    }

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    #[test]
    fn snapshot_replaces_list_and_notifies() {
        let mut sync = InventorySyncStore::new("items");
        let notices = sync.subscribe();

        let revision = sync
            .apply(snapshot(vec![("a", item_fields("Chair", Some("40"))), ("b", item_fields("Desk", Some("120.5")))]))
            .unwrap();

        assert_eq!(revision, 1);
        assert_eq!(sync.items().len(), 2);
        assert!(matches!(
            notices.try_recv().unwrap(),
            InventoryNotice::ListReplaced { revision: 1, item_count: 2, .. }
        ));
    }

    #[test]
    fn snapshot_with_bad_document_is_rejected_whole() {
        let mut sync = InventorySyncStore::new("items");
        sync.apply(snapshot(vec![("old", item_fields("Old", Some("1")))])).unwrap();
        let notices = sync.subscribe();

        let err = sync
            .apply(snapshot(vec![("a", item_fields("Chair", Some("40"))), ("b", item_fields("Desk", None))]))
            .unwrap_err();

        assert_eq!(
            err,
            SyncError::BadDocument {
                document_id: "b".into(),
                source: DomainError::missing(field::COST),
            }
        );
        let ids: Vec<_> = sync.items().iter().map(|i| i.id().to_string()).collect();
        assert_eq!(ids, vec!["old"]);
        assert_eq!(sync.view().revision(), 1);
        assert!(matches!(
            notices.try_recv().unwrap(),
            InventoryNotice::SnapshotRejected { ref document_id, .. } if document_id == "b"
        ));
    }

    #[test]
    fn replacement_clears_selection() {
        let mut sync = InventorySyncStore::new("items");
        sync.apply(snapshot(vec![("a", item_fields("Chair", Some("40")))])).unwrap();
        sync.enter_select_mode();
        assert!(sync.toggle(&id("a")));

        sync.apply(snapshot(vec![("a", item_fields("Chair", Some("40")))])).unwrap();

        assert!(sync.selected_items().is_empty());
        assert!(!sync.view().is_selected(&id("a")));
    }

    #[test]
    fn rejected_snapshot_keeps_selection() {
        let mut sync = InventorySyncStore::new("items");
        sync.apply(snapshot(vec![("a", item_fields("Chair", Some("40")))])).unwrap();
        sync.enter_select_mode();
        sync.toggle(&id("a"));

        let mut bad = item_fields("Broken", Some("1"));
        bad.insert(field::COST.into(), FieldValue::Integer(1));
        let _ = sync.apply(snapshot(vec![("z", bad)]));

        assert_eq!(sync.selected_items().len(), 1);
    }

    #[test]
    fn feed_error_keeps_stale_list() {
        let mut sync = InventorySyncStore::new("items");
        sync.apply(snapshot(vec![("a", item_fields("Chair", Some("40")))])).unwrap();
        let notices = sync.subscribe();

        let err = sync
            .apply(SnapshotEvent::Failed(StoreError::Unavailable("offline".into())))
            .unwrap_err();

        assert!(matches!(err, SyncError::RemoteRead(_)));
        assert_eq!(sync.items().len(), 1);
        assert!(matches!(notices.try_recv().unwrap(), InventoryNotice::ReadFailed { .. }));
    }

    #[test]
    fn snapshots_for_other_collections_are_ignored() {
        let mut sync = InventorySyncStore::new("items");
        let err = sync
            .apply(SnapshotEvent::Snapshot(Snapshot {
                collection: "tags".into(),
                documents: vec![],
            }))
            .unwrap_err();
        assert!(matches!(err, SyncError::UnexpectedCollection { .. }));
        assert_eq!(sync.view().revision(), 0);
    }

    #[test]
    fn select_mode_changes_are_published_once() {
        let mut sync = InventorySyncStore::new("items");
        let notices = sync.subscribe();

        sync.enter_select_mode();
        sync.enter_select_mode();
        sync.exit_select_mode();

        assert_eq!(
            notices.drain(),
            vec![
                InventoryNotice::SelectModeChanged { active: true },
                InventoryNotice::SelectModeChanged { active: false },
            ]
        );
    }

    #[tokio::test]
    async fn detach_stops_delivery_and_keeps_the_list() {
        let store = InMemoryDocumentStore::new();
        store.set("items", "a", item_fields("Chair", Some("40"))).await.unwrap();

        let mut sync = InventorySyncStore::new("items");
        sync.attach(&store);
        assert_eq!(sync.pump(), 1);
        assert!(sync.is_attached());

        sync.detach();
        store.set("items", "b", item_fields("Desk", Some("120"))).await.unwrap();

        assert_eq!(sync.pump(), 0);
        assert!(!sync.is_attached());
        assert_eq!(sync.items().len(), 1);
        assert_eq!(sync.view().revision(), 1);
    }

    #[test]
    fn pump_without_feed_does_nothing() {
        let mut sync = InventorySyncStore::new("items");
        assert_eq!(sync.pump(), 0);
        assert!(!sync.is_attached());
    }
}
