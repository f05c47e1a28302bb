//! Infrastructure layer: document store seam, sync, bulk actions, config.

pub mod bulk;
pub mod config;
pub mod document_store;
pub mod items;
pub mod sync;
pub mod tags;


pub use bulk::{BulkActionCoordinator, BulkActionError, BulkDeleteReport, TagApplyReport, confirm_title, delete_summary};
pub use config::{ConfigError, InventoryConfig};
pub use document_store::{DocumentStore, InMemoryDocumentStore, SnapshotEvent, StoreError};
pub use items::{ItemService, ItemServiceError};
pub use sync::{InventorySyncStore, SyncError};
pub use tags::{TagDirectory, TagError};
