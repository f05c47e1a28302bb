//! Remote document store boundary.
//!
//! The inventory talks to its backing database only through `DocumentStore`:
//! a live snapshot feed per collection plus plain document CRUD and atomic
//! batches. `InMemoryDocumentStore` implements it for development and tests.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{DocumentStore, SnapshotEvent, StoreError};
