//! Change notifications between the inventory state container and its
//! observers (presentation layer, tests, background tasks).

pub mod bus;
pub mod in_memory_bus;
pub mod notice;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notice::InventoryNotice;
