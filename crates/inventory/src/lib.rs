//! Inventory domain module.
//!
//! Business rules for household inventory items and tags, implemented purely
//! as deterministic domain logic (no IO, no async, no storage). Remote
//! documents come in as `Fields` maps and go back out the same way.

pub mod draft;
pub mod filter;
pub mod item;
pub mod tag;
pub mod view;

pub use draft::{DraftRejected, ItemDraft};
pub use filter::{Filter, FilterKind, FilterSet};
pub use item::{Item, field};
pub use tag::Tag;
pub use view::InventoryView;
