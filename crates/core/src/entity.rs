//! Identity of stored records.

/// A record identified by its document key.
///
/// Items are keyed by their store-assigned id, tags by their label. Two
/// values with the same id describe the same remote document, whatever
/// their other fields say.
pub trait Entity {
    type Id: Clone + Ord + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
