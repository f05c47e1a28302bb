use std::collections::BTreeSet;

use serde::Serialize;

use homestock_core::{DomainError, DomainResult, Entity, FieldValue, Fields, ItemId, TagLabel};

/// Remote field holding a tag's item ids.
pub const ITEMS_FIELD: &str = "items";

/// A user-defined label attached to a set of items.
///
/// The label is the tag document's key, which is what keeps labels unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    label: TagLabel,
    item_ids: BTreeSet<ItemId>,
}

impl Tag {
    /// A fresh tag with no items.
    pub fn new(label: TagLabel) -> Self {
        Self {
            label,
            item_ids: BTreeSet::new(),
        }
    }

    /// Parse a tag document. A missing or null `items` field means no items.
    pub fn parse(label: &str, fields: &Fields) -> DomainResult<Self> {
        let label = TagLabel::new(label)?;
        let item_ids = match fields.get(ITEMS_FIELD) {
            None | Some(FieldValue::Null) => BTreeSet::new(),
            Some(FieldValue::Array(values)) => values
                .iter()
                .map(|value| {
                    value
                        .as_str()
                        .ok_or_else(|| DomainError::wrong_type(ITEMS_FIELD, "array of strings", value))
                        .and_then(ItemId::new)
                })
                .collect::<DomainResult<_>>()?,
            Some(other) => return Err(DomainError::wrong_type(ITEMS_FIELD, "array", other)),
        };
        Ok(Self { label, item_ids })
    }

    /// Document fields for a tag: `{items: [..]}`.
    pub fn to_fields(&self) -> Fields {
        let ids: Vec<FieldValue> = self
            .item_ids
            .iter()
            .map(|id| FieldValue::from(id.as_str()))
            .collect();
        Fields::from([(ITEMS_FIELD.to_string(), FieldValue::Array(ids))])
    }

    pub fn label(&self) -> &TagLabel {
        &self.label
    }

    pub fn item_ids(&self) -> &BTreeSet<ItemId> {
        &self.item_ids
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.item_ids.contains(id)
    }

    /// Add ids to the local copy (set union); returns how many were new.
    pub fn add_items<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) -> usize {
        ids.into_iter()
            .filter(|id| self.item_ids.insert((*id).clone()))
            .count()
    }
}

impl Entity for Tag {
    type Id = TagLabel;

    fn id(&self) -> &Self::Id {
        &self.label
    }
}
