//! Remote document value model.
//!
//! Mirrors the shape of a schemaless document database: a document is a map
//! of field names to loosely-typed values, keyed by an opaque id inside a
//! named collection. Domain types are parsed *from* these maps and written
//! back *to* them; nothing here knows about items or tags.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single field value as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Type name reported by `DomainError::WrongType`.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Field name → value map of one document.
pub type Fields = BTreeMap<String, FieldValue>;

/// One stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Complete point-in-time listing of a collection (never a diff).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub collection: String,
    pub documents: Vec<Document>,
}

/// A field-level modification applied by `update` or inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldUpdate {
    /// Overwrite the field.
    Set(FieldValue),
    /// Append each value not already present; existing members are kept in order.
    ArrayUnion(Vec<FieldValue>),
    /// Remove the field.
    Delete,
}

impl FieldUpdate {
    /// Compute the new field value from the current one (`None` = absent).
    pub fn apply(&self, current: Option<FieldValue>) -> Option<FieldValue> {
        match self {
            FieldUpdate::Set(value) => Some(value.clone()),
            FieldUpdate::Delete => None,
            FieldUpdate::ArrayUnion(values) => {
                // A non-array field is replaced, matching document-store semantics.
                let mut merged = match current {
                    Some(FieldValue::Array(existing)) => existing,
                    _ => Vec::new(),
                };
                for value in values {
                    if !merged.contains(value) {
                        merged.push(value.clone());
                    }
                }
                Some(FieldValue::Array(merged))
            }
        }
    }
}

/// One operation inside an atomic multi-document batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatchOp {
    Set {
        collection: String,
        document_id: String,
        fields: Fields,
    },
    Update {
        collection: String,
        document_id: String,
        updates: BTreeMap<String, FieldUpdate>,
    },
    Delete {
        collection: String,
        document_id: String,
    },
}

impl BatchOp {
    pub fn collection(&self) -> &str {
        match self {
            BatchOp::Set { collection, .. }
            | BatchOp::Update { collection, .. }
            | BatchOp::Delete { collection, .. } => collection,
        }
    }

    pub fn document_id(&self) -> &str {
        match self {
            BatchOp::Set { document_id, .. }
            | BatchOp::Update { document_id, .. }
            | BatchOp::Delete { document_id, .. } => document_id,
        }
    }
}
