//! `homestock-core`: foundation building blocks.
//!
//! This crate contains **pure** primitives shared by the domain and the
//! infrastructure layer: the error taxonomy, string identifiers, the remote
//! document value model and the fixed-point `Cost` type.

pub mod cost;
pub mod document;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use cost::Cost;
pub use document::{BatchOp, Document, FieldUpdate, FieldValue, Fields, Snapshot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, TagLabel};
pub use value_object::ValueObject;
