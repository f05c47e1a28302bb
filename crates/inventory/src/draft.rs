//! User-entered item values (the add/edit form), before they become a document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use homestock_core::{Cost, DomainError, Fields};

use crate::item::{field, write_fields};

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("item draft rejected: {}", summarize(.0))]
pub struct DraftRejected(pub Vec<DomainError>);

fn summarize(errors: &[DomainError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw form input for creating or editing an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub description: String,
    pub acquisition_date: Option<DateTime<Utc>>,
    pub cost: String,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub comment: String,
}

impl ItemDraft {
    pub fn new(description: impl Into<String>, acquisition_date: DateTime<Utc>, cost: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            acquisition_date: Some(acquisition_date),
            cost: cost.into(),
            ..Self::default()
        }
    }

    /// Validate against `now` and produce the document fields.
    ///
    /// Description must be non-blank, cost must parse (it is rounded to two
    /// digits), and the acquisition date must be present and not after `now`.
    /// All failures are collected.
    pub fn to_fields(&self, now: DateTime<Utc>) -> Result<Fields, DraftRejected> {
        let mut errors = Vec::new();

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(DomainError::missing(field::DESCRIPTION));
        }

        let acquisition_date = match self.acquisition_date {
            None => {
                errors.push(DomainError::missing(field::ACQUISITION_DATE));
                None
            }
            Some(date) if date > now => {
                errors.push(DomainError::FutureDate(date.to_rfc3339()));
                None
            }
            Some(date) => Some(date),
        };

        let cost_text = self.cost.trim();
        let cost = if cost_text.is_empty() {
            errors.push(DomainError::missing(field::COST));
            None
        } else {
            match Cost::parse(cost_text) {
                Ok(cost) => Some(cost),
                Err(err) => {
                    errors.push(err);
                    None
                }
            }
        };

        match (acquisition_date, cost) {
            (Some(acquisition_date), Some(cost)) if errors.is_empty() => Ok(write_fields(
                description,
                acquisition_date,
                cost,
                [
                    (field::MAKE, self.make.trim()),
                    (field::MODEL, self.model.trim()),
                    (field::SERIAL_NUMBER, self.serial_number.trim()),
                    (field::COMMENT, self.comment.trim()),
                ],
            )),
            _ => Err(DraftRejected(errors)),
        }
    }
}
