//! Configuration loading and representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ITEMS_COLLECTION_ENV: &str = "HOMESTOCK_ITEMS_COLLECTION";
pub const TAGS_COLLECTION_ENV: &str = "HOMESTOCK_TAGS_COLLECTION";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Where the inventory lives in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub items_collection: String,
    pub tags_collection: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            items_collection: "items".to_string(),
            tags_collection: "tags".to_string(),
        }
    }
}

impl InventoryConfig {
    /// Read from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |key: &'static str, default: String| match lookup(key) {
            Some(value) => value,
            None => {
                tracing::warn!("{key} not set; using default '{default}'");
                default
            }
        };

        let config = Self {
            items_collection: read(ITEMS_COLLECTION_ENV, defaults.items_collection),
            tags_collection: read(TAGS_COLLECTION_ENV, defaults.tags_collection),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.items_collection.trim().is_empty() {
            return Err(ConfigError::Empty("items_collection"));
        }
        if self.tags_collection.trim().is_empty() {
            return Err(ConfigError::Empty("tags_collection"));
        }
        Ok(())
    }
}
