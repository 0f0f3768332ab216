//! Table registry documents
//!
//! A registry is a JSON document listing the tables a sweep should cover.
//! Two shapes are accepted: a bare array of entries, or an object with a
//! `tables` array. Every entry field is optional; unset fields fall back to
//! the configured defaults at run time.

use driftwatch_store::{ObjectStore, StoreError};
use serde::{Deserialize, Serialize};

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_bucket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_bucket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RegistryDocument {
    Wrapped { tables: Vec<TableEntry> },
    Bare(Vec<TableEntry>),
}

/// Errors from loading or parsing a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry must be a list of table entries or an object with a 'tables' list: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse a registry document from raw JSON bytes.
pub fn parse_registry(bytes: &[u8]) -> Result<Vec<TableEntry>, RegistryError> {
    match serde_json::from_slice::<RegistryDocument>(bytes) {
        Ok(RegistryDocument::Wrapped { tables }) => Ok(tables),
        Ok(RegistryDocument::Bare(entries)) => Ok(entries),
        Err(e) => Err(RegistryError::Invalid(e.to_string())),
    }
}

/// Load and parse a registry from the object store.
pub async fn load_registry(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<Vec<TableEntry>, RegistryError> {
    let bytes = store.get(bucket, key).await?;
    parse_registry(&bytes)
}
