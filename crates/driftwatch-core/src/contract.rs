//! Contract documents: the declared schema for a dataset
//!
//! A contract is a versioned JSON document listing the columns a dataset is
//! expected to expose. Contracts are the source of truth for drift runs and
//! are typically stored alongside other pipeline artifacts in the object
//! store.

use crate::schema::Column;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A parsed contract document.
///
/// Only `columns` matters to the diff engine. Everything else is metadata
/// that travels into run payloads and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDocument {
    /// Version label for the contract, echoed into run payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,

    /// Dataset this contract describes, e.g. `analytics.orders`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared columns, in contract order
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl ContractDocument {
    /// Parse a contract from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        serde_json::from_str(json).map_err(|e| ContractError::Parse(e.to_string()))
    }

    /// Parse a contract from raw bytes, e.g. an object store body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ContractError> {
        serde_json::from_slice(bytes).map_err(|e| ContractError::Parse(e.to_string()))
    }

    /// Load a contract from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContractError::Io(path.display().to_string(), e.to_string()))?;
        Self::from_json(&content)
    }

    /// Number of declared columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Errors from loading or parsing contract documents.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("IO error reading {0}: {1}")]
    Io(String, String),

    #[error("Invalid contract document: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Nullability;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "contract_version": "1.4.0",
        "dataset": "analytics.orders",
        "columns": [
            {"name": "order_id", "type": "bigint", "nullable": false},
            {"name": "amount", "type": "decimal(12,2)", "nullable": true},
            {"name": "note", "type": "string"}
        ]
    }"#;

    #[test]
    fn test_parse_contract_document() {
        let contract = ContractDocument::from_json(SAMPLE).unwrap();
        assert_eq!(contract.contract_version.as_deref(), Some("1.4.0"));
        assert_eq!(contract.dataset.as_deref(), Some("analytics.orders"));
        assert_eq!(contract.column_count(), 3);
        assert_eq!(contract.columns[0].nullable, Nullability::No);
        assert_eq!(contract.columns[2].nullable, Nullability::Unknown);
    }

    #[test]
    fn test_contract_without_metadata() {
        let contract =
            ContractDocument::from_json(r#"{"columns": [{"name": "a", "type": "int"}]}"#).unwrap();
        assert_eq!(contract.contract_version, None);
        assert_eq!(contract.column_count(), 1);
    }

    #[test]
    fn test_contract_with_no_columns_key() {
        let contract = ContractDocument::from_json("{}").unwrap();
        assert_eq!(contract.column_count(), 0);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = ContractDocument::from_json("{not json").unwrap_err();
        assert!(matches!(err, ContractError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let contract = ContractDocument::from_file(file.path()).unwrap();
        assert_eq!(contract.column_count(), 3);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = ContractDocument::from_file("/nonexistent/contract.json").unwrap_err();
        assert!(matches!(err, ContractError::Io(_, _)));
    }
}
