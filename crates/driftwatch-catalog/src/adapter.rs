//! The catalog adapter trait

use driftwatch_core::Column;
use std::fmt;

/// Identifies a table within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    /// Database or schema holding the table
    pub database: String,

    /// Table name
    pub name: String,
}

impl TableRef {
    pub fn new(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            name: name.into(),
        }
    }

    /// Fully qualified `database.name` form.
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.name)
    }
}

/// Errors from schema fetch operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Adapter configuration error: {0}")]
    ConfigError(String),
}

/// A source of observed table schemas.
///
/// Implementations fetch column metadata from a warehouse or catalog and
/// normalize it into [`Column`] values with free-form type descriptors. The
/// order of returned columns must match the catalog's declared order.
#[async_trait::async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Adapter name, recorded in run payloads as `actual_source`.
    fn name(&self) -> &'static str;

    /// Fetch the observed columns of a table.
    async fn fetch_columns(&self, table: &TableRef) -> Result<Vec<Column>, FetchError>;

    /// Check connectivity and credentials without touching a table.
    async fn test_connection(&self) -> Result<(), FetchError>;
}
