//! Mock catalog for tests and dry runs

use crate::adapter::{CatalogAdapter, FetchError, TableRef};
use driftwatch_core::Column;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory catalog with injectable schemas and failures.
///
/// Clones share the same table map, so tests can keep a handle and mutate
/// the catalog after wiring it into a runner.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    tables: Arc<RwLock<HashMap<String, Vec<Column>>>>,
    errors: Arc<RwLock<HashMap<String, FetchError>>>,
    fail_connection: bool,
    adapter_name: &'static str,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            fail_connection: false,
            adapter_name: "mock",
        }
    }

    /// Make `test_connection` fail.
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Override the adapter name recorded in payloads.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }

    /// Register the observed columns of a table.
    pub async fn add_table(&self, table: TableRef, columns: Vec<Column>) {
        self.tables.write().await.insert(table.fqn(), columns);
    }

    /// Make fetches for a table fail with the given error.
    pub async fn add_error(&self, table: TableRef, error: FetchError) {
        self.errors.write().await.insert(table.fqn(), error);
    }

    /// Number of registered tables.
    pub async fn table_count(&self) -> usize {
        self.tables.read().await.len()
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for MockCatalog {
    fn name(&self) -> &'static str {
        self.adapter_name
    }

    async fn fetch_columns(&self, table: &TableRef) -> Result<Vec<Column>, FetchError> {
        if let Some(error) = self.errors.read().await.get(&table.fqn()) {
            return Err(error.clone());
        }
        self.tables
            .read()
            .await
            .get(&table.fqn())
            .cloned()
            .ok_or_else(|| FetchError::TableNotFound(table.fqn()))
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        if self.fail_connection {
            return Err(FetchError::ConnectionError(
                "mock connection failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_core::Nullability;
    use pretty_assertions::assert_eq;

    fn sample_columns() -> Vec<Column> {
        vec![
            Column::new("id", "bigint").with_nullability(Nullability::No),
            Column::new("name", "string").with_nullability(Nullability::Yes),
        ]
    }

    #[tokio::test]
    async fn test_fetch_registered_table() {
        let catalog = MockCatalog::new();
        catalog
            .add_table(TableRef::new("db", "users"), sample_columns())
            .await;

        let columns = catalog
            .fetch_columns(&TableRef::new("db", "users"))
            .await
            .unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert_eq!(catalog.table_count().await, 1);
    }

    #[tokio::test]
    async fn test_unregistered_table_is_not_found() {
        let catalog = MockCatalog::new();
        let err = catalog
            .fetch_columns(&TableRef::new("db", "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_injected_error_wins_over_table() {
        let catalog = MockCatalog::new();
        let table = TableRef::new("db", "users");
        catalog.add_table(table.clone(), sample_columns()).await;
        catalog
            .add_error(table.clone(), FetchError::PermissionDenied("nope".to_string()))
            .await;

        let err = catalog.fetch_columns(&table).await.unwrap_err();
        assert!(matches!(err, FetchError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_flag() {
        let healthy = MockCatalog::new();
        assert!(healthy.test_connection().await.is_ok());

        let failing = MockCatalog::new().with_connection_failure();
        assert!(failing.test_connection().await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let catalog = MockCatalog::new();
        let clone = catalog.clone();
        clone
            .add_table(TableRef::new("db", "t"), sample_columns())
            .await;
        assert!(catalog
            .fetch_columns(&TableRef::new("db", "t"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_adapter_name() {
        assert_eq!(MockCatalog::new().name(), "mock");
        assert_eq!(MockCatalog::new().with_name("glue").name(), "glue");
    }
}
