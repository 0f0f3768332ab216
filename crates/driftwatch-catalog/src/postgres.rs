//! PostgreSQL catalog adapter
//!
//! Reads column metadata from `information_schema.columns`. The [`TableRef`]
//! database component maps to a PostgreSQL schema (the connection already
//! pins the database).
//!
//! Descriptors keep the raw `data_type` spelling except for `numeric`, which
//! becomes `decimal(P,S)` when precision and scale are reported so that
//! contract decimals compare dimension-wise instead of textually.

use crate::adapter::{CatalogAdapter, FetchError, TableRef};
use driftwatch_core::{Column, Nullability};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, warn};

const COLUMNS_QUERY: &str = r#"
    SELECT
        column_name,
        data_type,
        is_nullable,
        numeric_precision,
        numeric_scale,
        udt_name
    FROM information_schema.columns
    WHERE table_schema = $1
      AND table_name = $2
    ORDER BY ordinal_position
"#;

/// Catalog adapter backed by a live PostgreSQL connection.
pub struct PostgresCatalog {
    client: Client,
    host: String,
    port: u16,
}

impl PostgresCatalog {
    /// Connect without TLS.
    pub async fn connect(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let host = host.into();
        let config = format!(
            "host={} port={} dbname={} user={} password={}",
            host,
            port,
            database.into(),
            user.into(),
            password.into()
        );

        let (client, connection) = tokio_postgres::connect(&config, NoTls)
            .await
            .map_err(|e| {
                FetchError::ConnectionError(format!(
                    "Failed to connect to PostgreSQL at {}:{}: {}",
                    host, port, e
                ))
            })?;

        let conn_host = host.clone();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(host = %conn_host, port = port, error = %e, "postgres connection error");
            }
        });

        Ok(Self { client, host, port })
    }

    /// Connect with TLS. Use for anything that leaves localhost.
    pub async fn connect_with_tls(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let host = host.into();
        let config = format!(
            "host={} port={} dbname={} user={} password={}",
            host,
            port,
            database.into(),
            user.into(),
            password.into()
        );

        let connector = TlsConnector::builder().build().map_err(|e| {
            FetchError::ConfigError(format!("Failed to create TLS connector: {}", e))
        })?;
        let tls = MakeTlsConnector::new(connector);

        let (client, connection) = tokio_postgres::connect(&config, tls).await.map_err(|e| {
            FetchError::ConnectionError(format!(
                "Failed to connect to PostgreSQL at {}:{} with TLS: {}",
                host, port, e
            ))
        })?;

        let conn_host = host.clone();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(host = %conn_host, port = port, error = %e, "postgres TLS connection error");
            }
        });

        Ok(Self { client, host, port })
    }

    /// Connect from a standard connection string, e.g.
    /// `host=localhost port=5432 dbname=analytics user=drift password=secret`.
    pub async fn from_connection_string(conn_str: &str) -> Result<Self, FetchError> {
        let config: tokio_postgres::Config = conn_str
            .parse()
            .map_err(|e| FetchError::ConfigError(format!("Invalid connection string: {}", e)))?;
        let host = config
            .get_hosts()
            .first()
            .map(|h| format!("{:?}", h))
            .unwrap_or_else(|| "localhost".to_string());
        let port = config.get_ports().first().copied().unwrap_or(5432);

        let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .map_err(|e| FetchError::ConnectionError(format!("Failed to connect: {}", e)))?;

        let conn_host = host.clone();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(host = %conn_host, port = port, error = %e, "postgres connection error");
            }
        });

        Ok(Self { client, host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Build a type descriptor from an information_schema row.
    fn descriptor(
        data_type: &str,
        udt_name: &str,
        precision: Option<i32>,
        scale: Option<i32>,
    ) -> String {
        if data_type == "numeric" || data_type == "decimal" {
            return match (precision, scale) {
                (Some(p), Some(s)) => format!("decimal({},{})", p, s),
                _ => "decimal".to_string(),
            };
        }
        // information_schema reports ARRAY with the element in udt_name
        // as _elem; surface it in the usual elem[] spelling
        if data_type == "ARRAY" {
            if let Some(element) = udt_name.strip_prefix('_') {
                return format!("{}[]", element);
            }
        }
        data_type.to_string()
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for PostgresCatalog {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_columns(&self, table: &TableRef) -> Result<Vec<Column>, FetchError> {
        let rows = self
            .client
            .query(COLUMNS_QUERY, &[&table.database, &table.name])
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("permission denied") {
                    FetchError::PermissionDenied(format!("{}: {}", table.fqn(), message))
                } else {
                    FetchError::QueryError(message)
                }
            })?;

        if rows.is_empty() {
            return Err(FetchError::TableNotFound(table.fqn()));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get(0);
            let data_type: String = row.get(1);
            let is_nullable: String = row.get(2);
            let precision: Option<i32> = row.get(3);
            let scale: Option<i32> = row.get(4);
            let udt_name: String = row.get(5);

            let nullable = match is_nullable.to_uppercase().as_str() {
                "YES" => Nullability::Yes,
                "NO" => Nullability::No,
                _ => Nullability::Unknown,
            };

            columns.push(
                Column::new(name, Self::descriptor(&data_type, &udt_name, precision, scale))
                    .with_nullability(nullable),
            );
        }

        debug!(table = %table.fqn(), columns = columns.len(), "fetched postgres schema");
        Ok(columns)
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        self.client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| FetchError::QueryError(format!("Connection test failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_descriptor_with_dimensions() {
        assert_eq!(
            PostgresCatalog::descriptor("numeric", "numeric", Some(12), Some(2)),
            "decimal(12,2)"
        );
    }

    #[test]
    fn test_numeric_descriptor_without_dimensions() {
        assert_eq!(
            PostgresCatalog::descriptor("numeric", "numeric", None, None),
            "decimal"
        );
        assert_eq!(
            PostgresCatalog::descriptor("numeric", "numeric", Some(10), None),
            "decimal"
        );
    }

    #[test]
    fn test_plain_types_keep_raw_spelling() {
        assert_eq!(
            PostgresCatalog::descriptor("bigint", "int8", None, None),
            "bigint"
        );
        assert_eq!(
            PostgresCatalog::descriptor("character varying", "varchar", None, None),
            "character varying"
        );
        assert_eq!(
            PostgresCatalog::descriptor("timestamp without time zone", "timestamp", None, None),
            "timestamp without time zone"
        );
    }

    #[test]
    fn test_array_descriptor() {
        assert_eq!(
            PostgresCatalog::descriptor("ARRAY", "_int4", None, None),
            "int4[]"
        );
        assert_eq!(
            PostgresCatalog::descriptor("ARRAY", "weird", None, None),
            "ARRAY"
        );
    }
}
