//! driftwatch-catalog - Adapters for observed table schemas
//!
//! A catalog adapter answers one question: what columns does this table have
//! right now? Adapters return plain column lists in catalog order; all
//! comparison logic lives in the engine crate.
//!
//! Available adapters:
//! - [`MockCatalog`]: in-memory, for tests and dry runs
//! - `PostgresCatalog`: information_schema-backed, behind the `postgres`
//!   feature

pub mod adapter;
pub mod mock;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use adapter::{CatalogAdapter, FetchError, TableRef};
pub use mock::MockCatalog;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCatalog;
