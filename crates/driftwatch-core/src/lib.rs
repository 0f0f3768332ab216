//! driftwatch-core - Core domain model for schema drift detection
//!
//! This crate defines the shared vocabulary of driftwatch: column schemas,
//! contract documents, drift change records, persisted run payloads, and
//! runtime configuration. The serialized forms of these types are a stable
//! wire format consumed by stores, reports, and downstream tooling, so field
//! names and enum spellings here must not change casually.

pub mod config;
pub mod contract;
pub mod drift;
pub mod payload;
pub mod schema;

pub use config::{
    CatalogConfig, Config, ConfigError, ContractsConfig, RegistryConfig, ReportsConfig,
    StoreConfig, TableDefaults,
};
pub use contract::{ContractDocument, ContractError};
pub use drift::{Change, ChangeKind, ColumnState, DiffResult, Severity, SeverityCounts};
pub use payload::{RunPayload, RunRefs, RunStatus, TableMeta};
pub use schema::{Column, Nullability};
