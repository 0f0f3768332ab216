//! Runtime configuration, loaded from `driftwatch.toml`
//!
//! Every section has sensible defaults so a missing or partial config file
//! still yields a usable setup. A handful of `DRIFTWATCH_*` environment
//! variables override file values for deployment-time wiring.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of registry entries processed per run.
pub const DEFAULT_MAX_TABLES_PER_RUN: usize = 50;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Object store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Contract source settings
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Report destination settings
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Default table coordinates for single-table runs
    #[serde(default)]
    pub table: TableDefaults,

    /// Registry settings for multi-table runs
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Catalog adapter selection
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Object store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the filesystem store; buckets are subdirectories
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

/// Where contract documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Bucket holding contract documents
    #[serde(default = "default_contracts_bucket")]
    pub bucket: String,

    /// Contract key used when a registry entry does not supply one
    #[serde(default)]
    pub default_key: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            bucket: default_contracts_bucket(),
            default_key: String::new(),
        }
    }
}

/// Where diff payloads and rendered reports go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Bucket receiving diff payloads and report artifacts
    #[serde(default = "default_reports_bucket")]
    pub bucket: String,

    /// Whether to render Markdown/HTML artifacts after each run
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            bucket: default_reports_bucket(),
            enabled: true,
        }
    }
}

/// Default table coordinates for single-table runs. Registry entries fall
/// back to these when a field is unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableDefaults {
    #[serde(default)]
    pub database: String,

    #[serde(default)]
    pub name: String,

    /// `bucket/prefix` data location; empty disables the no-data guardrail
    #[serde(default)]
    pub data_location: String,
}

/// Registry settings. A run switches to registry mode when both bucket and
/// key are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub bucket: String,

    #[serde(default)]
    pub key: String,

    /// Cap on registry entries processed in one run
    #[serde(default = "default_max_tables")]
    pub max_tables_per_run: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            key: String::new(),
            max_tables_per_run: default_max_tables(),
        }
    }
}

/// Catalog adapter selection plus connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Adapter kind: `mock` or `postgres`
    #[serde(default = "default_catalog_kind")]
    pub kind: String,

    /// Full connection string; takes precedence over the discrete fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            kind: default_catalog_kind(),
            connection_string: None,
            host: None,
            port: None,
            database: None,
            user: None,
            password: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `DRIFTWATCH_*` environment variable overrides on top of the
    /// file values. Unset variables leave the config untouched.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DRIFTWATCH_STORE_ROOT") {
            self.store.root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("DRIFTWATCH_CONTRACT_BUCKET") {
            self.contracts.bucket = v;
        }
        if let Ok(v) = std::env::var("DRIFTWATCH_CONTRACT_KEY") {
            self.contracts.default_key = v;
        }
        if let Ok(v) = std::env::var("DRIFTWATCH_REPORT_BUCKET") {
            self.reports.bucket = v;
        }
        if let Ok(v) = std::env::var("DRIFTWATCH_REGISTRY_BUCKET") {
            self.registry.bucket = v;
        }
        if let Ok(v) = std::env::var("DRIFTWATCH_REGISTRY_KEY") {
            self.registry.key = v;
        }
        if let Ok(v) = std::env::var("DRIFTWATCH_MAX_TABLES_PER_RUN") {
            if let Ok(n) = v.parse() {
                self.registry.max_tables_per_run = n;
            }
        }
    }

    /// True when a registry location is configured, switching runs from
    /// single-table to registry mode.
    pub fn registry_configured(&self) -> bool {
        !self.registry.bucket.is_empty() && !self.registry.key.is_empty()
    }
}

/// Errors from loading or parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {0}: {1}")]
    Io(String, String),

    #[error("Invalid config: {0}")]
    Parse(String),
}

fn default_store_root() -> PathBuf {
    PathBuf::from("./driftwatch-data")
}

fn default_contracts_bucket() -> String {
    "contracts".to_string()
}

fn default_reports_bucket() -> String {
    "reports".to_string()
}

fn default_catalog_kind() -> String {
    "mock".to_string()
}

fn default_max_tables() -> usize {
    DEFAULT_MAX_TABLES_PER_RUN
}

fn default_true() -> bool {
    true
}
