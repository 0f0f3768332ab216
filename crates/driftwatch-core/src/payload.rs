//! Persisted run payloads
//!
//! Every drift run, successful or not, produces one payload document in the
//! report store. Consumers rely on the `diff` field always being present and
//! well-formed, so NO_DATA and ERROR runs carry an empty SAFE diff instead
//! of omitting it.

use crate::drift::DiffResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome status of one drift run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Comparison ran and produced a diff
    Ok,
    /// Data location had no objects, comparison skipped
    NoData,
    /// Run failed before a comparison could happen
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoData => "NO_DATA",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Table identity embedded in payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableMeta {
    pub database: String,
    pub name: String,
}

impl TableMeta {
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

impl fmt::Display for TableMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.name)
    }
}

/// Source and destination references recorded with each run, flattened into
/// the payload so the document stays a single level deep.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunRefs {
    /// Bucket the contract was read from
    #[serde(default)]
    pub contract_bucket: String,

    /// Key of the contract document
    #[serde(default)]
    pub contract_key: String,

    /// Bucket diff payloads and reports are written to
    #[serde(default)]
    pub report_bucket: String,

    /// `bucket/prefix` reference guarding the run, empty when disabled
    #[serde(default)]
    pub data_location: String,
}

/// The `.diff.json` document written to the report store for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunPayload {
    /// RFC 3339 UTC timestamp of the run
    pub timestamp: String,

    /// Outcome status
    pub status: RunStatus,

    /// Table the run targeted
    pub table: TableMeta,

    /// Contract version label, absent when the contract never loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,

    #[serde(flatten)]
    pub refs: RunRefs,

    /// Catalog adapter that supplied the actual schema
    #[serde(default)]
    pub actual_source: String,

    /// Failure description for ERROR runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Diff result; empty and SAFE for NO_DATA and ERROR runs
    pub diff: DiffResult,
}

impl RunPayload {
    /// Payload for a completed comparison.
    pub fn ok(
        table: TableMeta,
        contract_version: Option<String>,
        refs: RunRefs,
        actual_source: impl Into<String>,
        diff: DiffResult,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: RunStatus::Ok,
            table,
            contract_version,
            refs,
            actual_source: actual_source.into(),
            error: None,
            diff,
        }
    }

    /// Payload for a run skipped by the no-data guardrail.
    pub fn no_data(
        table: TableMeta,
        contract_version: Option<String>,
        refs: RunRefs,
        actual_source: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: RunStatus::NoData,
            table,
            contract_version,
            refs,
            actual_source: actual_source.into(),
            error: None,
            diff: DiffResult::empty(),
        }
    }

    /// Payload for a failed run.
    pub fn error(
        table: TableMeta,
        refs: RunRefs,
        actual_source: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: RunStatus::Error,
            table,
            contract_version: None,
            refs,
            actual_source: actual_source.into(),
            error: Some(error.into()),
            diff: DiffResult::empty(),
        }
    }
}
