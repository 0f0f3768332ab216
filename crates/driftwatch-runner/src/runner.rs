//! Drift run orchestration
//!
//! A run never aborts because one table misbehaves: contract load failures,
//! guardrail trips, and catalog errors all become persisted payloads with an
//! ERROR or NO_DATA status, and the sweep moves on. Only object store
//! failures while persisting a payload abort the run, since at that point
//! nothing can be recorded anyway.

use crate::registry::{load_registry, TableEntry};
use chrono::Utc;
use driftwatch_catalog::{CatalogAdapter, TableRef};
use driftwatch_core::{
    Config, ContractDocument, RunPayload, RunRefs, RunStatus, Severity, SeverityCounts, TableMeta,
};
use driftwatch_engine::compute_diff;
use driftwatch_report::ReportGenerator;
use driftwatch_store::{get_json, put_json, DataLocation, ObjectStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Fallback values for fields a registry entry leaves unset, taken from the
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDefaults {
    pub contract_bucket: String,
    pub contract_key: String,
    pub report_bucket: String,
    pub database: String,
    pub table: String,
    pub data_location: String,
}

impl RunDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            contract_bucket: config.contracts.bucket.clone(),
            contract_key: config.contracts.default_key.clone(),
            report_bucket: config.reports.bucket.clone(),
            database: config.table.database.clone(),
            table: config.table.name.clone(),
            data_location: config.table.data_location.clone(),
        }
    }
}

/// Where a run's diff payload was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLocation {
    pub bucket: String,
    pub key: String,
}

/// In-process summary of one table's run. The full detail lives in the
/// persisted payload at `diff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Fully qualified table name
    pub table: String,

    pub status: RunStatus,

    /// Overall severity, present for OK runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_severity: Option<Severity>,

    /// Per-tier counts, present for OK runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<SeverityCounts>,

    /// Where the payload landed
    pub diff: DiffLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// How the run was driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Single,
    Registry,
}

/// Aggregate result of one `run` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: RunMode,

    /// Number of registry entries actually attempted
    pub processed: usize,

    pub results: Vec<RunOutcome>,
}

impl RunSummary {
    /// True when any outcome has a BREAKING overall severity.
    pub fn any_breaking(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.overall_severity == Some(Severity::Breaking))
    }

    /// True when any outcome is an ERROR.
    pub fn any_errors(&self) -> bool {
        self.results.iter().any(|r| r.status == RunStatus::Error)
    }
}

/// Errors that abort a run outright.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to persist run payload: {0}")]
    Persist(#[from] StoreError),
}

/// Orchestrates drift runs against one store and one catalog adapter.
pub struct DriftRunner {
    store: Arc<dyn ObjectStore>,
    catalog: Arc<dyn CatalogAdapter>,
    reporter: Option<ReportGenerator>,
}

impl DriftRunner {
    pub fn new(store: Arc<dyn ObjectStore>, catalog: Arc<dyn CatalogAdapter>) -> Self {
        Self {
            store,
            catalog,
            reporter: None,
        }
    }

    /// Attach a report generator; each persisted payload then gets rendered
    /// artifacts as well.
    pub fn with_reporter(mut self, reporter: ReportGenerator) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Run drift checks per the configuration: a registry sweep when a
    /// registry location is configured, otherwise a single table from the
    /// `[table]` defaults.
    pub async fn run(&self, config: &Config) -> Result<RunSummary, RunError> {
        let defaults = RunDefaults::from_config(config);
        if config.registry_configured() {
            self.run_registry(config, &defaults).await
        } else {
            let outcome = self.run_table(&TableEntry::default(), &defaults).await?;
            self.maybe_report(&outcome).await;
            Ok(RunSummary {
                mode: RunMode::Single,
                processed: 1,
                results: vec![outcome],
            })
        }
    }

    async fn run_registry(
        &self,
        config: &Config,
        defaults: &RunDefaults,
    ) -> Result<RunSummary, RunError> {
        let entries = match load_registry(
            self.store.as_ref(),
            &config.registry.bucket,
            &config.registry.key,
        )
        .await
        {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    bucket = %config.registry.bucket,
                    key = %config.registry.key,
                    error = %err,
                    "registry load failed"
                );
                let table = TableMeta::new(defaults.database.clone(), defaults.table.clone());
                let refs = RunRefs {
                    contract_bucket: defaults.contract_bucket.clone(),
                    contract_key: defaults.contract_key.clone(),
                    report_bucket: defaults.report_bucket.clone(),
                    data_location: String::new(),
                };
                let payload = RunPayload::error(
                    table.clone(),
                    refs,
                    self.catalog.name(),
                    format!("RegistryLoadError: {}", err),
                );
                let diff = self.write_diff(&defaults.report_bucket, &table, &payload).await?;
                let outcome = RunOutcome {
                    table: table.fqn(),
                    status: RunStatus::Error,
                    overall_severity: None,
                    counts: None,
                    diff,
                    error: payload.error.clone(),
                };
                self.maybe_report(&outcome).await;
                return Ok(RunSummary {
                    mode: RunMode::Registry,
                    processed: 0,
                    results: vec![outcome],
                });
            }
        };

        let cap = config.registry.max_tables_per_run;
        if entries.len() > cap {
            warn!(
                entries = entries.len(),
                cap = cap,
                "registry exceeds per-run cap, truncating"
            );
        }

        let mut results = Vec::new();
        for entry in entries.iter().take(cap) {
            let outcome = self.run_table(entry, defaults).await?;
            self.maybe_report(&outcome).await;
            results.push(outcome);
        }

        info!(processed = results.len(), "registry sweep complete");
        Ok(RunSummary {
            mode: RunMode::Registry,
            processed: results.len(),
            results,
        })
    }

    /// Run one table end to end. Domain failures come back as ERROR or
    /// NO_DATA outcomes with a persisted payload; only persistence failures
    /// return `Err`.
    async fn run_table(
        &self,
        entry: &TableEntry,
        defaults: &RunDefaults,
    ) -> Result<RunOutcome, RunError> {
        let table = TableMeta::new(
            entry.database.clone().unwrap_or_else(|| defaults.database.clone()),
            entry.table.clone().unwrap_or_else(|| defaults.table.clone()),
        );
        let refs = RunRefs {
            contract_bucket: entry
                .contract_bucket
                .clone()
                .unwrap_or_else(|| defaults.contract_bucket.clone()),
            contract_key: entry
                .contract_key
                .clone()
                .unwrap_or_else(|| defaults.contract_key.clone()),
            report_bucket: entry
                .report_bucket
                .clone()
                .unwrap_or_else(|| defaults.report_bucket.clone()),
            data_location: entry
                .data_location
                .clone()
                .unwrap_or_else(|| defaults.data_location.clone()),
        };

        let contract: ContractDocument = match get_json(
            self.store.as_ref(),
            &refs.contract_bucket,
            &refs.contract_key,
        )
        .await
        {
            Ok(contract) => contract,
            Err(err) => {
                warn!(table = %table, error = %err, "contract load failed");
                return self
                    .error_outcome(table, refs, format!("ContractLoadError: {}", err))
                    .await;
            }
        };

        // No-data guardrail: an empty data location disables it, anything
        // else must show at least one object before we diff. A table whose
        // load never ran would otherwise report every column as removed.
        if !refs.data_location.is_empty() {
            match self.data_present(&refs.data_location).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(table = %table, location = %refs.data_location, "no data found, skipping diff");
                    let payload = RunPayload::no_data(
                        table.clone(),
                        contract.contract_version.clone(),
                        refs.clone(),
                        self.catalog.name(),
                    );
                    let diff = self.write_diff(&refs.report_bucket, &table, &payload).await?;
                    return Ok(RunOutcome {
                        table: table.fqn(),
                        status: RunStatus::NoData,
                        overall_severity: None,
                        counts: None,
                        diff,
                        error: None,
                    });
                }
                Err(err) => {
                    warn!(table = %table, error = %err, "data location check failed");
                    return self
                        .error_outcome(table, refs, format!("DataLocationError: {}", err))
                        .await;
                }
            }
        }

        let actual = match self
            .catalog
            .fetch_columns(&TableRef::new(table.database.clone(), table.name.clone()))
            .await
        {
            Ok(columns) => columns,
            Err(err) => {
                warn!(table = %table, error = %err, "schema fetch failed");
                return self
                    .error_outcome(table, refs, format!("SchemaFetchError: {}", err))
                    .await;
            }
        };

        let diff = compute_diff(&contract.columns, &actual);
        info!(
            table = %table,
            overall = %diff.overall_severity,
            changes = diff.changes.len(),
            "drift check complete"
        );

        let overall_severity = diff.overall_severity;
        let counts = diff.counts;
        let payload = RunPayload::ok(
            table.clone(),
            contract.contract_version.clone(),
            refs.clone(),
            self.catalog.name(),
            diff,
        );
        let diff_location = self.write_diff(&refs.report_bucket, &table, &payload).await?;

        Ok(RunOutcome {
            table: table.fqn(),
            status: RunStatus::Ok,
            overall_severity: Some(overall_severity),
            counts: Some(counts),
            diff: diff_location,
            error: None,
        })
    }

    /// Persist an ERROR payload and build its outcome.
    async fn error_outcome(
        &self,
        table: TableMeta,
        refs: RunRefs,
        error: String,
    ) -> Result<RunOutcome, RunError> {
        let report_bucket = refs.report_bucket.clone();
        let payload = RunPayload::error(table.clone(), refs, self.catalog.name(), error);
        let diff = self.write_diff(&report_bucket, &table, &payload).await?;
        Ok(RunOutcome {
            table: table.fqn(),
            status: RunStatus::Error,
            overall_severity: None,
            counts: None,
            diff,
            error: payload.error.clone(),
        })
    }

    /// Check whether the data location holds at least one object.
    async fn data_present(&self, location: &str) -> Result<bool, StoreError> {
        let parsed = DataLocation::parse(location)?;
        self.store.has_any(&parsed.bucket, &parsed.prefix).await
    }

    /// Persist a payload under `diffs/{database}.{table}/{timestamp}.diff.json`.
    async fn write_diff(
        &self,
        report_bucket: &str,
        table: &TableMeta,
        payload: &RunPayload,
    ) -> Result<DiffLocation, RunError> {
        let key = format!(
            "diffs/{}.{}/{}.diff.json",
            table.database,
            table.name,
            Utc::now().timestamp()
        );
        put_json(self.store.as_ref(), report_bucket, &key, payload).await?;
        Ok(DiffLocation {
            bucket: report_bucket.to_string(),
            key,
        })
    }

    /// Render report artifacts for an outcome. Failures are logged and
    /// swallowed; a broken renderer must not fail the run that produced a
    /// perfectly good payload.
    async fn maybe_report(&self, outcome: &RunOutcome) {
        if let Some(reporter) = &self.reporter {
            if let Err(err) = reporter.generate(&outcome.diff.bucket, &outcome.diff.key).await {
                warn!(
                    table = %outcome.table,
                    key = %outcome.diff.key,
                    error = %err,
                    "report generation failed"
                );
            }
        }
    }
}
