//! driftwatch-runner - Drift run orchestration
//!
//! Wires the pieces together: load a contract from the store, fetch the
//! actual schema from a catalog adapter, diff the two, persist the payload,
//! and hand the artifact to the report generator. Supports single-table runs
//! and registry-driven sweeps over many tables.

pub mod registry;
pub mod runner;

pub use registry::{load_registry, parse_registry, RegistryError, TableEntry};
pub use runner::{
    DiffLocation, DriftRunner, RunDefaults, RunError, RunMode, RunOutcome, RunSummary,
};
