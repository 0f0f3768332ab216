//! driftwatch-engine - Schema comparison engine
//!
//! Pure comparison logic: given contract columns and actual columns, produce
//! an ordered, severity-annotated list of changes. No I/O happens here; the
//! runner crate wires this engine to stores and catalogs.

pub mod classify;
pub mod diff;

pub use classify::classify;
pub use diff::compute_diff;
