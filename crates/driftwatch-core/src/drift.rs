//! Drift change records and diff results
//!
//! These types are the data contract between the diff engine and everything
//! that persists or renders its output. Serialized diff results must survive
//! a round trip through JSON without loss, so every field here has a stable
//! name and every enum a stable spelling.

use crate::schema::{Column, Nullability};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier of a schema change, ordered `Safe < Risky < Breaking`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// No action needed
    Safe,
    /// Compatible in most pipelines, but worth a review
    Risky,
    /// Consumers will break without intervention
    Breaking,
}

impl Severity {
    /// Stable wire spelling, also used in rendered reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Risky => "RISKY",
            Self::Breaking => "BREAKING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a detected schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// Column exists in the actual schema but not in the contract
    AddColumn,
    /// Column exists in the contract but not in the actual schema
    RemoveColumn,
    /// Type descriptor differs between contract and actual schema
    TypeChange,
    /// Nullability differs and both sides reported it
    NullabilityChange,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddColumn => "ADD_COLUMN",
            Self::RemoveColumn => "REMOVE_COLUMN",
            Self::TypeChange => "TYPE_CHANGE",
            Self::NullabilityChange => "NULLABILITY_CHANGE",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one side of a change.
///
/// Type and nullability changes carry different snapshots: a nullability-only
/// change omits the `type` field entirely rather than repeating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    /// Type descriptor, absent on nullability-only snapshots
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Nullability at the time of the snapshot
    #[serde(default)]
    pub nullable: Nullability,
}

impl ColumnState {
    /// Full snapshot of a column: type descriptor plus nullability.
    pub fn of(column: &Column) -> Self {
        Self {
            data_type: Some(column.data_type.clone()),
            nullable: column.nullable,
        }
    }

    /// Nullability-only snapshot used by nullability change records.
    pub fn nullability_of(column: &Column) -> Self {
        Self {
            data_type: None,
            nullable: column.nullable,
        }
    }
}

/// One detected difference between a contract and an actual schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// What kind of change this is
    pub kind: ChangeKind,

    /// Display name of the column. Contract spelling wins when the column
    /// exists on both sides; otherwise the spelling of the side that has it.
    pub column: String,

    /// Contract-side snapshot, `None` for additions
    pub before: Option<ColumnState>,

    /// Actual-side snapshot, `None` for removals
    pub after: Option<ColumnState>,

    /// Assigned severity tier
    pub severity: Severity,

    /// Human-readable explanation, deterministic for identical inputs
    pub rationale: String,
}

/// Change totals per severity tier.
///
/// All three counters serialize even when zero so consumers can index into
/// the counts without existence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(rename = "SAFE")]
    pub safe: usize,
    #[serde(rename = "RISKY")]
    pub risky: usize,
    #[serde(rename = "BREAKING")]
    pub breaking: usize,
}

impl SeverityCounts {
    /// Bump the counter for one severity.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Safe => self.safe += 1,
            Severity::Risky => self.risky += 1,
            Severity::Breaking => self.breaking += 1,
        }
    }

    /// Counter value for one severity.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Safe => self.safe,
            Severity::Risky => self.risky,
            Severity::Breaking => self.breaking,
        }
    }

    /// Total number of recorded changes.
    pub fn total(&self) -> usize {
        self.safe + self.risky + self.breaking
    }
}

/// Aggregate verdict of one schema comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Highest severity among the changes, `Safe` when there are none
    pub overall_severity: Severity,

    /// Per-tier change totals
    pub counts: SeverityCounts,

    /// Ordered change records: contract-driven changes first, additions after
    pub changes: Vec<Change>,
}

impl DiffResult {
    /// An empty result: no changes, overall SAFE.
    pub fn empty() -> Self {
        Self {
            overall_severity: Severity::Safe,
            counts: SeverityCounts::default(),
            changes: Vec::new(),
        }
    }

    /// Aggregate a change list into counts and an overall severity. The
    /// overall tier is the maximum severity present, never lower.
    pub fn from_changes(changes: Vec<Change>) -> Self {
        let mut counts = SeverityCounts::default();
        for change in &changes {
            counts.record(change.severity);
        }
        let overall_severity = if counts.breaking > 0 {
            Severity::Breaking
        } else if counts.risky > 0 {
            Severity::Risky
        } else {
            Severity::Safe
        };
        Self {
            overall_severity,
            counts,
            changes,
        }
    }

    /// True when at least one change was detected.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// True when the overall severity is BREAKING.
    pub fn is_breaking(&self) -> bool {
        self.overall_severity == Severity::Breaking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn change(kind: ChangeKind, severity: Severity) -> Change {
        Change {
            kind,
            column: "c".to_string(),
            before: None,
            after: None,
            severity,
            rationale: "test".to_string(),
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Safe < Severity::Risky);
        assert!(Severity::Risky < Severity::Breaking);
        assert_eq!(
            [Severity::Breaking, Severity::Safe, Severity::Risky]
                .into_iter()
                .max(),
            Some(Severity::Breaking)
        );
    }

    #[test]
    fn test_severity_wire_spelling() {
        assert_eq!(serde_json::to_string(&Severity::Safe).unwrap(), "\"SAFE\"");
        assert_eq!(serde_json::to_string(&Severity::Risky).unwrap(), "\"RISKY\"");
        assert_eq!(
            serde_json::to_string(&Severity::Breaking).unwrap(),
            "\"BREAKING\""
        );
        let parsed: Severity = serde_json::from_str("\"BREAKING\"").unwrap();
        assert_eq!(parsed, Severity::Breaking);
    }

    #[test]
    fn test_change_kind_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::AddColumn).unwrap(),
            "\"ADD_COLUMN\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeKind::NullabilityChange).unwrap(),
            "\"NULLABILITY_CHANGE\""
        );
        let parsed: ChangeKind = serde_json::from_str("\"REMOVE_COLUMN\"").unwrap();
        assert_eq!(parsed, ChangeKind::RemoveColumn);
    }

    #[test]
    fn test_counts_always_serialize_all_tiers() {
        let json = serde_json::to_value(SeverityCounts::default()).unwrap();
        assert_eq!(json["SAFE"], 0);
        assert_eq!(json["RISKY"], 0);
        assert_eq!(json["BREAKING"], 0);
    }

    #[test]
    fn test_counts_record_and_total() {
        let mut counts = SeverityCounts::default();
        counts.record(Severity::Safe);
        counts.record(Severity::Breaking);
        counts.record(Severity::Breaking);
        assert_eq!(counts.get(Severity::Safe), 1);
        assert_eq!(counts.get(Severity::Risky), 0);
        assert_eq!(counts.get(Severity::Breaking), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_from_changes_takes_maximum_severity() {
        let result = DiffResult::from_changes(vec![
            change(ChangeKind::AddColumn, Severity::Safe),
            change(ChangeKind::TypeChange, Severity::Risky),
        ]);
        assert_eq!(result.overall_severity, Severity::Risky);

        let result = DiffResult::from_changes(vec![
            change(ChangeKind::AddColumn, Severity::Safe),
            change(ChangeKind::RemoveColumn, Severity::Breaking),
            change(ChangeKind::TypeChange, Severity::Risky),
        ]);
        assert_eq!(result.overall_severity, Severity::Breaking);
        assert!(result.is_breaking());
    }

    #[test]
    fn test_empty_result_is_safe() {
        let result = DiffResult::empty();
        assert_eq!(result.overall_severity, Severity::Safe);
        assert_eq!(result.counts.total(), 0);
        assert!(!result.has_changes());
        assert!(!result.is_breaking());
    }

    #[test]
    fn test_column_state_snapshot_shapes() {
        let col = Column::new("price", "double").with_nullability(Nullability::Yes);

        let full = serde_json::to_value(ColumnState::of(&col)).unwrap();
        assert_eq!(full["type"], "double");
        assert_eq!(full["nullable"], true);

        let nullability_only = serde_json::to_value(ColumnState::nullability_of(&col)).unwrap();
        assert!(nullability_only.get("type").is_none());
        assert_eq!(nullability_only["nullable"], true);
    }

    #[test]
    fn test_diff_result_round_trips_losslessly() {
        let col = Column::new("qty", "int").with_nullability(Nullability::No);
        let result = DiffResult::from_changes(vec![Change {
            kind: ChangeKind::AddColumn,
            column: "qty".to_string(),
            before: None,
            after: Some(ColumnState::of(&col)),
            severity: Severity::Risky,
            rationale: "New non-nullable column added.".to_string(),
        }]);

        let json = serde_json::to_string(&result).unwrap();
        let back: DiffResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
