//! Schema diff computation
//!
//! Aligns contract columns with actual columns by case-folded name and emits
//! one change record per detected difference. Deterministic and linear in
//! the number of columns.

use driftwatch_core::{
    Change, ChangeKind, Column, ColumnState, DiffResult, Nullability, Severity,
};
use std::collections::{HashMap, HashSet};

use crate::classify::classify;

/// Compare contract columns against actual columns.
///
/// Output order is fixed: contract-driven changes (removals, type changes,
/// nullability changes) appear first, following the contract's column order,
/// then additions in the actual schema's order. A column with both a type
/// and a nullability change yields two records, type change first.
///
/// Duplicate names after case folding are visited once, at the position of
/// their first occurrence, with the last occurrence's definition winning.
pub fn compute_diff(contract: &[Column], actual: &[Column]) -> DiffResult {
    let contract_by_key = index_by_key(contract);
    let actual_by_key = index_by_key(actual);

    let mut changes = Vec::new();

    let mut visited = HashSet::new();
    for column in contract {
        let key = column.match_key();
        if !visited.insert(key.clone()) {
            continue;
        }
        let contract_col = contract_by_key[key.as_str()];

        let Some(actual_col) = actual_by_key.get(key.as_str()).copied() else {
            changes.push(Change {
                kind: ChangeKind::RemoveColumn,
                column: contract_col.name.clone(),
                before: Some(ColumnState::of(contract_col)),
                after: None,
                severity: Severity::Breaking,
                rationale: "Column present in contract but missing in actual schema.".to_string(),
            });
            continue;
        };

        if contract_col.normalized_type() != actual_col.normalized_type() {
            let (severity, rationale) = classify(&contract_col.data_type, &actual_col.data_type);
            changes.push(Change {
                kind: ChangeKind::TypeChange,
                column: contract_col.name.clone(),
                before: Some(ColumnState::of(contract_col)),
                after: Some(ColumnState::of(actual_col)),
                severity,
                rationale,
            });
        }

        // Nullability only counts when both sides reported it. Losing the
        // ability to be null breaks writers; everything else is reviewable.
        if contract_col.nullable.is_known()
            && actual_col.nullable.is_known()
            && contract_col.nullable != actual_col.nullable
        {
            let (severity, rationale) = if contract_col.nullable == Nullability::Yes
                && actual_col.nullable == Nullability::No
            {
                (Severity::Breaking, "Column became non-nullable.")
            } else {
                (Severity::Risky, "Nullability changed.")
            };
            changes.push(Change {
                kind: ChangeKind::NullabilityChange,
                column: contract_col.name.clone(),
                before: Some(ColumnState::nullability_of(contract_col)),
                after: Some(ColumnState::nullability_of(actual_col)),
                severity,
                rationale: rationale.to_string(),
            });
        }
    }

    // Additions. New columns are at worst RISKY, never BREAKING.
    let mut visited_actual = HashSet::new();
    for column in actual {
        let key = column.match_key();
        if !visited_actual.insert(key.clone()) {
            continue;
        }
        if contract_by_key.contains_key(key.as_str()) {
            continue;
        }
        let actual_col = actual_by_key[key.as_str()];
        let (severity, rationale) = if actual_col.nullable == Nullability::No {
            (Severity::Risky, "New non-nullable column added.")
        } else {
            (Severity::Safe, "New column added (nullable/unknown).")
        };
        changes.push(Change {
            kind: ChangeKind::AddColumn,
            column: actual_col.name.clone(),
            before: None,
            after: Some(ColumnState::of(actual_col)),
            severity,
            rationale: rationale.to_string(),
        });
    }

    DiffResult::from_changes(changes)
}

/// Index columns by case-folded name; the last occurrence of a duplicate
/// name wins.
fn index_by_key(columns: &[Column]) -> HashMap<String, &Column> {
    let mut map = HashMap::with_capacity(columns.len());
    for column in columns {
        map.insert(column.match_key(), column);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn col(name: &str, data_type: &str) -> Column {
        Column::new(name, data_type)
    }

    fn nullable(name: &str, data_type: &str) -> Column {
        Column::new(name, data_type).with_nullability(Nullability::Yes)
    }

    fn non_nullable(name: &str, data_type: &str) -> Column {
        Column::new(name, data_type).with_nullability(Nullability::No)
    }

    #[test]
    fn test_identical_schemas_produce_empty_safe_diff() {
        let columns = vec![non_nullable("id", "bigint"), nullable("name", "string")];
        let result = compute_diff(&columns, &columns.clone());
        assert_eq!(result.overall_severity, Severity::Safe);
        assert_eq!(result.counts.total(), 0);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_both_empty_is_empty_safe_diff() {
        let result = compute_diff(&[], &[]);
        assert_eq!(result, DiffResult::empty());
    }

    #[test]
    fn test_removed_column_is_breaking() {
        let contract = vec![col("id", "bigint"), col("email", "string")];
        let actual = vec![col("id", "bigint")];

        let result = compute_diff(&contract, &actual);
        assert_eq!(result.changes.len(), 1);

        let change = &result.changes[0];
        assert_eq!(change.kind, ChangeKind::RemoveColumn);
        assert_eq!(change.column, "email");
        assert_eq!(change.severity, Severity::Breaking);
        assert_eq!(
            change.rationale,
            "Column present in contract but missing in actual schema."
        );
        assert_eq!(
            change.before,
            Some(ColumnState::of(&col("email", "string")))
        );
        assert_eq!(change.after, None);
        assert!(result.is_breaking());
    }

    #[test]
    fn test_empty_contract_reports_all_columns_as_additions() {
        let actual = vec![nullable("a", "int"), non_nullable("b", "string")];
        let result = compute_diff(&[], &actual);

        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes[0].kind, ChangeKind::AddColumn);
        assert_eq!(result.changes[0].column, "a");
        assert_eq!(result.changes[0].severity, Severity::Safe);
        assert_eq!(result.changes[1].column, "b");
        assert_eq!(result.changes[1].severity, Severity::Risky);
        assert_eq!(result.overall_severity, Severity::Risky);
    }

    #[test]
    fn test_empty_actual_reports_all_columns_as_removals() {
        let contract = vec![col("a", "int"), col("b", "string")];
        let result = compute_diff(&contract, &[]);
        assert_eq!(result.changes.len(), 2);
        assert!(result
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::RemoveColumn && c.severity == Severity::Breaking));
        assert_eq!(result.counts.breaking, 2);
    }

    #[test]
    fn test_added_nullable_column_is_safe() {
        let contract = vec![col("id", "bigint")];
        let actual = vec![col("id", "bigint"), nullable("note", "string")];

        let result = compute_diff(&contract, &actual);
        let change = &result.changes[0];
        assert_eq!(change.kind, ChangeKind::AddColumn);
        assert_eq!(change.severity, Severity::Safe);
        assert_eq!(change.rationale, "New column added (nullable/unknown).");
        assert_eq!(change.before, None);
    }

    #[test]
    fn test_added_unknown_nullability_column_is_safe() {
        let contract = vec![col("id", "bigint")];
        let actual = vec![col("id", "bigint"), col("note", "string")];
        let result = compute_diff(&contract, &actual);
        assert_eq!(result.changes[0].severity, Severity::Safe);
    }

    #[test]
    fn test_added_non_nullable_column_is_risky() {
        let contract = vec![col("id", "bigint")];
        let actual = vec![col("id", "bigint"), non_nullable("created_at", "timestamp")];

        let result = compute_diff(&contract, &actual);
        let change = &result.changes[0];
        assert_eq!(change.severity, Severity::Risky);
        assert_eq!(change.rationale, "New non-nullable column added.");
    }

    #[test]
    fn test_type_change_uses_classifier() {
        let contract = vec![col("qty", "int")];
        let actual = vec![col("qty", "bigint")];

        let result = compute_diff(&contract, &actual);
        let change = &result.changes[0];
        assert_eq!(change.kind, ChangeKind::TypeChange);
        assert_eq!(change.severity, Severity::Risky);
        assert_eq!(change.rationale, "Widened type from 'int' to 'bigint'.");
        assert_eq!(change.before.as_ref().unwrap().data_type.as_deref(), Some("int"));
        assert_eq!(
            change.after.as_ref().unwrap().data_type.as_deref(),
            Some("bigint")
        );
    }

    #[test]
    fn test_type_equality_ignores_case_and_whitespace() {
        let contract = vec![col("qty", "BIGINT")];
        let actual = vec![col("qty", "  bigint ")];
        let result = compute_diff(&contract, &actual);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_names_match_case_insensitively_and_display_contract_casing() {
        let contract = vec![non_nullable("UserId", "bigint")];
        let actual = vec![non_nullable("userid", "int")];

        let result = compute_diff(&contract, &actual);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].kind, ChangeKind::TypeChange);
        assert_eq!(result.changes[0].column, "UserId");
    }

    #[test]
    fn test_nullable_to_non_nullable_is_breaking() {
        let contract = vec![nullable("email", "string")];
        let actual = vec![non_nullable("email", "string")];

        let result = compute_diff(&contract, &actual);
        let change = &result.changes[0];
        assert_eq!(change.kind, ChangeKind::NullabilityChange);
        assert_eq!(change.severity, Severity::Breaking);
        assert_eq!(change.rationale, "Column became non-nullable.");
        // Nullability snapshots omit the type descriptor
        assert_eq!(change.before.as_ref().unwrap().data_type, None);
        assert_eq!(change.before.as_ref().unwrap().nullable, Nullability::Yes);
        assert_eq!(change.after.as_ref().unwrap().nullable, Nullability::No);
    }

    #[test]
    fn test_non_nullable_to_nullable_is_risky() {
        let contract = vec![non_nullable("email", "string")];
        let actual = vec![nullable("email", "string")];

        let result = compute_diff(&contract, &actual);
        let change = &result.changes[0];
        assert_eq!(change.severity, Severity::Risky);
        assert_eq!(change.rationale, "Nullability changed.");
    }

    #[test]
    fn test_unknown_nullability_never_produces_a_change() {
        // Unknown on either side suppresses the comparison
        let contract = vec![col("a", "int"), nullable("b", "int")];
        let actual = vec![non_nullable("a", "int"), col("b", "int")];
        let result = compute_diff(&contract, &actual);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_type_and_nullability_change_on_same_column() {
        let contract = vec![nullable("amount", "int")];
        let actual = vec![non_nullable("amount", "bigint")];

        let result = compute_diff(&contract, &actual);
        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes[0].kind, ChangeKind::TypeChange);
        assert_eq!(result.changes[1].kind, ChangeKind::NullabilityChange);
        assert_eq!(result.changes[1].severity, Severity::Breaking);
        assert_eq!(result.overall_severity, Severity::Breaking);
    }

    #[test]
    fn test_output_order_contract_first_then_additions() {
        let contract = vec![
            col("a", "int"),
            col("b", "int"),
            col("c", "int"),
        ];
        let actual = vec![
            col("z_new", "string"),
            col("a", "int"),
            col("c", "bigint"),
        ];

        let result = compute_diff(&contract, &actual);
        let summary: Vec<(ChangeKind, &str)> = result
            .changes
            .iter()
            .map(|c| (c.kind, c.column.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ChangeKind::RemoveColumn, "b"),
                (ChangeKind::TypeChange, "c"),
                (ChangeKind::AddColumn, "z_new"),
            ]
        );
    }

    #[test]
    fn test_duplicate_contract_names_last_definition_wins() {
        // Same folded name twice: visited once, at the first position, with
        // the second definition in effect.
        let contract = vec![col("Id", "int"), col("other", "string"), col("id", "bigint")];
        let actual = vec![col("id", "bigint"), col("other", "string")];

        let result = compute_diff(&contract, &actual);
        // Last definition (bigint) matches actual, so no type change
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_duplicate_actual_names_reported_once() {
        let contract = vec![col("id", "int")];
        let actual = vec![col("id", "int"), col("extra", "string"), col("EXTRA", "string")];

        let result = compute_diff(&contract, &actual);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].kind, ChangeKind::AddColumn);
        // Last occurrence's spelling wins for display
        assert_eq!(result.changes[0].column, "EXTRA");
    }

    #[test]
    fn test_narrowed_column_with_new_column() {
        let contract = vec![nullable("acres", "double")];
        let actual = vec![col("acres", "int"), col("owner", "string")];

        let result = compute_diff(&contract, &actual);
        assert_eq!(result.changes.len(), 2);

        let narrowed = &result.changes[0];
        assert_eq!(narrowed.kind, ChangeKind::TypeChange);
        assert_eq!(narrowed.column, "acres");
        assert_eq!(narrowed.severity, Severity::Breaking);
        assert_eq!(narrowed.rationale, "Narrowed type from 'double' to 'int'.");

        let added = &result.changes[1];
        assert_eq!(added.kind, ChangeKind::AddColumn);
        assert_eq!(added.column, "owner");
        assert_eq!(added.severity, Severity::Safe);

        assert_eq!(result.overall_severity, Severity::Breaking);
        assert_eq!(result.counts.safe, 1);
        assert_eq!(result.counts.risky, 0);
        assert_eq!(result.counts.breaking, 1);
    }

    #[test]
    fn test_counts_match_change_list() {
        let contract = vec![
            nullable("a", "int"),
            col("b", "string"),
            nullable("c", "decimal(10,2)"),
        ];
        let actual = vec![
            non_nullable("a", "int"),
            nullable("c", "decimal(8,2)"),
            nullable("d", "string"),
        ];

        let result = compute_diff(&contract, &actual);
        assert_eq!(result.counts.total(), result.changes.len());
        let mut recount = driftwatch_core::SeverityCounts::default();
        for change in &result.changes {
            recount.record(change.severity);
        }
        assert_eq!(result.counts, recount);
        // b removed (BREAKING), c narrowed (BREAKING), a nullability (BREAKING),
        // d added nullable (SAFE)
        assert_eq!(result.counts.breaking, 3);
        assert_eq!(result.counts.safe, 1);
        assert_eq!(result.overall_severity, Severity::Breaking);
    }

    #[test]
    fn test_diff_is_deterministic() {
        let contract = vec![col("a", "int"), col("b", "double"), col("c", "string")];
        let actual = vec![col("c", "string"), col("b", "float"), col("d", "int")];

        let first = compute_diff(&contract, &actual);
        let second = compute_diff(&contract, &actual);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialized_diff_round_trips() {
        let contract = vec![nullable("amount", "decimal(10,2)"), col("id", "bigint")];
        let actual = vec![non_nullable("amount", "decimal(12,2)"), col("id", "bigint")];

        let result = compute_diff(&contract, &actual);
        let json = serde_json::to_string_pretty(&result).unwrap();
        let back: DiffResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
