//! Markdown rendering of run payloads
//!
//! Output is deterministic: the same payload always renders to the same
//! bytes, so report diffs in the store reflect real drift and nothing else.

use driftwatch_core::{ColumnState, RunPayload, RunStatus, Severity};

/// Render the Markdown report for one run payload.
pub fn render_markdown(payload: &RunPayload) -> String {
    let mut lines = overview(payload);
    match payload.status {
        RunStatus::NoData => render_no_data(&mut lines),
        RunStatus::Error => render_error(payload, &mut lines),
        RunStatus::Ok => render_drift(payload, &mut lines),
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn overview(payload: &RunPayload) -> Vec<String> {
    let mut lines = vec![
        "# Overview".to_string(),
        format!("- **Table:** `{}`", payload.table.fqn()),
        format!("- **Status:** `{}`", payload.status),
        format!("- **Timestamp:** `{}`", payload.timestamp),
    ];
    if let Some(version) = &payload.contract_version {
        lines.push(format!("- **Contract version:** `{}`", version));
    }
    if !payload.actual_source.is_empty() {
        lines.push(format!("- **Actual source:** `{}`", payload.actual_source));
    }
    if !payload.refs.data_location.is_empty() {
        lines.push(format!(
            "- **Data location:** `{}`",
            payload.refs.data_location
        ));
    }
    lines.push(String::new());
    lines
}

fn render_no_data(lines: &mut Vec<String>) {
    lines.push("# Result".to_string());
    lines.push(
        "No files were found under the configured data location prefix. \
         The drift check was skipped."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("## Next steps".to_string());
    lines.push("1. Confirm the pipeline that loads this table has run.".to_string());
    lines.push("2. Check the configured data location for typos.".to_string());
    lines.push("3. Re-run the check once data has landed.".to_string());
}

fn render_error(payload: &RunPayload, lines: &mut Vec<String>) {
    lines.push("# Result".to_string());
    lines.push("The drift check failed before a comparison could happen.".to_string());
    if let Some(error) = &payload.error {
        lines.push(String::new());
        lines.push(format!("- **Error:** `{}`", error));
    }
    lines.push(String::new());
    lines.push("## Next steps".to_string());
    lines.push("1. Verify the contract bucket and key are correct.".to_string());
    lines.push("2. Verify the catalog can see the table.".to_string());
    lines.push("3. Check the run logs for the full failure.".to_string());
}

fn render_drift(payload: &RunPayload, lines: &mut Vec<String>) {
    let diff = &payload.diff;

    lines.push("# Drift summary".to_string());
    lines.push(format!(
        "- **Overall severity:** **{}**",
        diff.overall_severity
    ));
    lines.push(format!(
        "- **Counts:** SAFE={}, RISKY={}, BREAKING={}",
        diff.counts.safe, diff.counts.risky, diff.counts.breaking
    ));
    lines.push(String::new());

    lines.push("# Changes".to_string());
    if diff.changes.is_empty() {
        lines.push("No changes detected. The actual schema matches the contract.".to_string());
    } else {
        for change in &diff.changes {
            lines.push(format!(
                "- **{}** `{}` on `{}`",
                change.severity, change.kind, change.column
            ));
            lines.push(format!("  - {}", change.rationale));
            if let Some(before) = &change.before {
                lines.push(format!("  - before: {}", describe_state(before)));
            }
            if let Some(after) = &change.after {
                lines.push(format!("  - after: {}", describe_state(after)));
            }
        }
    }
    lines.push(String::new());

    lines.push("# Recommended actions".to_string());
    match diff.overall_severity {
        Severity::Breaking => {
            lines.push("1. Notify downstream consumers before relying on the new schema.".to_string());
            lines.push("2. Add a compatibility view that restores the contract shape.".to_string());
            lines.push("3. Version the contract and coordinate a deprecation window.".to_string());
        }
        Severity::Risky => {
            lines.push("1. Review the flagged changes with the producing team.".to_string());
            lines.push("2. Update the contract if the new shape is intended.".to_string());
            lines.push("3. Watch downstream jobs for type-related failures.".to_string());
        }
        Severity::Safe => {
            lines.push("1. No action required beyond routine monitoring.".to_string());
        }
    }
}

fn describe_state(state: &ColumnState) -> String {
    match &state.data_type {
        Some(data_type) => format!("`{}` (nullable: {})", data_type, state.nullable),
        None => format!("(nullable: {})", state.nullable),
    }
}
