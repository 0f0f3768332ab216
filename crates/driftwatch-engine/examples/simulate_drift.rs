//! Simulate a drifted table and print the resulting diff payload.
//!
//! Run with: cargo run -p driftwatch-engine --example simulate_drift

use driftwatch_core::{Column, Nullability};
use driftwatch_engine::compute_diff;

fn main() {
    let contract = vec![
        Column::new("parcel_id", "string").with_nullability(Nullability::No),
        Column::new("county", "string").with_nullability(Nullability::Yes),
        Column::new("acres", "decimal(12,2)").with_nullability(Nullability::Yes),
        Column::new("assessed_value", "bigint").with_nullability(Nullability::Yes),
        Column::new("updated_at", "timestamp").with_nullability(Nullability::Yes),
    ];

    // The observed table narrowed acres, widened assessed_value, dropped
    // updated_at, and grew two new columns.
    let actual = vec![
        Column::new("parcel_id", "string").with_nullability(Nullability::No),
        Column::new("county", "string").with_nullability(Nullability::Yes),
        Column::new("acres", "decimal(10,2)").with_nullability(Nullability::Yes),
        Column::new("assessed_value", "decimal(18,2)").with_nullability(Nullability::Yes),
        Column::new("owner_name", "string").with_nullability(Nullability::Yes),
        Column::new("zoning_code", "string").with_nullability(Nullability::No),
    ];

    let result = compute_diff(&contract, &actual);

    println!("overall severity: {}", result.overall_severity);
    println!(
        "counts: SAFE={} RISKY={} BREAKING={}",
        result.counts.safe, result.counts.risky, result.counts.breaking
    );
    println!();
    for change in &result.changes {
        println!("[{}] {} on '{}': {}", change.severity, change.kind, change.column, change.rationale);
    }
    println!();
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize diff: {}", e),
    }
}
