//! Type transition classification
//!
//! Assigns a severity to an old-type/new-type pair using a fixed widening
//! order over primitive descriptors plus a precision/scale rule for decimals.
//! The order is a product decision about read compatibility, not a SQL
//! standard: `decimal` and `string` sit at the wide end so that any numeric
//! turning into them is a widening. Pairs outside the order resolve to RISKY
//! rather than failing, so unknown descriptors always flow through.

use driftwatch_core::Severity;
use regex::Regex;
use std::sync::OnceLock;

/// Widening order for primitive descriptors; index position is the rank.
/// Moving to a higher rank widens, moving to a lower rank narrows.
const NUMERIC_ORDER: [&str; 8] = [
    "tinyint", "smallint", "int", "bigint", "float", "double", "decimal", "string",
];

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(decimal)\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)\s*$")
            .expect("decimal pattern is valid")
    })
}

/// Split a descriptor into its base type and, for parameterized decimals,
/// the precision/scale pair. Unparseable parameters leave the descriptor
/// as an opaque base.
fn base_type(descriptor: &str) -> (String, Option<(u32, u32)>) {
    let raw = descriptor.trim().to_lowercase();
    if let Some(caps) = decimal_pattern().captures(&raw) {
        let precision = caps[2].parse::<u32>().ok();
        let scale = caps[3].parse::<u32>().ok();
        if let (Some(precision), Some(scale)) = (precision, scale) {
            return ("decimal".to_string(), Some((precision, scale)));
        }
    }
    (raw, None)
}

fn rank(base: &str) -> Option<usize> {
    NUMERIC_ORDER.iter().position(|t| *t == base)
}

/// Classify the transition from `old` to `new`, returning the severity and a
/// deterministic rationale that quotes the raw descriptors verbatim.
///
/// Rules, in order:
/// 1. decimal(P,S) vs decimal(P',S'): RISKY when both dimensions grew or
///    stayed equal, BREAKING otherwise. Equal precision and scale still
///    reports RISKY, never SAFE; callers only classify descriptors that
///    already differ textually, and a re-declared decimal deserves a look.
/// 2. Same base type: SAFE.
/// 3. Both bases in the widening order: RISKY when the rank grows (with a
///    dedicated wording for numeric-to-string), BREAKING when it shrinks.
/// 4. Anything else: RISKY with an unknown-compatibility rationale.
pub fn classify(old: &str, new: &str) -> (Severity, String) {
    let (old_base, old_decimal) = base_type(old);
    let (new_base, new_decimal) = base_type(new);

    if old_base == "decimal" && new_base == "decimal" {
        if let (Some((old_precision, old_scale)), Some((new_precision, new_scale))) =
            (old_decimal, new_decimal)
        {
            return if new_precision >= old_precision && new_scale >= old_scale {
                (
                    Severity::Risky,
                    format!("Decimal widened from {} to {}.", old, new),
                )
            } else {
                (
                    Severity::Breaking,
                    format!("Decimal narrowed from {} to {}.", old, new),
                )
            };
        }
    }

    if old_base == new_base {
        return (
            Severity::Safe,
            format!("Type unchanged base '{}'.", old_base),
        );
    }

    if let (Some(old_rank), Some(new_rank)) = (rank(&old_base), rank(&new_base)) {
        return if new_rank > old_rank {
            let rationale = if new_base == "string" {
                format!("Changed from numeric '{}' to string '{}'.", old, new)
            } else {
                format!("Widened type from '{}' to '{}'.", old, new)
            };
            (Severity::Risky, rationale)
        } else {
            (
                Severity::Breaking,
                format!("Narrowed type from '{}' to '{}'.", old, new),
            )
        };
    }

    (
        Severity::Risky,
        format!("Type changed from '{}' to '{}' (unknown compatibility).", old, new),
    )
}
