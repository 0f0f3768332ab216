//! Report artifact key derivation

use driftwatch_core::RunPayload;

/// Key of the bucket-wide index page.
pub const INDEX_KEY: &str = "index.html";

/// Object keys for one run's report artifacts.
///
/// All artifacts for a table live under `reports/{safe_table}/`, where
/// `safe_table` is the fully qualified name with `/` replaced so it cannot
/// split the key path. The run id ties the report back to its diff payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportKeys {
    /// Key-safe table name, e.g. `analytics.orders`
    pub safe_table: String,

    /// Run identifier, the diff key's basename without `.diff.json`
    pub run_id: String,

    /// Prefix holding all of this table's reports
    pub prefix: String,

    /// Markdown report key
    pub markdown_key: String,

    /// HTML report key
    pub html_key: String,

    /// Stable per-table key always pointing at the newest report
    pub latest_key: String,
}

impl ReportKeys {
    /// Derive artifact keys from a payload and the diff key it was read from.
    pub fn derive(payload: &RunPayload, diff_key: &str) -> Self {
        let safe_table = payload.table.fqn().replace('/', "_");
        let file_name = diff_key.rsplit('/').next().unwrap_or(diff_key);
        let run_id = file_name
            .strip_suffix(".diff.json")
            .unwrap_or(file_name)
            .to_string();

        let prefix = format!("reports/{}/", safe_table);
        Self {
            markdown_key: format!("{}{}.report.md", prefix, run_id),
            html_key: format!("{}{}.report.html", prefix, run_id),
            latest_key: format!("{}latest.html", prefix),
            safe_table,
            run_id,
            prefix,
        }
    }
}
