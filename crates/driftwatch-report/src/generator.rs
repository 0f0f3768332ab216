//! The report generation pipeline
//!
//! Reads one diff payload from the store and writes four artifacts to the
//! report bucket: the Markdown report, its HTML wrapper, the per-table
//! `latest.html`, and the refreshed bucket index.

use crate::html::{render_index_html, render_report_html};
use crate::keys::{ReportKeys, INDEX_KEY};
use crate::markdown::render_markdown;
use driftwatch_core::RunPayload;
use driftwatch_store::{get_json, ObjectStore, StoreError};
use std::sync::Arc;
use tracing::{info, warn};

/// How many reports the index page lists.
const RECENT_REPORT_LIMIT: usize = 10;

const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Keys of the artifacts one generation pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub markdown_key: String,
    pub html_key: String,
    pub latest_key: String,
}

/// Errors from report generation.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Missing diff key for report generation")]
    MissingDiffKey,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Renders and persists report artifacts for diff payloads.
pub struct ReportGenerator {
    store: Arc<dyn ObjectStore>,
    report_bucket: String,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn ObjectStore>, report_bucket: impl Into<String>) -> Self {
        Self {
            store,
            report_bucket: report_bucket.into(),
        }
    }

    /// Generate all artifacts for the payload stored at `diff_bucket/diff_key`.
    pub async fn generate(
        &self,
        diff_bucket: &str,
        diff_key: &str,
    ) -> Result<GeneratedReport, ReportError> {
        if diff_key.is_empty() {
            return Err(ReportError::MissingDiffKey);
        }

        let payload: RunPayload = get_json(self.store.as_ref(), diff_bucket, diff_key).await?;
        let keys = ReportKeys::derive(&payload, diff_key);

        let markdown = render_markdown(&payload);
        self.put_text(&keys.markdown_key, &markdown, MARKDOWN_CONTENT_TYPE)
            .await?;

        let title = format!("{} drift report", keys.safe_table);
        let html = render_report_html(&title, &markdown);
        self.put_text(&keys.html_key, &html, HTML_CONTENT_TYPE).await?;
        self.put_text(&keys.latest_key, &html, HTML_CONTENT_TYPE)
            .await?;

        let recent = self.recent_reports(&keys.prefix).await;
        let index = render_index_html(&recent);
        self.put_text(INDEX_KEY, &index, HTML_CONTENT_TYPE).await?;

        info!(
            table = %keys.safe_table,
            report = %keys.html_key,
            "report artifacts written"
        );

        Ok(GeneratedReport {
            markdown_key: keys.markdown_key,
            html_key: keys.html_key,
            latest_key: keys.latest_key,
        })
    }

    /// Newest report pages under a prefix, for the index. Listing failures
    /// degrade to an empty index rather than failing the whole generation.
    async fn recent_reports(&self, prefix: &str) -> Vec<String> {
        let mut objects = match self.store.list(&self.report_bucket, prefix).await {
            Ok(objects) => objects,
            Err(err) => {
                warn!(prefix = prefix, error = %err, "listing reports failed");
                return Vec::new();
            }
        };
        objects.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| b.key.cmp(&a.key))
        });
        objects
            .into_iter()
            .map(|o| o.key)
            .filter(|key| key.ends_with(".report.html"))
            .take(RECENT_REPORT_LIMIT)
            .collect()
    }

    async fn put_text(
        &self,
        key: &str,
        body: &str,
        content_type: &str,
    ) -> Result<(), ReportError> {
        self.store
            .put(
                &self.report_bucket,
                key,
                body.as_bytes().to_vec(),
                content_type,
            )
            .await?;
        Ok(())
    }
}
