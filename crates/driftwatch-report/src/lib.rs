//! driftwatch-report - Rendered artifacts for drift runs
//!
//! Turns persisted run payloads into human-readable artifacts: a Markdown
//! report, an HTML wrapper, a stable `latest.html` per table, and a bucket
//! index page. Rendering is deterministic so repeated runs over the same
//! payload produce identical bytes.

pub mod generator;
pub mod html;
pub mod keys;
pub mod markdown;

pub use generator::{GeneratedReport, ReportError, ReportGenerator};
pub use html::{render_index_html, render_report_html};
pub use keys::{ReportKeys, INDEX_KEY};
pub use markdown::render_markdown;
