//! Minimal HTML shells around rendered reports
//!
//! Reports stay readable without any frontend tooling: the Markdown body is
//! embedded verbatim in a styled <pre> block. Pages only link to relative
//! keys inside the report bucket, so they work from any static host.

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap one report's Markdown in a standalone HTML page.
pub fn render_report_html(title: &str, markdown: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem auto; max-width: 56rem; padding: 0 1rem; color: #1f2328; }}
nav {{ margin-bottom: 1.5rem; }}
nav a {{ margin-right: 1rem; }}
pre {{ background: #f6f8fa; border: 1px solid #d0d7de; border-radius: 6px; padding: 1rem; white-space: pre-wrap; word-break: break-word; }}
</style>
</head>
<body>
<nav><a href="latest.html">latest</a><a href="../../index.html">all reports</a></nav>
<h1>{title}</h1>
<pre>{body}</pre>
</body>
</html>
"#,
        title = escape_html(title),
        body = escape_html(markdown),
    )
}

/// Render the bucket-wide index page listing recent reports.
pub fn render_index_html(recent_keys: &[String]) -> String {
    let items = if recent_keys.is_empty() {
        "<li>No reports yet.</li>".to_string()
    } else {
        recent_keys
            .iter()
            .map(|key| {
                format!(
                    "<li><a href=\"{href}\">{text}</a></li>",
                    href = escape_html(key),
                    text = escape_html(key)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Schema drift reports</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem auto; max-width: 56rem; padding: 0 1rem; color: #1f2328; }}
li {{ margin: 0.25rem 0; }}
</style>
</head>
<body>
<h1>Schema drift reports</h1>
<ul>
{items}
</ul>
</body>
</html>
"#,
        items = items,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a b="c">&'d'</a>"#),
            "&lt;a b=&quot;c&quot;&gt;&amp;&#x27;d&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_report_page_embeds_escaped_markdown() {
        let html = render_report_html("db.t drift report", "# Overview\n`a < b`");
        assert!(html.contains("<title>db.t drift report</title>"));
        assert!(html.contains("`a &lt; b`"));
        assert!(html.contains("href=\"latest.html\""));
        assert!(html.contains("href=\"../../index.html\""));
    }

    #[test]
    fn test_index_lists_recent_reports() {
        let keys = vec![
            "reports/db.t/2.report.html".to_string(),
            "reports/db.t/1.report.html".to_string(),
        ];
        let html = render_index_html(&keys);
        assert!(html.contains("<a href=\"reports/db.t/2.report.html\">"));
        assert!(html.contains("<a href=\"reports/db.t/1.report.html\">"));
    }

    #[test]
    fn test_index_without_reports_has_placeholder() {
        let html = render_index_html(&[]);
        assert!(html.contains("<li>No reports yet.</li>"));
    }
}
