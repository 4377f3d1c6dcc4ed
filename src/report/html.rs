use super::md::to_markdown;
use crate::types::report::AssessmentOutcome;

const STYLE: &str = "body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; line-height: 1.6; }
        pre { white-space: pre-wrap; }
        h1, h2, h3 { color: #333; }";

/// Wraps the Markdown report in a standalone page.
pub fn to_html(outcome: &AssessmentOutcome) -> String {
    let body = escape(&to_markdown(outcome));
    format!(
        "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"utf-8\">
    <title>Production Readiness Report</title>
    <style>
        {STYLE}
    </style>
</head>
<body>
<pre>{body}</pre>
</body>
</html>
"
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
