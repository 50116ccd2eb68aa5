//! Escaping helpers for HTML text and inline script literals.

/// Escapes text for use inside HTML element content or quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
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

/// Encodes a string as a JavaScript string literal safe to inline in a
/// `<script>` block.
#[must_use]
pub fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace("</", "<\\/")
}

/// Formats a coordinate for inline script. Non-finite values become `0`.
#[must_use]
pub fn js_number(value: f64) -> String {
    if value.is_finite() {
        let mut s = format!("{value}");
        if !s.contains('.') && !s.contains('e') {
            s.push_str(".0");
        }
        s
    } else {
        "0.0".to_string()
    }
}
