use std::borrow::Cow;

/// Escapes `&`, `<`, `>` and `"` so prose can never open or close a tag.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Attribute values get the same treatment as prose.
pub(crate) fn escape_attr(text: &str) -> String {
    escape_html(text)
}

/// Undoes [`escape_html`] for measuring or parsing text that is already escaped.
pub(crate) fn unescape(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
