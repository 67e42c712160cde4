use once_cell::sync::Lazy;
use regex::Regex;

// Content may not start or end with whitespace or `*`, which keeps list
// bullets (`* item`) and triple runs well-formed.
static BOLD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^\s*](?:[^\n]*?[^\s*])?)\*\*").expect("bold pattern")
});
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^\s*](?:[^*\n]*?[^\s*])?)\*").expect("italic pattern")
});

/// Bold first, then italic over the result, so `**` pairs are never counted
/// as two single markers.
pub(crate) fn apply(text: &str) -> String {
    let bold = BOLD_RE.replace_all(text, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&bold, "<em>$1</em>").into_owned()
}
