//! Final block assembly.
//!
//! Earlier stages leave blank lines around every block they emit, so splitting
//! on blank lines yields either finished markup, an indented literal block, or
//! prose that still needs `<p>` and `<br>`.

use crate::placeholder;

const BLOCK_PREFIXES: [&str; 13] = [
    "<h1>",
    "<h2>",
    "<h3>",
    "<h4>",
    "<h5>",
    "<h6>",
    "<pre",
    "<ul",
    "<ol",
    "<li",
    "<table",
    "<blockquote",
    "<hr",
];

/// Wrappers whose open tag must be followed by a close tag in the same block.
const PAIRED_WRAPPERS: [(&str, &str); 4] = [
    ("<ul>", "</ul>"),
    ("<ol>", "</ol>"),
    ("<table>", "</table>"),
    ("<blockquote>", "</blockquote>"),
];

pub(crate) fn assemble(text: &str) -> String {
    let candidates = split_candidates(text);
    let mut blocks: Vec<String> = Vec::new();
    let mut i = 0;
    while i < candidates.len() {
        let mut candidate = candidates[i].clone();
        i += 1;
        if let Some(close) = unclosed_wrapper(&candidate) {
            while !candidate.contains(close) && i < candidates.len() {
                candidate.push('\n');
                candidate.push_str(&candidates[i]);
                i += 1;
            }
        }
        if let Some(block) = render_candidate(&candidate) {
            blocks.push(block);
        }
    }
    blocks.join("\n")
}

fn split_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                candidates.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        candidates.push(current.join("\n"));
    }
    candidates
}

fn unclosed_wrapper(candidate: &str) -> Option<&'static str> {
    PAIRED_WRAPPERS
        .iter()
        .find(|(open, close)| candidate.starts_with(open) && !candidate.contains(close))
        .map(|(_, close)| *close)
}

fn render_candidate(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }
    if BLOCK_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
        return Some(trimmed.to_string());
    }
    if placeholder::sole_token_kind(trimmed).is_some_and(|kind| kind.is_block()) {
        return Some(trimmed.to_string());
    }
    if let Some(literal) = strip_uniform_indent(candidate) {
        return Some(format!("<pre>{}</pre>", literal));
    }
    let lines: Vec<&str> = trimmed.lines().map(str::trim).collect();
    Some(format!("<p>{}</p>", lines.join("<br>")))
}

/// Strips one level of indentation when every line carries it.
fn strip_uniform_indent(candidate: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in candidate.lines() {
        let stripped = line
            .strip_prefix("    ")
            .or_else(|| line.strip_prefix('\t'))?;
        lines.push(stripped);
    }
    Some(lines.join("\n"))
}
