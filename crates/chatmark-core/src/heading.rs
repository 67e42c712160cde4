/// Wrapper tags that mark a line as already-rendered table or code markup.
/// Such lines never become rules, even if they happen to look like one.
const WRAPPER_TAGS: [&str; 6] = ["<table", "<tr", "<td", "<th", "<pre", "<code"];

pub(crate) fn apply(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if is_literal_line(line) {
            out.push(line.to_string());
            continue;
        }
        if let Some((level, content)) = parse_atx_heading(line) {
            out.push(String::new());
            out.push(format!("<h{level}>{content}</h{level}>"));
            out.push(String::new());
        } else if is_rule_line(line) && !WRAPPER_TAGS.iter().any(|tag| line.contains(tag)) {
            out.push(String::new());
            out.push("<hr>".to_string());
            out.push(String::new());
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

/// Four-space or tab indentation is reserved for preformatted text.
fn is_literal_line(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|b| *b == b' ').count();
    (indent <= 3).then(|| &line[indent..])
}

fn parse_atx_heading(line: &str) -> Option<(usize, &str)> {
    let rest = strip_indent(line)?;
    let level = rest.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    if !after.starts_with([' ', '\t']) {
        return None;
    }
    let mut content = after.trim();
    // A closing run of `#` is decoration, not content.
    let without_closing = content.trim_end_matches('#');
    if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
        content = without_closing.trim_end();
    }
    (!content.is_empty()).then_some((level, content))
}

fn is_rule_line(line: &str) -> bool {
    let Some(rest) = strip_indent(line) else {
        return false;
    };
    let rest = rest.trim_end();
    let Some(marker) = rest.chars().next() else {
        return false;
    };
    matches!(marker, '-' | '*' | '_') && rest.len() >= 3 && rest.chars().all(|ch| ch == marker)
}
