use crate::placeholder::{Placeholders, SlotKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Fence {
    ch: u8,
    len: usize,
    indent: usize,
}

impl Fence {
    /// Parses an opening fence; returns the fence and its info string.
    pub(crate) fn parse_open(text: &str) -> Option<(Fence, &str)> {
        let indent = leading_spaces(text);
        if indent > 3 {
            return None;
        }
        let rest = &text[indent..];
        let ch = match rest.as_bytes().first()? {
            b'`' => b'`',
            b'~' => b'~',
            _ => return None,
        };
        let len = rest.bytes().take_while(|b| *b == ch).count();
        if len < 3 {
            return None;
        }
        let info = rest[len..].trim();
        if ch == b'`' && info.contains('`') {
            return None;
        }
        Some((Fence { ch, len, indent }, info))
    }

    pub(crate) fn is_closed_by(&self, text: &str) -> bool {
        let indent = leading_spaces(text);
        if indent > 3 {
            return false;
        }
        let rest = &text[indent..];
        let count = rest.bytes().take_while(|b| *b == self.ch).count();
        count >= self.len && rest[count..].trim().is_empty()
    }
}

fn leading_spaces(text: &str) -> usize {
    text.bytes().take_while(|b| *b == b' ').count()
}

fn strip_leading_spaces(text: &str, max: usize) -> &str {
    let count = leading_spaces(text).min(max);
    &text[count..]
}

/// Index just past a single-backtick code span opening at `start`. A longer
/// backtick run is skipped whole.
pub(crate) fn inline_code_end(text: &str, start: usize) -> Option<usize> {
    let run = text[start..].bytes().take_while(|b| *b == b'`').count();
    if run != 1 {
        return Some(start + run);
    }
    let body = start + 1;
    let line_end = text[body..].find('\n').map_or(text.len(), |pos| pos + body);
    let close = text[body..line_end].find('`')? + body;
    (close > body).then_some(close + 1)
}

fn language_of(info: &str) -> Option<&str> {
    let word = info.split_whitespace().next()?;
    word.chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '+' | '.' | '#'))
        .then_some(word)
}

/// Turns fenced blocks into `CODEBLOCK` slots, each on its own block.
///
/// Expects escaped text. An unterminated fence runs to the end of input.
pub(crate) fn extract_fenced(text: &str, slots: &mut Placeholders) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let Some((fence, info)) = Fence::parse_open(lines[i]) else {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        };
        let mut body = Vec::new();
        i += 1;
        while i < lines.len() && !fence.is_closed_by(lines[i]) {
            body.push(strip_leading_spaces(lines[i], fence.indent));
            i += 1;
        }
        // Skip the closing fence, if any.
        i += 1;

        // Citations already inside the body are inlined so slots never nest.
        let body = slots.restore(&body.join("\n"));
        let fragment = match language_of(info) {
            Some(lang) => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                lang, body
            ),
            None => format!("<pre><code>{}</code></pre>", body),
        };
        out.push(String::new());
        out.push(slots.insert(SlotKind::CodeBlock, fragment));
        out.push(String::new());
    }
    out.join("\n")
}

/// Turns single-backtick spans into `CODE` slots. Longer backtick runs are
/// left as literal text, matching what the math scanner skips.
pub(crate) fn extract_inline(text: &str, slots: &mut Placeholders) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while let Some(offset) = text[i..].find('`') {
        let start = i + offset;
        let run = text[start..].bytes().take_while(|b| *b == b'`').count();
        if run != 1 {
            i = start + run;
            continue;
        }
        match inline_code_end(text, start) {
            Some(end) => {
                let body = slots.restore(&text[start + 1..end - 1]);
                out.push_str(&text[copied..start]);
                out.push_str(&slots.insert(SlotKind::Code, format!("<code>{}</code>", body)));
                copied = end;
                i = end;
            }
            None => i = start + 1,
        }
    }
    out.push_str(&text[copied..]);
    out
}
