//! Math span protection.
//!
//! Recognised spans are handed to an injected [`MathRenderer`]; whatever it
//! returns is parked in a placeholder slot so no later stage can touch it.

use log::debug;
use thiserror::Error;

use crate::code::{Fence, inline_code_end};
use crate::placeholder::{self, Placeholders, SlotKind};

#[derive(Debug, Error)]
pub enum MathError {
    #[error("math source failed to compile: {0}")]
    Compile(String),
    #[error("math renderer produced no output")]
    EmptyOutput,
    #[error("math renderer unavailable")]
    Unavailable,
}

/// Renders one math snippet to markup. `display` is true for block math.
pub trait MathRenderer: Send + Sync {
    fn render(&self, source: &str, display: bool) -> Result<String, MathError>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, bool) -> Result<String, MathError> + Send + Sync,
{
    fn render(&self, source: &str, display: bool) -> Result<String, MathError> {
        self(source, display)
    }
}

struct Delims {
    open: &'static str,
    close: &'static str,
    display: bool,
}

// Block shapes come first so `$$` is never read as two inline `$`.
const DELIMS: [Delims; 3] = [
    Delims {
        open: "$$",
        close: "$$",
        display: true,
    },
    Delims {
        open: "\\[",
        close: "\\]",
        display: true,
    },
    Delims {
        open: "\\(",
        close: "\\)",
        display: false,
    },
];

pub(crate) fn protect(
    text: &str,
    renderer: Option<&dyn MathRenderer>,
    slots: &mut Placeholders,
) -> String {
    let Some(renderer) = renderer else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    let mut prose = String::new();
    let mut fence: Option<Fence> = None;
    for line in text.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n');
        match fence {
            Some(open) => {
                out.push_str(line);
                if open.is_closed_by(bare) {
                    fence = None;
                }
            }
            None => {
                if let Some((open, _)) = Fence::parse_open(bare) {
                    out.push_str(&scan(&prose, renderer, slots));
                    prose.clear();
                    out.push_str(line);
                    fence = Some(open);
                } else {
                    prose.push_str(line);
                }
            }
        }
    }
    out.push_str(&scan(&prose, renderer, slots));
    out
}

fn scan(chunk: &str, renderer: &dyn MathRenderer, slots: &mut Placeholders) -> String {
    let bytes = chunk.as_bytes();
    let mut out = String::with_capacity(chunk.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'`' => {
                i = inline_code_end(chunk, i).unwrap_or(i + 1);
            }
            b'$' | b'\\' => {
                let span = DELIMS
                    .iter()
                    .find_map(|delims| delimited_span(chunk, i, delims))
                    .or_else(|| dollar_span(chunk, i));
                match span {
                    Some(span) => {
                        let source = &chunk[span.content.0..span.content.1];
                        match renderer.render(source.trim(), span.display) {
                            Ok(fragment) => {
                                let kind = if span.display {
                                    SlotKind::MathBlock
                                } else {
                                    SlotKind::MathInline
                                };
                                let token = slots.insert(kind, fragment);
                                out.push_str(&chunk[copied..i]);
                                if span.display && fills_line(chunk, i, span.end) {
                                    // Own block, so the paragraph stage never wraps it.
                                    out.push('\n');
                                    out.push_str(&token);
                                    out.push('\n');
                                } else {
                                    out.push_str(&token);
                                }
                                copied = span.end;
                            }
                            Err(err) => {
                                debug!("leaving math span unrendered: {}", err);
                            }
                        }
                        i = span.end;
                    }
                    None if bytes[i] == b'\\' => {
                        // An escaped character never opens a span.
                        i += if bytes.get(i + 1) == Some(&b'$') { 2 } else { 1 };
                    }
                    None => i += 1,
                }
            }
            _ => i += 1,
        }
    }
    out.push_str(&chunk[copied..]);
    out
}

/// True when only whitespace shares the lines `start` and `end` sit on.
fn fills_line(chunk: &str, start: usize, end: usize) -> bool {
    let before = chunk[..start].rsplit('\n').next().unwrap_or("");
    let after = chunk[end..].split('\n').next().unwrap_or("");
    before.trim().is_empty() && after.trim().is_empty()
}

struct MathSpan {
    content: (usize, usize),
    end: usize,
    display: bool,
}

fn delimited_span(chunk: &str, start: usize, delims: &Delims) -> Option<MathSpan> {
    if !chunk[start..].starts_with(delims.open) {
        return None;
    }
    let content_start = start + delims.open.len();
    let close = chunk[content_start..].find(delims.close)? + content_start;
    let content = &chunk[content_start..close];
    if content.trim().is_empty() || placeholder::contains_token(content) {
        return None;
    }
    Some(MathSpan {
        content: (content_start, close),
        end: close + delims.close.len(),
        display: delims.display,
    })
}

/// `$…$` on one line, hugging its content, and not followed by a digit so
/// prices like `$5 and $10` stay prose.
fn dollar_span(chunk: &str, start: usize) -> Option<MathSpan> {
    let bytes = chunk.as_bytes();
    if bytes[start] != b'$' || bytes.get(start + 1) == Some(&b'$') {
        return None;
    }
    let content_start = start + 1;
    let line_end = chunk[content_start..]
        .find('\n')
        .map_or(chunk.len(), |pos| pos + content_start);
    let close = chunk[content_start..line_end].find('$')? + content_start;
    let content = &chunk[content_start..close];
    let hugs = content
        .chars()
        .next()
        .is_some_and(|ch| !ch.is_whitespace())
        && content.chars().last().is_some_and(|ch| !ch.is_whitespace());
    if !hugs || placeholder::contains_token(content) {
        return None;
    }
    if bytes.get(close + 1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    Some(MathSpan {
        content: (content_start, close),
        end: close + 1,
        display: false,
    })
}
