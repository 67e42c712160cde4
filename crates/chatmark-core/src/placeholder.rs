//! Per-render table of opaque tokens standing in for already-rendered markup.
//!
//! A token looks like `CITE_0` wrapped in two private-use sentinels. Text
//! stages treat it as an inert word; only [`Placeholders::restore`] expands it.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub(crate) const OPEN: char = '\u{E000}';
pub(crate) const CLOSE: char = '\u{E001}';

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}([A-Z]+)_([0-9]+)\u{E001}").expect("token pattern"));

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SlotKind {
    Cite,
    MathBlock,
    MathInline,
    CodeBlock,
    Code,
}

impl SlotKind {
    const ALL: [SlotKind; 5] = [
        SlotKind::Cite,
        SlotKind::MathBlock,
        SlotKind::MathInline,
        SlotKind::CodeBlock,
        SlotKind::Code,
    ];

    fn tag(self) -> &'static str {
        match self {
            SlotKind::Cite => "CITE",
            SlotKind::MathBlock => "MATHBLOCK",
            SlotKind::MathInline => "MATHINLINE",
            SlotKind::CodeBlock => "CODEBLOCK",
            SlotKind::Code => "CODE",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Block kinds render as standalone blocks and must not be wrapped in `<p>`.
    pub(crate) fn is_block(self) -> bool {
        matches!(self, SlotKind::MathBlock | SlotKind::CodeBlock)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Placeholders {
    slots: [Vec<String>; 5],
}

impl Placeholders {
    /// Records `fragment` and returns the token that stands in for it.
    pub(crate) fn insert(&mut self, kind: SlotKind, fragment: String) -> String {
        let slots = &mut self.slots[kind.index()];
        let token = format!("{}{}_{}{}", OPEN, kind.tag(), slots.len(), CLOSE);
        slots.push(fragment);
        token
    }

    pub(crate) fn get(&self, kind: SlotKind, index: usize) -> Option<&str> {
        self.slots[kind.index()].get(index).map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    /// Replaces every known token with its fragment. Unknown tokens stay as
    /// literal text.
    pub(crate) fn restore(&self, text: &str) -> String {
        if !text.contains(OPEN) {
            return text.to_string();
        }
        TOKEN_RE
            .replace_all(text, |caps: &Captures| {
                let fragment = SlotKind::from_tag(&caps[1]).and_then(|kind| {
                    caps[2]
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| self.get(kind, index))
                });
                match fragment {
                    Some(fragment) => fragment.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Drops sentinel characters so input text can never forge a token.
pub(crate) fn strip_sentinels(text: &str) -> Cow<'_, str> {
    if text.contains([OPEN, CLOSE]) {
        Cow::Owned(text.chars().filter(|ch| *ch != OPEN && *ch != CLOSE).collect())
    } else {
        Cow::Borrowed(text)
    }
}

pub(crate) fn contains_token(text: &str) -> bool {
    text.contains(OPEN)
}

/// Returns the kind of the token when `text` is exactly one token.
pub(crate) fn sole_token_kind(text: &str) -> Option<SlotKind> {
    let caps = TOKEN_RE.captures(text)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != text.len() {
        return None;
    }
    SlotKind::from_tag(&caps[1])
}

/// Applies `f` to every stretch of text between tokens, copying tokens as is.
pub(crate) fn map_outside_tokens<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in TOKEN_RE.find_iter(text) {
        out.push_str(&f(&text[last..token.start()]));
        out.push_str(token.as_str());
        last = token.end();
    }
    out.push_str(&f(&text[last..]));
    out
}

/// True when `needle` occurs somewhere outside the tokens of `text`.
pub(crate) fn occurs_outside_tokens(text: &str, needle: &str) -> bool {
    let mut last = 0;
    for token in TOKEN_RE.find_iter(text) {
        if text[last..token.start()].contains(needle) {
            return true;
        }
        last = token.end();
    }
    text[last..].contains(needle)
}
