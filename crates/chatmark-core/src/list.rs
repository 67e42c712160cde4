//! Ordered and unordered list runs.
//!
//! Nested markers are flattened into the surrounding run. Ordered items keep
//! the numeral they were written with.

use once_cell::sync::Lazy;
use regex::Regex;

static UNORDERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( *)[-*+][ \t]+(.*)$").expect("unordered item pattern"));
static ORDERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( *)([0-9]{1,9})[.)][ \t]+(.*)$").expect("ordered item pattern"));

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

struct Item {
    value: Option<u32>,
    content: String,
}

struct Marker {
    kind: ListKind,
    indent: usize,
    item: Item,
}

enum State {
    OutsideList,
    InList { kind: ListKind, items: Vec<Item> },
}

pub(crate) fn apply(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut state = State::OutsideList;

    for line in text.split('\n') {
        let marker = parse_marker(line);
        state = match (std::mem::replace(&mut state, State::OutsideList), marker) {
            (State::InList { kind, items }, _) if line.trim().is_empty() => {
                State::InList { kind, items }
            }
            (State::InList { kind, mut items }, Some(marker)) if marker.kind == kind => {
                items.push(marker.item);
                State::InList { kind, items }
            }
            (previous, marker) => {
                if let State::InList { kind, items } = previous {
                    flush(&mut out, kind, items);
                }
                match marker {
                    Some(marker) if marker.indent <= 3 => State::InList {
                        kind: marker.kind,
                        items: vec![marker.item],
                    },
                    _ => {
                        out.push(line.to_string());
                        State::OutsideList
                    }
                }
            }
        };
    }
    if let State::InList { kind, items } = state {
        flush(&mut out, kind, items);
    }
    out.join("\n")
}

fn flush(out: &mut Vec<String>, kind: ListKind, items: Vec<Item>) {
    let tag = match kind {
        ListKind::Unordered => "ul",
        ListKind::Ordered => "ol",
    };
    let mut html = format!("<{tag}>");
    for item in items {
        match item.value {
            Some(value) => html.push_str(&format!("<li value=\"{}\">{}</li>", value, item.content)),
            None => html.push_str(&format!("<li>{}</li>", item.content)),
        }
    }
    html.push_str(&format!("</{tag}>"));
    out.push(String::new());
    out.push(html);
    out.push(String::new());
}

fn parse_marker(line: &str) -> Option<Marker> {
    if let Some(caps) = ORDERED_RE.captures(line) {
        return Some(Marker {
            kind: ListKind::Ordered,
            indent: caps[1].len(),
            item: Item {
                value: caps[2].parse().ok(),
                content: caps[3].trim().to_string(),
            },
        });
    }
    let caps = UNORDERED_RE.captures(line)?;
    Some(Marker {
        kind: ListKind::Unordered,
        indent: caps[1].len(),
        item: Item {
            value: None,
            content: caps[2].trim().to_string(),
        },
    })
}
