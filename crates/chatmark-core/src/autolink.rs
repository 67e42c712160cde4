use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

use crate::escape::{escape_html, unescape};

/// Targets longer than this many characters are displayed as `host/...`.
pub const DEFAULT_LINK_DISPLAY_LIMIT: usize = 50;

// A link starts at the beginning of text, after whitespace, or right after a
// generated tag. Prose `>` is escaped by now, so a raw `>` always ends a tag.
// Placeholder sentinels end a link so slot tokens are never swallowed.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[\s>])((?:https?://|www\.)[^\s<\x{E000}\x{E001}]+)")
        .expect("autolink pattern")
});

const TRAILING_ENTITIES: [&str; 5] = ["&quot;", "&gt;", "&lt;", "&amp;", "&#39;"];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\''];

pub(crate) fn apply(text: &str, display_limit: usize) -> String {
    URL_RE
        .replace_all(text, |caps: &Captures| {
            let (target, trailing) = split_trailing(&caps[2]);
            if !has_body(target) {
                return caps[0].to_string();
            }
            let href = if target.starts_with("www.") {
                format!("https://{}", target)
            } else {
                target.to_string()
            };
            format!(
                "{}<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>{}",
                &caps[1],
                href,
                display_text(target, &href, display_limit),
                trailing
            )
        })
        .into_owned()
}

fn has_body(target: &str) -> bool {
    ["https://", "http://", "www."]
        .iter()
        .find(|prefix| target.starts_with(**prefix))
        .is_some_and(|prefix| target.len() > prefix.len())
}

/// Splits closing punctuation off the end of a matched token.
fn split_trailing(token: &str) -> (&str, &str) {
    let mut end = token.len();
    loop {
        let head = &token[..end];
        if let Some(entity) = TRAILING_ENTITIES.iter().find(|entity| head.ends_with(**entity)) {
            end -= entity.len();
        } else if head.ends_with(TRAILING_PUNCTUATION) {
            end -= 1;
        } else {
            break;
        }
    }
    token.split_at(end)
}

fn display_text(target: &str, href: &str, limit: usize) -> String {
    if unescape(target).chars().count() <= limit {
        return target.to_string();
    }
    match Url::parse(&unescape(href)) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}/...", escape_html(host)),
            None => target.to_string(),
        },
        Err(_) => target.to_string(),
    }
}
