use log::trace;

use crate::citation::{self, Citation};
use crate::math::{self, MathRenderer};
use crate::options::RenderOptions;
use crate::placeholder::{self, Placeholders};
use crate::sanitize::sanitize;
use crate::{autolink, blockquote, code, emphasis, escape, heading, list, paragraph, table};

/// Renders chat markdown with default options and no math renderer.
pub fn render(text: &str, citations: &[Citation]) -> String {
    render_with_options(text, citations, &RenderOptions::default(), None)
}

/// Renders chat markdown into HTML.
///
/// Never fails: malformed constructs degrade to escaped text. Math spans are
/// only rendered when `math` is given and `options.math` is set.
pub fn render_with_options(
    text: &str,
    citations: &[Citation],
    options: &RenderOptions,
    math: Option<&dyn MathRenderer>,
) -> String {
    // Scoped to this call; nothing is shared between renders.
    let mut slots = Placeholders::default();

    let text = placeholder::strip_sentinels(text).replace("\r\n", "\n");
    let text = citation::substitute(&text, citations, &mut slots);
    let renderer = math.filter(|_| options.math);
    let text = math::protect(&text, renderer, &mut slots);
    let text = escape::escape_html(&text);
    let text = code::extract_fenced(&text, &mut slots);
    let text = code::extract_inline(&text, &mut slots);
    let text = table::apply(&text);
    let text = heading::apply(&text);
    let text = emphasis::apply(&text);
    let text = blockquote::apply(&text);
    let text = list::apply(&text);
    let text = autolink::apply(&text, options.link_display_limit);
    let text = paragraph::assemble(&text);

    trace!("restoring {} placeholder slots", slots.len());
    slots.restore(&text)
}

/// [`render`] followed by an allow-list sanitizer.
pub fn render_sanitized(text: &str, citations: &[Citation]) -> String {
    render_sanitized_with_options(text, citations, &RenderOptions::default(), None)
}

pub fn render_sanitized_with_options(
    text: &str,
    citations: &[Citation],
    options: &RenderOptions,
    math: Option<&dyn MathRenderer>,
) -> String {
    sanitize(&render_with_options(text, citations, options, math))
}
