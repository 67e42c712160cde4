use std::collections::{HashMap, HashSet};

use ammonia::Builder;

/// Runs rendered markup through an allow-list of the tags the pipeline emits
/// plus what math fragments need.
pub(crate) fn sanitize(html: &str) -> String {
    let tags: HashSet<&'static str> = [
        // Pipeline output
        "a",
        "blockquote",
        "br",
        "code",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "table",
        "td",
        "th",
        "tr",
        "ul",
        // Math fragments
        "div",
        "span",
        "svg",
        "g",
        "defs",
        "path",
        "clipPath",
        "use",
    ]
    .iter()
    .copied()
    .collect();

    let mut generic_attributes: HashSet<&'static str> = HashSet::new();
    generic_attributes.insert("class");

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href", "title", "target"].iter().copied().collect());
    tag_attributes.insert("li", ["value"].iter().copied().collect());
    tag_attributes.insert(
        "svg",
        ["xmlns", "viewBox", "width", "height", "class"]
            .iter()
            .copied()
            .collect(),
    );
    tag_attributes.insert(
        "g",
        [
            "transform",
            "fill",
            "stroke",
            "stroke-width",
            "clip-path",
            "class",
        ]
        .iter()
        .copied()
        .collect(),
    );
    tag_attributes.insert(
        "path",
        ["d", "fill", "stroke", "stroke-width", "class"]
            .iter()
            .copied()
            .collect(),
    );
    tag_attributes.insert("clipPath", ["id"].iter().copied().collect());
    tag_attributes.insert("use", ["href", "xlink:href"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .generic_attributes(generic_attributes)
        .tag_attributes(tag_attributes)
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}
