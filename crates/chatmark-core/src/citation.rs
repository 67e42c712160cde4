use log::{debug, trace};

use crate::escape::escape_attr;
use crate::placeholder::{self, Placeholders, SlotKind};

/// A source backing a citation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CitationSource {
    pub url: String,
    #[cfg_attr(feature = "serde", serde(default, alias = "attribution"))]
    pub title: String,
}

impl CitationSource {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Maps a literal span of the message text to its sources. Only the first
/// source is linked.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Citation {
    #[cfg_attr(feature = "serde", serde(alias = "matched_text"))]
    pub matched_text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<CitationSource>,
}

impl Citation {
    pub fn new(matched_text: impl Into<String>, items: Vec<CitationSource>) -> Self {
        Self {
            matched_text: matched_text.into(),
            items,
        }
    }

    fn source(&self) -> Option<&CitationSource> {
        self.items
            .first()
            .filter(|source| !source.url.trim().is_empty())
    }
}

/// Replaces each citation's matched text with a numbered reference link.
///
/// Citations apply in order and cumulatively: a later citation only sees the
/// occurrences earlier ones left behind.
pub(crate) fn substitute(text: &str, citations: &[Citation], slots: &mut Placeholders) -> String {
    let mut out = text.to_string();
    for (idx, citation) in citations.iter().enumerate() {
        let number = idx + 1;
        if citation.matched_text.is_empty() {
            debug!("citation {} has no matched text; skipping", number);
            continue;
        }
        let Some(source) = citation.source() else {
            debug!("citation {} has no usable source; skipping", number);
            continue;
        };
        if !placeholder::occurs_outside_tokens(&out, &citation.matched_text) {
            trace!(
                "citation {} text {:?} not found",
                number, citation.matched_text
            );
            continue;
        }
        let token = slots.insert(SlotKind::Cite, anchor(source, number));
        out = placeholder::map_outside_tokens(&out, |segment| {
            segment.replace(&citation.matched_text, &token)
        });
    }
    out
}

fn anchor(source: &CitationSource, number: usize) -> String {
    let mut out = format!("<a href=\"{}\"", escape_attr(source.url.trim()));
    if !source.title.is_empty() {
        out.push_str(&format!(" title=\"{}\"", escape_attr(&source.title)));
    }
    out.push_str(&format!(
        " class=\"citation\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        number
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::{Citation, CitationSource, substitute};
    use crate::placeholder::Placeholders;

    fn cite(text: &str, url: &str) -> Citation {
        Citation::new(text, vec![CitationSource::new(url, "Source")])
    }

    #[test]
    fn replaces_every_occurrence_with_one_label() {
        let mut slots = Placeholders::default();
        let out = substitute("a [S1] b [S1]", &[cite("[S1]", "https://x")], &mut slots);
        let restored = slots.restore(&out);
        assert_eq!(restored.matches(">1</a>").count(), 2);
        assert!(!restored.contains("[S1]"));
    }

    #[test]
    fn labels_follow_descriptor_position() {
        let mut slots = Placeholders::default();
        let citations = [cite("[A]", "https://a"), cite("[B]", "https://b")];
        let substituted = substitute("[B] then [A]", &citations, &mut slots);
        let out = slots.restore(&substituted);
        let b = out.find("https://b").expect("b link");
        let a = out.find("https://a").expect("a link");
        assert!(b < a);
        assert!(out.contains("\"https://b\" title=\"Source\" class=\"citation\" target=\"_blank\" rel=\"noopener noreferrer\">2</a>"));
        assert!(out.contains(">1</a>"));
    }

    #[test]
    fn duplicate_matched_text_is_consumed_by_first_descriptor() {
        let mut slots = Placeholders::default();
        let citations = [cite("[S]", "https://first"), cite("[S]", "https://second")];
        let substituted = substitute("see [S]", &citations, &mut slots);
        let out = slots.restore(&substituted);
        assert!(out.contains("https://first"));
        assert!(!out.contains("https://second"));
    }

    #[test]
    fn later_descriptor_cannot_reach_into_inserted_links() {
        let mut slots = Placeholders::default();
        let citations = [cite("[1]", "https://one"), cite("1", "https://digit")];
        let substituted = substitute("[1] and 1", &citations, &mut slots);
        let out = slots.restore(&substituted);
        assert!(out.contains("href=\"https://one\""));
        assert!(out.contains("href=\"https://digit\""));
        assert_eq!(out.matches("<a ").count(), 2);
    }

    #[test]
    fn unusable_descriptors_are_ignored() {
        let mut slots = Placeholders::default();
        let citations = [
            Citation::new("[x]", Vec::new()),
            cite("[y]", "  "),
            cite("", "https://empty"),
            cite("[missing]", "https://z"),
        ];
        let out = substitute("[x] [y]", &citations, &mut slots);
        assert_eq!(out, "[x] [y]");
        assert_eq!(slots.len(), 0);
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut slots = Placeholders::default();
        let citations = [Citation::new(
            "[q]",
            vec![CitationSource::new("https://x/?a=1&b=\"2\"", "<T>")],
        )];
        let substituted = substitute("[q]", &citations, &mut slots);
        let out = slots.restore(&substituted);
        assert!(out.contains("href=\"https://x/?a=1&amp;b=&quot;2&quot;\""));
        assert!(out.contains("title=\"&lt;T&gt;\""));
    }
}
