//! Single-level block quotes.
//!
//! Runs on escaped text, so the quote marker arrives as `&gt;`.

const MARKER: &str = "&gt;";

enum State {
    OutsideQuote,
    InQuote(Vec<String>),
}

pub(crate) fn apply(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut state = State::OutsideQuote;

    for line in text.split('\n') {
        state = match (quote_content(line), std::mem::replace(&mut state, State::OutsideQuote)) {
            (Some(content), State::InQuote(mut lines)) => {
                lines.push(content.to_string());
                State::InQuote(lines)
            }
            (Some(content), State::OutsideQuote) => State::InQuote(vec![content.to_string()]),
            (None, previous) => {
                if let State::InQuote(lines) = previous {
                    flush(&mut out, lines);
                }
                out.push(line.to_string());
                State::OutsideQuote
            }
        };
    }
    if let State::InQuote(lines) = state {
        flush(&mut out, lines);
    }
    out.join("\n")
}

fn flush(out: &mut Vec<String>, lines: Vec<String>) {
    out.push(String::new());
    out.push(format!("<blockquote>{}</blockquote>", lines.join("<br>")));
    out.push(String::new());
}

/// Content after the marker, which must be followed by whitespace.
fn quote_content(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|b| *b == b' ').count();
    if indent > 3 {
        return None;
    }
    let rest = line[indent..].strip_prefix(MARKER)?;
    rest.starts_with([' ', '\t']).then(|| rest.trim())
}

#[cfg(test)]
mod tests {
    use super::apply;

    #[test]
    fn consecutive_lines_form_one_quote() {
        assert_eq!(
            apply("&gt; one\n&gt; two\nafter"),
            "\n<blockquote>one<br>two</blockquote>\n\nafter"
        );
    }

    #[test]
    fn quote_open_at_end_is_flushed() {
        assert_eq!(apply("before\n&gt; last"), "before\n\n<blockquote>last</blockquote>\n");
    }

    #[test]
    fn marker_needs_whitespace() {
        assert_eq!(apply("&gt;tight"), "&gt;tight");
        assert_eq!(apply("a &gt; b"), "a &gt; b");
    }

    #[test]
    fn nested_markers_stay_literal() {
        assert_eq!(
            apply("&gt; &gt; deep"),
            "\n<blockquote>&gt; deep</blockquote>\n"
        );
    }
}
