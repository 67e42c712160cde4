//! Pipe table scanner.
//!
//! A run of `| … |` lines becomes a table only if it contains a separator row.
//! Rows seen before the first separator are header rows.

use log::trace;

struct Row {
    cells: Vec<String>,
    header: bool,
}

enum State<'a> {
    OutsideTable,
    InTable {
        raw: Vec<&'a str>,
        rows: Vec<Row>,
        separated: bool,
    },
}

pub(crate) fn apply(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut state = State::OutsideTable;

    for line in text.split('\n') {
        let Some(view) = row_view(line) else {
            if let State::InTable {
                raw,
                rows,
                separated,
            } = std::mem::replace(&mut state, State::OutsideTable)
            {
                flush(&mut out, raw, rows, separated);
            }
            out.push(line.to_string());
            continue;
        };

        let cells = split_cells(view);
        let separator = is_separator(&cells);
        state = match std::mem::replace(&mut state, State::OutsideTable) {
            State::OutsideTable => State::InTable {
                raw: vec![line],
                rows: if separator {
                    Vec::new()
                } else {
                    vec![Row {
                        cells,
                        header: false,
                    }]
                },
                separated: separator,
            },
            State::InTable {
                mut raw,
                mut rows,
                separated,
            } => {
                raw.push(line);
                if separator {
                    if !separated {
                        for row in rows.iter_mut() {
                            row.header = true;
                        }
                    }
                } else {
                    rows.push(Row {
                        cells,
                        header: false,
                    });
                }
                State::InTable {
                    raw,
                    rows,
                    separated: separated || separator,
                }
            }
        };
    }

    if let State::InTable {
        raw,
        rows,
        separated,
    } = state
    {
        flush(&mut out, raw, rows, separated);
    }
    out.join("\n")
}

fn flush(out: &mut Vec<String>, raw: Vec<&str>, rows: Vec<Row>, separated: bool) {
    if !separated || rows.is_empty() {
        trace!("pipe run of {} lines has no separator or no rows", raw.len());
        out.extend(raw.into_iter().map(str::to_string));
        return;
    }
    let mut html = String::from("<table>");
    for row in rows {
        let tag = if row.header { "th" } else { "td" };
        html.push_str("<tr>");
        for cell in row.cells {
            html.push_str(&format!("<{tag}>{cell}</{tag}>"));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    out.push(String::new());
    out.push(html);
    out.push(String::new());
}

/// Returns the trimmed line when it has the `| … |` row shape.
fn row_view(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|b| *b == b' ').count();
    if indent > 3 {
        return None;
    }
    let trimmed = line.trim();
    (trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')).then_some(trimmed)
}

fn split_cells(text: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut buf = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                buf.push('|');
                chars.next();
            }
            '|' => {
                cells.push(buf.trim().to_string());
                buf.clear();
            }
            _ => buf.push(ch),
        }
    }
    cells.push(buf.trim().to_string());

    // The row's own boundary pipes leave one empty cell at each end.
    if cells.len() > 1 && cells.first().is_some_and(String::is_empty) {
        cells.remove(0);
    }
    if cells.len() > 1 && cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            let core = cell.trim_matches(':');
            !core.is_empty() && core.chars().all(|ch| ch == '-')
        })
}
