//! Styled Word Wrapping
//!
//! textwrap breaks the line's plain text; the styled spans are then cut back
//! out of each wrapped piece by byte offset.

use std::borrow::Cow;
use std::ops::Range;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use textwrap::{Options, WordSeparator};

/// Cut the styled runs overlapping `piece` out of `text`
fn restyle(text: &str, runs: &[(Range<usize>, Style)], piece: Range<usize>) -> Line<'static> {
    let spans: Vec<Span<'static>> = runs
        .iter()
        .filter_map(|(run, style)| {
            let start = run.start.max(piece.start);
            let end = run.end.min(piece.end);
            (start < end).then(|| Span::styled(text[start..end].to_string(), *style))
        })
        .collect();
    Line::from(spans)
}

/// Wrap a styled line to `width` columns
///
/// Breaks at spaces, keeps leading indentation, and splits words that are
/// wider than a full line. Always returns at least one line.
pub fn wrap_line(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    let mut text = String::new();
    let mut runs = Vec::with_capacity(line.spans.len());
    for span in &line.spans {
        let start = text.len();
        text.push_str(&span.content);
        runs.push((start..text.len(), line.style.patch(span.style)));
    }

    // URLs must only break when they overflow, not at every '/'
    let options = Options::new(width.max(1)).word_separator(WordSeparator::AsciiSpace);
    let base = text.as_ptr() as usize;

    let wrapped: Vec<Line<'static>> = textwrap::wrap(&text, options)
        .into_iter()
        .map(|piece| match piece {
            Cow::Borrowed(s) => {
                let start = (s.as_ptr() as usize).wrapping_sub(base);
                match start.checked_add(s.len()) {
                    Some(end) if end <= text.len() && text.is_char_boundary(start) => {
                        restyle(&text, &runs, start..end)
                    }
                    _ => Line::styled(s.to_string(), line.style),
                }
            }
            Cow::Owned(s) => Line::styled(s, line.style),
        })
        .collect();

    if wrapped.is_empty() {
        vec![Line::default()]
    } else {
        wrapped
    }
}
