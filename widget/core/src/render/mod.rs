//! Rendering Strategies
//!
//! Each [`ResponseKind`] maps to a [`Wrapper`] and a way of splitting the
//! bot text into [`Segment`]s. Surfaces turn segments into whatever they draw
//! with: terminal spans, or HTML via [`html`].

pub mod html;

use std::sync::OnceLock;

use regex::Regex;

use crate::kind::{ResponseKind, Wrapper};

/// A run of rendered text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Plain text
    Text(String),
    /// A clickable URL
    Link(String),
}

impl Segment {
    /// The visible text of this segment
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(s) | Segment::Link(s) => s,
        }
    }
}

/// A bot message body ready for a surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBody {
    /// Visual wrapper
    pub wrapper: Wrapper,
    /// Content in order
    pub segments: Vec<Segment>,
}

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is valid"))
}

/// Split `text` into text and link segments
pub fn linkify(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in url_pattern().find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(text[last..m.start()].to_string()));
        }
        segments.push(Segment::Link(m.as_str().to_string()));
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }
    segments
}

/// Render a bot message body according to its kind
pub fn render_body(text: &str, kind: &ResponseKind) -> RenderedBody {
    let segments = if kind.linkifies() {
        linkify(text)
    } else if text.is_empty() {
        Vec::new()
    } else {
        vec![Segment::Text(text.to_string())]
    };

    RenderedBody {
        wrapper: kind.wrapper(),
        segments,
    }
}
