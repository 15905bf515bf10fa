//! HTML Rendering
//!
//! Markup for embedding the widget in a page. All text is escaped; links
//! open in a new tab.

use crate::conversation::Role;
use crate::kind::Wrapper;
use crate::view::{EntryView, SubmitControl};

use super::Segment;

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn segments_html(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => escape(text),
            Segment::Link(url) => {
                let url = escape(url);
                format!(
                    r#"<a href="{url}" target="_blank" style="color: #667eea; text-decoration: underline;">{url}</a>"#
                )
            }
        })
        .collect()
}

/// Body markup: segments inside the wrapper element for `wrapper`
pub fn body_html(wrapper: Wrapper, segments: &[Segment]) -> String {
    let inner = segments_html(segments);
    match wrapper.class_name() {
        Some(class) => format!(r#"<div class="{class}">{inner}</div>"#),
        None => inner,
    }
}

/// Full markup of one conversation entry
pub fn entry_html(entry: &EntryView) -> String {
    let sender = match entry.role {
        Role::User => "user",
        Role::Bot => "bot",
    };

    let mut html = format!(r#"<div class="message {sender}-message">"#);
    html.push_str(&body_html(entry.wrapper, &entry.segments));

    if !entry.suggestions.is_empty() {
        html.push_str(r#"<div class="suggestions">"#);
        for suggestion in &entry.suggestions {
            html.push_str(&format!(
                r#"<button class="suggestion-btn">{}</button>"#,
                escape(suggestion)
            ));
        }
        html.push_str("</div>");
    }

    if let Some(ref feedback) = entry.feedback {
        html.push_str(r#"<div class="feedback-inline">"#);
        for button in &feedback.buttons {
            let mut class = String::from("feedback-btn");
            if button.selected {
                class.push_str(" selected");
            }
            html.push_str(&format!(
                r#"<button class="{class}" data-feedback="{}"{}>{}</button>"#,
                button.category.as_str(),
                if button.disabled { " disabled" } else { "" },
                escape(button.category.label()),
            ));
        }
        match feedback.submit {
            SubmitControl::Hidden => {}
            SubmitControl::Enabled => {
                html.push_str(r#"<button class="submit-feedback-btn">Feedback senden</button>"#)
            }
            SubmitControl::Disabled => html.push_str(
                r#"<button class="submit-feedback-btn" disabled>Feedback senden</button>"#,
            ),
        }
        html.push_str("</div>");
    }

    if let Some(ref notice) = entry.notice {
        html.push_str(&format!(
            r#"<div class="feedback-thanks">{}</div>"#,
            escape(notice)
        ));
    }

    html.push_str("</div>");
    html
}
