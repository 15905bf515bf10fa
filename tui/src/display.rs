//! Conversation Display
//!
//! Turns the controller's [`WidgetView`] into styled logical lines for the
//! conversation widget. Wrapping happens later, at render time.
//!
//! Each entry becomes:
//! - the message body (prefix, wrapper tag, text and links)
//! - suggestion buttons, numbered for Alt+1..9
//! - the feedback row (F1-F4 toggles, F5 submit)
//! - the thank-you notice, while it lasts
//! - a blank separator line

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use widget_core::{EntryId, EntryView, FeedbackControls, Role, Segment, SubmitControl, WidgetView};

use crate::theme::{
    link_style, wrapper_style, wrapper_tag, DIM_GRAY, FEEDBACK_SELECTED, NOTICE_GOLD,
    REISEBOT_VIOLET, SUCCESS_GREEN, USER_GREEN,
};

/// Prefix of user lines
pub const USER_PREFIX: &str = "Du: ";

/// Prefix of bot lines
pub const BOT_PREFIX: &str = "Reisebot: ";

/// Build the conversation lines for `view`, marking `focused`
pub fn conversation_lines(view: &WidgetView, focused: Option<EntryId>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in &view.entries {
        push_entry(&mut lines, entry, focused == Some(entry.id));
        lines.push(Line::default());
    }
    lines
}

fn push_entry(lines: &mut Vec<Line<'static>>, entry: &EntryView, focused: bool) {
    let marker = if focused { "> " } else { "" };
    let mut first: Vec<Span<'static>> = Vec::new();

    match entry.role {
        Role::User => {
            first.push(Span::styled(
                USER_PREFIX,
                Style::default().fg(USER_GREEN).add_modifier(Modifier::BOLD),
            ));
        }
        Role::Bot => {
            if focused {
                first.push(Span::styled(marker, Style::default().fg(REISEBOT_VIOLET)));
            }
            first.push(Span::styled(
                BOT_PREFIX,
                Style::default()
                    .fg(REISEBOT_VIOLET)
                    .add_modifier(Modifier::BOLD),
            ));
            if let Some(tag) = wrapper_tag(entry.wrapper) {
                first.push(Span::styled(tag, wrapper_style(entry.wrapper)));
            }
        }
    }

    let body_style = match entry.role {
        Role::User => Style::default().fg(USER_GREEN),
        Role::Bot => wrapper_style(entry.wrapper),
    };
    lines.extend(body_lines(first, &entry.segments, body_style));

    if !entry.suggestions.is_empty() {
        lines.push(suggestion_line(&entry.suggestions));
    }
    if let Some(ref feedback) = entry.feedback {
        lines.push(feedback_line(feedback));
    }
    if let Some(ref notice) = entry.notice {
        lines.push(Line::from(Span::styled(
            format!("  {notice}"),
            Style::default().fg(NOTICE_GOLD),
        )));
    }
}

/// Lay segments out into lines, splitting on embedded newlines
fn body_lines(
    prefix: Vec<Span<'static>>,
    segments: &[Segment],
    style: Style,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current = prefix;

    for segment in segments {
        let segment_style = match segment {
            Segment::Text(_) => style,
            Segment::Link(_) => link_style(),
        };
        let mut parts = segment.text().split('\n');
        if let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), segment_style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), segment_style));
            }
        }
    }

    lines.push(Line::from(current));
    lines
}

fn suggestion_line(suggestions: &[String]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, suggestion) in suggestions.iter().enumerate() {
        let key = if i < 9 {
            format!("Alt+{} ", i + 1)
        } else {
            String::new()
        };
        spans.push(Span::styled(
            format!("[{key}{suggestion}]"),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn feedback_line(feedback: &FeedbackControls) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, button) in feedback.buttons.iter().enumerate() {
        let style = if button.disabled {
            Style::default().fg(DIM_GRAY)
        } else if button.selected {
            Style::default().fg(Color::White).bg(FEEDBACK_SELECTED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!("[F{} {}]", i + 1, button.category.label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    match feedback.submit {
        SubmitControl::Hidden => {}
        SubmitControl::Enabled => spans.push(Span::styled(
            "[F5 Feedback senden]",
            Style::default()
                .fg(SUCCESS_GREEN)
                .add_modifier(Modifier::BOLD),
        )),
        SubmitControl::Disabled => spans.push(Span::styled(
            "[Feedback wird gesendet...]",
            Style::default().fg(DIM_GRAY),
        )),
    }
    Line::from(spans)
}

/// Plain text of a line (for tests and logging)
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use widget_core::{FeedbackButton, FeedbackCategory, Wrapper};

    fn bot_entry(segments: Vec<Segment>, feedback: FeedbackControls) -> EntryView {
        EntryView {
            id: EntryId(1),
            role: Role::Bot,
            wrapper: Wrapper::HotelResults,
            segments,
            suggestions: vec!["Mehr Hotels".into()],
            feedback: Some(feedback),
            notice: None,
        }
    }

    fn controls(submit: SubmitControl) -> FeedbackControls {
        FeedbackControls {
            message_id: None,
            buttons: FeedbackCategory::ALL.map(|category| FeedbackButton {
                category,
                selected: category == FeedbackCategory::Incomplete,
                disabled: false,
            }),
            submit,
        }
    }

    #[test]
    fn test_body_lines_split_on_newlines() {
        let segments = vec![
            Segment::Text("Hotel A\nHotel B ".into()),
            Segment::Link("https://b.example".into()),
        ];
        let lines = body_lines(vec![Span::raw("Reisebot: ")], &segments, Style::default());
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text, vec!["Reisebot: Hotel A", "Hotel B https://b.example"]);
        assert_eq!(lines[1].spans[1].style, link_style());
    }

    #[test]
    fn test_bot_entry_lines() {
        let view = WidgetView {
            entries: vec![bot_entry(
                vec![Segment::Text("Zwei Treffer".into())],
                controls(SubmitControl::Enabled),
            )],
            input: String::new(),
            loading: false,
            alert: None,
        };

        let lines = conversation_lines(&view, Some(EntryId(1)));
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(text[0], "> Reisebot: [Hotels] Zwei Treffer");
        assert_eq!(text[1], "  [Alt+1 Mehr Hotels] ");
        assert!(text[2].contains("[F3 Unvollständig]"));
        assert!(text[2].ends_with("[F5 Feedback senden]"));
        assert_eq!(text[3], "");
    }

    #[test]
    fn test_selected_button_is_highlighted() {
        let line = feedback_line(&controls(SubmitControl::Hidden));
        let incomplete = line
            .spans
            .iter()
            .find(|s| s.content.contains("Unvollständig"))
            .unwrap();
        assert_eq!(incomplete.style.bg, Some(FEEDBACK_SELECTED));
        assert!(!line_text(&line).contains("F5"));
    }
}
