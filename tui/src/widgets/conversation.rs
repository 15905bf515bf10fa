//! Conversation Widget
//!
//! Borderless, bottom-anchored scrollable region. The newest line sits at the
//! bottom; `scroll_offset` counts lines scrolled up from there. When content
//! is cut off, the two edge rows fade to hint that there is more.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::StatefulWidget;

use super::wrap::wrap_line;

/// Scroll state for the conversation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Lines scrolled up from the bottom (0 = latest)
    pub scroll_offset: usize,
    /// Wrapped lines at the last render
    pub total_lines: usize,
}

impl ConversationState {
    /// Scroll towards older lines
    pub fn scroll_up(&mut self, amount: usize) {
        let max = self.total_lines.saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max);
    }

    /// Scroll towards newer lines
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Jump to the newest line
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Conversation renderer over pre-built logical lines
pub struct ConversationView<'a> {
    lines: &'a [Line<'a>],
}

impl<'a> ConversationView<'a> {
    /// Create a view over logical (unwrapped) lines
    pub fn new(lines: &'a [Line<'a>]) -> Self {
        Self { lines }
    }
}

fn fade(distance_from_edge: usize) -> Style {
    let shade = if distance_from_edge == 0 {
        Color::Rgb(80, 80, 80)
    } else {
        Color::Rgb(120, 120, 120)
    };
    Style::default().fg(shade)
}

impl StatefulWidget for ConversationView<'_> {
    type State = ConversationState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let wrapped: Vec<Line<'static>> = self
            .lines
            .iter()
            .flat_map(|line| wrap_line(line, area.width as usize))
            .collect();

        let height = area.height as usize;
        state.total_lines = wrapped.len();
        state.scroll_offset = state
            .scroll_offset
            .min(state.total_lines.saturating_sub(height));

        let visible_end = state.total_lines.saturating_sub(state.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        let has_content_above = visible_start > 0;
        let has_content_below = state.scroll_offset > 0;

        for (i, line) in wrapped[visible_start..visible_end].iter().enumerate() {
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, area.width);

            let row = Rect::new(area.x, y, area.width, 1);
            if has_content_above && i < 2 {
                buf.set_style(row, fade(i));
            } else if has_content_below && i >= height.saturating_sub(2) {
                buf.set_style(row, fade(height.saturating_sub(1) - i));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_anchored_to_bottom() {
        let lines: Vec<Line> = (1..=5).map(|i| Line::from(format!("Zeile {i}"))).collect();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        let mut state = ConversationState::default();

        ConversationView::new(&lines).render(area, &mut buf, &mut state);

        assert_eq!(state.total_lines, 5);
        assert_eq!(row(&buf, 0), "Zeile 3");
        assert_eq!(row(&buf, 2), "Zeile 5");
    }

    #[test]
    fn test_scroll_offset_clamped() {
        let lines: Vec<Line> = (1..=5).map(|i| Line::from(format!("Zeile {i}"))).collect();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        let mut state = ConversationState {
            scroll_offset: 100,
            total_lines: 0,
        };

        ConversationView::new(&lines).render(area, &mut buf, &mut state);

        assert_eq!(state.scroll_offset, 2);
        assert_eq!(row(&buf, 0), "Zeile 1");
    }

    #[test]
    fn test_scroll_helpers() {
        let mut state = ConversationState {
            scroll_offset: 0,
            total_lines: 10,
        };
        state.scroll_up(4);
        assert_eq!(state.scroll_offset, 4);
        state.scroll_up(100);
        assert_eq!(state.scroll_offset, 9);
        state.scroll_down(5);
        assert_eq!(state.scroll_offset, 4);
        state.scroll_to_bottom();
        assert_eq!(state.scroll_offset, 0);
    }
}
