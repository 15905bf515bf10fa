//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize, request completions)
//! - ChatController for all widget state
//! - Rendering of the controller's view projection
//!
//! Requests never block the loop: they run on spawned tasks and their
//! completions arrive over an mpsc channel.

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use widget_core::{ChatApi, ChatController, EntryId, FeedbackCategory, FeedbackError};

use crate::display::{conversation_lines, USER_PREFIX};
use crate::requests::{spawn_chat, spawn_feedback, Completion};
use crate::theme::{DIM_GRAY, ERROR_RED, REISEBOT_VIOLET, USER_GREEN};
use crate::widgets::{ConversationState, ConversationView};

/// Input box height (lines), including the separator
const INPUT_HEIGHT: u16 = 4;

/// Redraw interval when nothing happens (spinner, notice expiry)
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner frames for the loading indicator
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main application state
pub struct App<A: ChatApi + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Widget ===
    /// Owner of all chat and feedback state
    controller: ChatController<A>,
    /// Focused bot entry (`None` = follow the newest)
    focus: Option<EntryId>,

    // === Requests ===
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,

    // === Rendering State ===
    /// Conversation scroll state
    conversation: ConversationState,
    /// Frames drawn (drives the spinner)
    frame_count: usize,
    /// Terminal size
    size: (u16, u16),
}

impl<A: ChatApi + 'static> App<A> {
    /// Create an app around a controller
    pub fn new(controller: ChatController<A>, size: (u16, u16)) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel(32);
        Self {
            running: true,
            controller,
            focus: None,
            completions_tx,
            completions_rx,
            conversation: ConversationState::default(),
            frame_count: 0,
            size,
        }
    }

    /// The widget controller
    pub fn controller(&self) -> &ChatController<A> {
        &self.controller
    }

    /// Whether the event loop should continue
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Bot entry that F1-F5 and Alt+N act on
    pub fn focused_entry(&self) -> Option<EntryId> {
        self.focus
            .or_else(|| self.controller.conversation().bot_ids().last().copied())
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                        Some(Ok(Event::Resize(w, h))) => self.size = (w, h),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                Some(completion) = self.completions_rx.recv() => {
                    self.apply_completion(completion);
                }

                _ = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            self.controller.tick(Instant::now());
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Wait for the next request completion and apply it
    pub async fn next_completion(&mut self) -> bool {
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Chat { pending, result } => {
                self.controller.complete_send(pending, result);
            }
            Completion::Feedback { pending, result } => {
                self.controller
                    .complete_feedback_submission(pending, result, Instant::now());
            }
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        // An open alert swallows everything until dismissed
        if self.controller.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.controller.dismiss_alert();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.running = false,

            KeyCode::Enter => self.send(),

            KeyCode::Char(c) if alt && ('1'..='9').contains(&c) => {
                let index = (c as usize) - ('1' as usize);
                self.choose_suggestion(index);
            }

            KeyCode::Char(c) if !ctrl && !alt => {
                self.controller.input_mut().push(c);
            }

            KeyCode::Backspace => {
                self.controller.input_mut().pop();
            }

            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),

            KeyCode::F(n @ 1..=4) => {
                let category = FeedbackCategory::ALL[(n - 1) as usize];
                self.toggle_feedback(category);
            }
            KeyCode::F(5) => self.submit_feedback(),

            KeyCode::PageUp => {
                let page = self.conversation_height() / 2;
                self.conversation.scroll_up(page.max(1));
            }
            KeyCode::PageDown => {
                let page = self.conversation_height() / 2;
                self.conversation.scroll_down(page.max(1));
            }
            KeyCode::Home if ctrl => {
                let total = self.conversation.total_lines;
                self.conversation.scroll_up(total);
            }
            KeyCode::End if ctrl => self.conversation.scroll_to_bottom(),

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.conversation.scroll_up(3),
            MouseEventKind::ScrollDown => self.conversation.scroll_down(3),
            _ => {}
        }
    }

    fn send(&mut self) {
        if let Some(pending) = self.controller.begin_send() {
            spawn_chat(self.controller.api(), pending, self.completions_tx.clone());
            self.focus = None;
            self.conversation.scroll_to_bottom();
        }
    }

    fn choose_suggestion(&mut self, index: usize) {
        let Some(entry) = self.focused_entry() else {
            return;
        };
        if let Some(pending) = self.controller.choose_suggestion(entry, index) {
            spawn_chat(self.controller.api(), pending, self.completions_tx.clone());
            self.focus = None;
            self.conversation.scroll_to_bottom();
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let bots = self.controller.conversation().bot_ids();
        if bots.is_empty() {
            return;
        }

        let current = self
            .focus
            .and_then(|f| bots.iter().position(|b| *b == f))
            .unwrap_or(bots.len() - 1);
        let next = current as isize + delta;

        self.focus = if next >= bots.len() as isize {
            None
        } else {
            Some(bots[next.max(0) as usize])
        };
    }

    fn toggle_feedback(&mut self, category: FeedbackCategory) {
        let Some(entry) = self.focused_entry() else {
            return;
        };
        if let Err(e) = self.controller.toggle_feedback(entry, category) {
            tracing::debug!(error = %e, "Feedback toggle ignored");
        }
    }

    fn submit_feedback(&mut self) {
        let Some(entry) = self.focused_entry() else {
            return;
        };
        match self.controller.begin_feedback_submission_for(entry) {
            Ok(pending) => {
                spawn_feedback(self.controller.api(), pending, self.completions_tx.clone());
            }
            // Alert already queued by the controller
            Err(FeedbackError::NothingSelected) => {}
            Err(e) => tracing::debug!(error = %e, "Feedback submission ignored"),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn conversation_height(&self) -> usize {
        self.size.1.saturating_sub(INPUT_HEIGHT + 1) as usize
    }

    /// Draw one frame
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.frame_count = self.frame_count.wrapping_add(1);
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.size = (area.width, area.height);
        let view = self.controller.view();

        let [conversation_area, input_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);

        // Conversation
        let lines = conversation_lines(&view, self.focused_entry());
        let inner = Rect {
            x: conversation_area.x + 1,
            width: conversation_area.width.saturating_sub(2),
            ..conversation_area
        };
        frame.render_stateful_widget(ConversationView::new(&lines), inner, &mut self.conversation);

        // Input
        self.draw_input(frame, input_area, &view.input);

        // Status
        self.draw_status(frame, status_area, view.loading);

        // Alert overlay
        if let Some(ref alert) = view.alert {
            Self::draw_alert(frame, area, alert);
        }
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect, input: &str) {
        if area.height < 2 {
            return;
        }
        let text_width = area.width.saturating_sub(1) as usize;
        let text_height = area.height.saturating_sub(1) as usize;

        let mut lines = vec![Line::from(Span::styled(
            "-".repeat(area.width as usize),
            Style::default().fg(Color::DarkGray),
        ))];

        let full_input = format!("{USER_PREFIX}{input}_");
        let wrapped: Vec<String> = textwrap::wrap(&full_input, text_width.max(5))
            .iter()
            .map(|s| s.to_string())
            .collect();
        let skip = wrapped.len().saturating_sub(text_height);
        lines.extend(
            wrapped
                .into_iter()
                .skip(skip)
                .map(|l| Line::from(Span::styled(l, Style::default().fg(USER_GREEN)))),
        );

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, loading: bool) {
        let mut spans = Vec::new();
        if loading {
            let spinner = SPINNER[self.frame_count % SPINNER.len()];
            spans.push(Span::styled(
                format!(" {spinner} Reisebot denkt nach..."),
                Style::default().fg(REISEBOT_VIOLET),
            ));
        } else {
            spans.push(Span::styled(" Bereit", Style::default().fg(DIM_GRAY)));
        }

        let scroll_info = if self.conversation.scroll_offset > 0 {
            format!(" [^{} Zeilen]", self.conversation.scroll_offset)
        } else {
            String::new()
        };
        spans.push(Span::styled(
            format!(
                " | Enter senden | ↑↓ Nachricht | F1-F4 Feedback | F5 absenden | Esc beenden{scroll_info}"
            ),
            Style::default().fg(DIM_GRAY),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_alert(frame: &mut Frame, area: Rect, alert: &str) {
        let width = area.width.saturating_sub(4).min(60);
        let height = 5.min(area.height);
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ERROR_RED))
            .title(" Hinweis ");
        let body = Paragraph::new(vec![
            Line::from(alert.to_string()),
            Line::from(Span::styled(
                "Enter: OK",
                Style::default().fg(DIM_GRAY),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(block);

        frame.render_widget(Clear, popup);
        frame.render_widget(body, popup);
    }
}
