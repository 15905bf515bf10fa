//! View Projection
//!
//! Read-only snapshot of the widget built from the controller's records.
//! Surfaces render a [`WidgetView`] and never inspect controller internals.

use crate::conversation::{FeedbackState, MessageEntry, Role};
use crate::feedback::{FeedbackCategory, FeedbackSelections};
use crate::kind::Wrapper;
use crate::messages::{EntryId, MessageId};
use crate::render::{render_body, Segment};

/// State of one feedback toggle button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedbackButton {
    /// Category the button toggles
    pub category: FeedbackCategory,
    /// Currently toggled on
    pub selected: bool,
    /// No longer clickable
    pub disabled: bool,
}

/// State of the "submit feedback" control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitControl {
    /// Nothing selected, or already submitted
    Hidden,
    /// Ready to submit
    Enabled,
    /// Submission waiting for the server
    Disabled,
}

/// Inline feedback block under a bot message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackControls {
    /// Identifier, once one has been assigned
    pub message_id: Option<MessageId>,
    /// The four toggle buttons in fixed order
    pub buttons: [FeedbackButton; 4],
    /// Submit control
    pub submit: SubmitControl,
}

impl FeedbackControls {
    fn project(
        message_id: Option<&MessageId>,
        state: FeedbackState,
        selections: &FeedbackSelections,
    ) -> Self {
        let buttons = FeedbackCategory::ALL.map(|category| FeedbackButton {
            category,
            selected: message_id.is_some_and(|id| selections.is_selected(id, category)),
            disabled: state != FeedbackState::Open,
        });

        let has_selection = message_id.is_some_and(|id| selections.contains(id));
        let submit = match state {
            FeedbackState::Submitted => SubmitControl::Hidden,
            FeedbackState::Submitting => SubmitControl::Disabled,
            FeedbackState::Open if has_selection => SubmitControl::Enabled,
            FeedbackState::Open => SubmitControl::Hidden,
        };

        Self {
            message_id: message_id.cloned(),
            buttons,
            submit,
        }
    }

    /// Categories currently selected, in button order
    pub fn selected(&self) -> Vec<FeedbackCategory> {
        self.buttons
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.category)
            .collect()
    }

    /// Whether every button is disabled
    pub fn all_disabled(&self) -> bool {
        self.buttons.iter().all(|b| b.disabled)
    }
}

/// One rendered conversation entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryView {
    /// Position in the conversation
    pub id: EntryId,
    /// Who produced it
    pub role: Role,
    /// Visual wrapper (`Plain` for user turns)
    pub wrapper: Wrapper,
    /// Body content
    pub segments: Vec<Segment>,
    /// Suggestion buttons
    pub suggestions: Vec<String>,
    /// Feedback block (bot entries only)
    pub feedback: Option<FeedbackControls>,
    /// Transient notice shown under the entry
    pub notice: Option<String>,
}

impl EntryView {
    pub(crate) fn project(
        id: EntryId,
        entry: &MessageEntry,
        selections: &FeedbackSelections,
        notice: Option<String>,
    ) -> Self {
        match entry {
            MessageEntry::User(text) => Self {
                id,
                role: Role::User,
                wrapper: Wrapper::Plain,
                segments: vec![Segment::Text(text.clone())],
                suggestions: Vec::new(),
                feedback: None,
                notice,
            },
            MessageEntry::Bot(bot) => {
                let body = render_body(&bot.text, &bot.kind);
                Self {
                    id,
                    role: Role::Bot,
                    wrapper: body.wrapper,
                    segments: body.segments,
                    suggestions: bot.suggestions.clone(),
                    feedback: Some(FeedbackControls::project(
                        bot.message_id.as_ref(),
                        bot.feedback,
                        selections,
                    )),
                    notice,
                }
            }
        }
    }

    /// Body text with segments joined
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }
}

/// Snapshot of the whole widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetView {
    /// Entries in display order
    pub entries: Vec<EntryView>,
    /// Current input text
    pub input: String,
    /// Loading indicator
    pub loading: bool,
    /// Blocking alert waiting to be dismissed
    pub alert: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(id: &MessageId) -> FeedbackSelections {
        let mut selections = FeedbackSelections::new();
        selections.toggle(id, FeedbackCategory::Inaccurate);
        selections
    }

    #[test]
    fn test_open_controls_are_clickable() {
        let id = MessageId("msg_1".into());
        let controls = FeedbackControls::project(Some(&id), FeedbackState::Open, &selected(&id));

        assert!(controls.buttons.iter().all(|b| !b.disabled));
        assert_eq!(controls.selected(), vec![FeedbackCategory::Inaccurate]);
        assert_eq!(controls.submit, SubmitControl::Enabled);
    }

    #[test]
    fn test_buttons_disabled_while_submitting() {
        let id = MessageId("msg_1".into());
        let controls =
            FeedbackControls::project(Some(&id), FeedbackState::Submitting, &selected(&id));

        assert!(controls.all_disabled());
        assert_eq!(controls.submit, SubmitControl::Disabled);
        assert!(controls.buttons[3].selected);
    }

    #[test]
    fn test_untouched_entry_hides_submit() {
        let controls =
            FeedbackControls::project(None, FeedbackState::Open, &FeedbackSelections::new());

        assert!(controls.message_id.is_none());
        assert_eq!(controls.submit, SubmitControl::Hidden);
    }
}
