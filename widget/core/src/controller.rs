//! Chat Widget Controller
//!
//! Owns all widget state for the lifetime of a page: the session identifier,
//! the input line, the conversation log, pending feedback selections, alerts
//! and notices. Surfaces mutate it from their UI loop only.
//!
//! # Request Flow
//!
//! Each user action makes at most one request and never retries. Network
//! operations come in two forms:
//!
//! - split: [`ChatController::begin_send`] / [`ChatController::complete_send`]
//!   (and the feedback equivalents) so a surface can run the request on a
//!   spawned task and apply the result when it arrives
//! - combined: [`ChatController::send_message`] /
//!   [`ChatController::submit_all_feedbacks`] awaiting inline
//!
//! Completions are applied in arrival order. Two overlapping sends can
//! therefore have their replies appended in the opposite order.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crate::api::ChatApi;
use crate::config::WidgetConfig;
use crate::conversation::{BotEntry, Conversation, FeedbackState};
use crate::error::{ApiError, FeedbackError};
use crate::feedback::{FeedbackCategory, FeedbackSelections, Toggle};
use crate::kind::ResponseKind;
use crate::messages::{
    ChatReply, ChatRequest, EntryId, FeedbackReply, FeedbackRequest, MessageId, SessionId,
};
use crate::view::{EntryView, WidgetView};

/// Shown as a bot turn when a chat request fails for any reason
pub const CHAT_ERROR_MESSAGE: &str = "Entschuldigung, es ist ein Fehler aufgetreten.";

/// Alert for a submit with nothing selected
pub const NOTHING_SELECTED_ALERT: &str = "Bitte wählen Sie mindestens eine Feedback-Option aus.";

/// Alert for a failed feedback submission without a server message
pub const FEEDBACK_FAILED_ALERT: &str =
    "Fehler beim Senden des Feedbacks. Bitte versuchen Sie es erneut.";

/// Notice shown after feedback was stored
pub const THANK_YOU_NOTICE: &str = "Vielen Dank für Ihr Feedback!";

/// Tool tag sent when the bot response had none
pub const UNKNOWN_TOOL: &str = "unknown";

/// A chat request that has been started but not completed
#[derive(Clone, Debug, PartialEq)]
pub struct PendingChat {
    /// The user entry that triggered it
    pub user_entry: EntryId,
    /// Body to send
    pub request: ChatRequest,
}

/// A feedback submission that has been started but not completed
#[derive(Clone, Debug, PartialEq)]
pub struct PendingFeedback {
    /// Bot entry the feedback is about
    pub entry: EntryId,
    /// Its message identifier
    pub message_id: MessageId,
    /// Body to send
    pub request: FeedbackRequest,
}

#[derive(Clone, Debug)]
struct Notice {
    entry: EntryId,
    text: String,
    expires_at: Instant,
}

/// The chat widget controller
pub struct ChatController<A: ChatApi> {
    api: Arc<A>,
    config: WidgetConfig,
    session: SessionId,
    input: String,
    conversation: Conversation,
    selections: FeedbackSelections,
    chats_in_flight: usize,
    alerts: VecDeque<String>,
    notices: Vec<Notice>,
}

impl<A: ChatApi> ChatController<A> {
    /// Create a controller with a fresh session identifier
    pub fn new(api: A, config: WidgetConfig) -> Self {
        Self::with_shared_api(Arc::new(api), config)
    }

    /// Create a controller around an API handle shared with spawned tasks
    pub fn with_shared_api(api: Arc<A>, config: WidgetConfig) -> Self {
        let session = SessionId::new();
        tracing::debug!(session = %session, "Chat widget initialized");

        Self {
            api,
            config,
            session,
            input: String::new(),
            conversation: Conversation::new(),
            selections: FeedbackSelections::new(),
            chats_in_flight: 0,
            alerts: VecDeque::new(),
            notices: Vec::new(),
        }
    }

    /// API handle for running requests off the UI loop
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// Active configuration
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Session identifier sent as `user_id`
    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editable input text
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Replace the input text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Conversation log
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Pending feedback selections
    pub fn selections(&self) -> &FeedbackSelections {
        &self.selections
    }

    /// Whether the loading indicator is shown
    ///
    /// Counts chat requests in flight: with overlapping sends the indicator
    /// stays up until the last reply has been applied, not the first.
    pub fn is_loading(&self) -> bool {
        self.chats_in_flight > 0
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Start sending the current input
    ///
    /// Returns `None` (and does nothing) when the trimmed input is empty.
    /// Otherwise appends the user entry, clears the input and shows loading.
    pub fn begin_send(&mut self) -> Option<PendingChat> {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        let user_entry = self.conversation.push_user(message.clone());
        self.input.clear();
        self.chats_in_flight += 1;

        tracing::debug!(entry = user_entry.0, "Sending chat message");

        Some(PendingChat {
            user_entry,
            request: ChatRequest {
                message,
                user_id: self.session.0.clone(),
            },
        })
    }

    /// Apply the outcome of a chat request, returning the new bot entry
    pub fn complete_send(
        &mut self,
        pending: PendingChat,
        result: Result<ChatReply, ApiError>,
    ) -> EntryId {
        self.chats_in_flight = self.chats_in_flight.saturating_sub(1);

        match result {
            Ok(ChatReply {
                success: true,
                response: Some(response),
                interaction_id,
                ..
            }) => {
                tracing::debug!(
                    entry = pending.user_entry.0,
                    interaction_id = interaction_id.as_deref().unwrap_or(""),
                    kind = %response.kind,
                    "Chat reply received"
                );
                self.add_bot_message(
                    response.message,
                    response.suggestions,
                    response.kind,
                    response.tool_used,
                )
            }
            Ok(reply) => {
                tracing::warn!(
                    error = reply.error.as_deref().unwrap_or("no response"),
                    "Chat request rejected by server"
                );
                self.add_error_message()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.add_error_message()
            }
        }
    }

    /// Send the current input and wait for the reply
    ///
    /// Returns the new bot entry, or `None` if the input was empty.
    pub async fn send_message(&mut self) -> Option<EntryId> {
        let pending = self.begin_send()?;
        let result = self.api.send_chat(&pending.request).await;
        Some(self.complete_send(pending, result))
    }

    /// Append a bot turn
    pub fn add_bot_message(
        &mut self,
        message: impl Into<String>,
        suggestions: Vec<String>,
        kind: ResponseKind,
        tool_used: Option<String>,
    ) -> EntryId {
        self.conversation
            .push_bot(BotEntry::new(message, kind, suggestions, tool_used))
    }

    fn add_error_message(&mut self) -> EntryId {
        self.add_bot_message(CHAT_ERROR_MESSAGE, Vec::new(), ResponseKind::Error, None)
    }

    /// Put suggestion `index` of a bot entry into the input and start sending it
    pub fn choose_suggestion(&mut self, entry: EntryId, index: usize) -> Option<PendingChat> {
        let suggestion = self
            .conversation
            .bot(entry)
            .ok()?
            .suggestions
            .get(index)?
            .clone();
        self.input = suggestion;
        self.begin_send()
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    /// Toggle a feedback category on a bot entry
    ///
    /// Assigns the entry's message identifier on first use.
    pub fn toggle_feedback(
        &mut self,
        entry: EntryId,
        category: FeedbackCategory,
    ) -> Result<Toggle, FeedbackError> {
        match self.conversation.bot(entry)?.feedback {
            FeedbackState::Open => {}
            FeedbackState::Submitting => return Err(FeedbackError::InFlight),
            FeedbackState::Submitted => return Err(FeedbackError::AlreadySubmitted),
        }

        let message_id = self.conversation.ensure_message_id(entry)?;
        let toggle = self.selections.toggle(&message_id, category);

        tracing::debug!(
            message_id = %message_id,
            category = %category,
            ?toggle,
            "Feedback toggled"
        );
        Ok(toggle)
    }

    /// Message identifier of a bot entry, if one has been assigned
    pub fn message_id_of(&self, entry: EntryId) -> Option<&MessageId> {
        self.conversation.bot(entry).ok()?.message_id.as_ref()
    }

    /// Start submitting the selection for `message_id`
    ///
    /// With nothing selected this queues an alert and returns
    /// [`FeedbackError::NothingSelected`] without building a request.
    pub fn begin_feedback_submission(
        &mut self,
        message_id: &MessageId,
    ) -> Result<PendingFeedback, FeedbackError> {
        let selected = self.selections.get(message_id).to_vec();
        if selected.is_empty() {
            self.alerts.push_back(NOTHING_SELECTED_ALERT.to_string());
            return Err(FeedbackError::NothingSelected);
        }

        let entry = self
            .conversation
            .find(message_id)
            .ok_or_else(|| FeedbackError::UnknownMessage(message_id.clone()))?;
        let bot = self.conversation.bot_mut(entry)?;
        match bot.feedback {
            FeedbackState::Open => {}
            FeedbackState::Submitting => return Err(FeedbackError::InFlight),
            FeedbackState::Submitted => return Err(FeedbackError::AlreadySubmitted),
        }
        bot.feedback = FeedbackState::Submitting;

        let request = FeedbackRequest {
            user_message: bot.user_message.clone(),
            ai_response: bot.text.clone(),
            feedback_types: selected,
            specific_feedback: String::new(),
            tool_used: bot
                .tool_used
                .clone()
                .unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
            response_type: bot.kind.as_str().to_string(),
        };

        tracing::debug!(message_id = %message_id, "Submitting feedback");

        Ok(PendingFeedback {
            entry,
            message_id: message_id.clone(),
            request,
        })
    }

    /// Start submitting the selection of a bot entry
    ///
    /// Like [`Self::begin_feedback_submission`], assigning the entry's
    /// message identifier first if it has none yet.
    pub fn begin_feedback_submission_for(
        &mut self,
        entry: EntryId,
    ) -> Result<PendingFeedback, FeedbackError> {
        let message_id = self.conversation.ensure_message_id(entry)?;
        self.begin_feedback_submission(&message_id)
    }

    /// Apply the outcome of a feedback submission
    ///
    /// Returns whether the feedback was stored.
    pub fn complete_feedback_submission(
        &mut self,
        pending: PendingFeedback,
        result: Result<FeedbackReply, ApiError>,
        now: Instant,
    ) -> bool {
        let stored = match result {
            Ok(FeedbackReply { success: true, .. }) => true,
            Ok(FeedbackReply { error, .. }) => {
                tracing::warn!(
                    message_id = %pending.message_id,
                    error = error.as_deref().unwrap_or(""),
                    "Feedback rejected by server"
                );
                self.alerts
                    .push_back(error.unwrap_or_else(|| FEEDBACK_FAILED_ALERT.to_string()));
                false
            }
            Err(e) => {
                tracing::warn!(message_id = %pending.message_id, error = %e, "Feedback submission failed");
                self.alerts.push_back(FEEDBACK_FAILED_ALERT.to_string());
                false
            }
        };

        if let Ok(bot) = self.conversation.bot_mut(pending.entry) {
            bot.feedback = if stored {
                FeedbackState::Submitted
            } else {
                FeedbackState::Open
            };
        }

        if stored {
            self.selections.remove(&pending.message_id);
            self.notices.push(Notice {
                entry: pending.entry,
                text: THANK_YOU_NOTICE.to_string(),
                expires_at: now + self.config.thank_you_duration,
            });
        }
        stored
    }

    /// Submit the selection for `message_id` and wait for the reply
    ///
    /// `Err` means no request was sent; `Ok(false)` means the request failed
    /// and an alert was queued.
    pub async fn submit_all_feedbacks(
        &mut self,
        message_id: &MessageId,
    ) -> Result<bool, FeedbackError> {
        let pending = self.begin_feedback_submission(message_id)?;
        let result = self.api.submit_feedback(&pending.request).await;
        Ok(self.complete_feedback_submission(pending, result, Instant::now()))
    }

    // ========================================================================
    // Alerts, notices, view
    // ========================================================================

    /// Oldest alert waiting to be dismissed
    pub fn alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    /// Dismiss the oldest alert
    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alerts.pop_front()
    }

    /// Drop notices that have expired by `now`
    pub fn tick(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    /// Notice currently shown under `entry`
    pub fn notice_for(&self, entry: EntryId) -> Option<&str> {
        self.notices
            .iter()
            .rev()
            .find(|n| n.entry == entry)
            .map(|n| n.text.as_str())
    }

    /// Project the current state for rendering
    pub fn view(&self) -> WidgetView {
        let entries = self
            .conversation
            .iter()
            .map(|(id, entry)| {
                EntryView::project(
                    id,
                    entry,
                    &self.selections,
                    self.notice_for(id).map(str::to_string),
                )
            })
            .collect();

        WidgetView {
            entries,
            input: self.input.clone(),
            loading: self.is_loading(),
            alert: self.alert().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    /// API that must never be called
    struct NoNetwork;

    #[async_trait]
    impl ChatApi for NoNetwork {
        async fn send_chat(&self, _: &ChatRequest) -> Result<ChatReply, ApiError> {
            panic!("unexpected chat request")
        }
        async fn submit_feedback(&self, _: &FeedbackRequest) -> Result<FeedbackReply, ApiError> {
            panic!("unexpected feedback request")
        }
    }

    fn decode_error() -> ApiError {
        serde_json::from_str::<ChatReply>("<html>").unwrap_err().into()
    }

    fn controller() -> ChatController<NoNetwork> {
        ChatController::new(NoNetwork, WidgetConfig::default())
    }

    #[test]
    fn test_begin_send_trims_and_clears() {
        let mut c = controller();
        c.set_input("  Hallo  ");
        let pending = c.begin_send().unwrap();

        assert_eq!(pending.request.message, "Hallo");
        assert_eq!(pending.request.user_id, c.session_id().as_str());
        assert_eq!(c.input(), "");
        assert!(c.is_loading());
        assert_eq!(c.conversation().get(pending.user_entry).unwrap().text(), "Hallo");
    }

    #[test]
    fn test_whitespace_input_is_noop() {
        let mut c = controller();
        c.set_input(" \t\n ");
        assert!(c.begin_send().is_none());
        assert!(c.conversation().is_empty());
        assert!(!c.is_loading());
    }

    #[test]
    fn test_empty_send_and_submit_make_no_request() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);
        let id = c.conversation.ensure_message_id(bot).unwrap();

        assert_eq!(tokio_test::block_on(c.send_message()), None);
        assert_eq!(
            tokio_test::block_on(c.submit_all_feedbacks(&id)),
            Err(FeedbackError::NothingSelected)
        );
    }

    #[test]
    fn test_loading_counts_overlapping_requests() {
        let mut c = controller();
        c.set_input("eins");
        let first = c.begin_send().unwrap();
        c.set_input("zwei");
        let second = c.begin_send().unwrap();

        c.complete_send(second, Err(decode_error()));
        assert!(c.is_loading());
        c.complete_send(first, Err(decode_error()));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_choose_suggestion_sends_it() {
        let mut c = controller();
        let bot = c.add_bot_message("Wohin?", vec!["Berlin".into(), "Wien".into()], ResponseKind::Success, None);
        c.set_input("halb getippt");

        let pending = c.choose_suggestion(bot, 1).unwrap();
        assert_eq!(pending.request.message, "Wien");
        assert_eq!(c.input(), "");
        assert!(c.choose_suggestion(bot, 5).is_none());
        assert!(c.choose_suggestion(pending.user_entry, 0).is_none());
    }

    #[test]
    fn test_toggle_rejected_on_user_entry() {
        let mut c = controller();
        let user = c.conversation.push_user("Hallo");
        assert_eq!(
            c.toggle_feedback(user, FeedbackCategory::ThumbsUp),
            Err(FeedbackError::NotABotMessage)
        );
    }

    #[test]
    fn test_toggle_blocked_while_submitting() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);
        c.toggle_feedback(bot, FeedbackCategory::ThumbsUp).unwrap();
        let id = c.message_id_of(bot).unwrap().clone();
        let _pending = c.begin_feedback_submission(&id).unwrap();

        assert_eq!(
            c.toggle_feedback(bot, FeedbackCategory::ThumbsDown),
            Err(FeedbackError::InFlight)
        );
        assert_eq!(
            c.begin_feedback_submission(&id).unwrap_err(),
            FeedbackError::InFlight
        );
    }

    #[test]
    fn test_failed_submission_reopens_and_keeps_selection() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);
        c.toggle_feedback(bot, FeedbackCategory::Inaccurate).unwrap();
        let id = c.message_id_of(bot).unwrap().clone();

        let pending = c.begin_feedback_submission(&id).unwrap();
        let stored = c.complete_feedback_submission(
            pending,
            Ok(FeedbackReply {
                success: false,
                error: Some("Speicher voll".into()),
            }),
            Instant::now(),
        );

        assert!(!stored);
        assert_eq!(c.alert(), Some("Speicher voll"));
        assert_eq!(c.selections().get(&id), &[FeedbackCategory::Inaccurate]);
        assert!(c.begin_feedback_submission(&id).is_ok());
    }

    #[test]
    fn test_network_failure_uses_generic_alert() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);
        c.toggle_feedback(bot, FeedbackCategory::ThumbsUp).unwrap();
        let id = c.message_id_of(bot).unwrap().clone();

        let pending = c.begin_feedback_submission(&id).unwrap();
        let err = serde_json::from_str::<FeedbackReply>("not json").unwrap_err();
        c.complete_feedback_submission(pending, Err(ApiError::Decode(err)), Instant::now());

        assert_eq!(c.dismiss_alert().as_deref(), Some(FEEDBACK_FAILED_ALERT));
        assert_eq!(c.alert(), None);
    }

    #[test]
    fn test_thank_you_notice_expires() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);
        c.toggle_feedback(bot, FeedbackCategory::ThumbsUp).unwrap();
        let id = c.message_id_of(bot).unwrap().clone();

        let start = Instant::now();
        let pending = c.begin_feedback_submission(&id).unwrap();
        assert!(c.complete_feedback_submission(
            pending,
            Ok(FeedbackReply {
                success: true,
                error: None
            }),
            start,
        ));
        assert_eq!(c.notice_for(bot), Some(THANK_YOU_NOTICE));

        c.tick(start + Duration::from_secs(2));
        assert_eq!(c.notice_for(bot), Some(THANK_YOU_NOTICE));

        c.tick(start + Duration::from_secs(3));
        assert_eq!(c.notice_for(bot), None);
    }

    #[test]
    fn test_buttons_disabled_during_submission() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);
        c.toggle_feedback(bot, FeedbackCategory::ThumbsUp).unwrap();
        let _pending = c.begin_feedback_submission_for(bot).unwrap();

        let view = c.view();
        let feedback = view.entries[0].feedback.as_ref().unwrap();
        assert!(feedback.all_disabled());
        assert_eq!(
            c.toggle_feedback(bot, FeedbackCategory::ThumbsDown),
            Err(FeedbackError::InFlight)
        );
    }

    #[test]
    fn test_submit_untouched_entry_alerts() {
        let mut c = controller();
        let bot = c.add_bot_message("Hi", Vec::new(), ResponseKind::Success, None);

        assert_eq!(
            c.begin_feedback_submission_for(bot).unwrap_err(),
            FeedbackError::NothingSelected
        );
        assert_eq!(c.alert(), Some(NOTHING_SELECTED_ALERT));
        assert!(c.message_id_of(bot).is_some());
    }

    #[test]
    fn test_feedback_request_defaults_tool_to_unknown() {
        let mut c = controller();
        c.conversation.push_user("Hotels in Rom");
        let bot = c.add_bot_message("https://rom.example", Vec::new(), ResponseKind::HotelResults, None);
        c.toggle_feedback(bot, FeedbackCategory::ThumbsDown).unwrap();
        let id = c.message_id_of(bot).unwrap().clone();

        let pending = c.begin_feedback_submission(&id).unwrap();
        assert_eq!(pending.request.user_message, "Hotels in Rom");
        assert_eq!(pending.request.ai_response, "https://rom.example");
        assert_eq!(pending.request.tool_used, UNKNOWN_TOOL);
        assert_eq!(pending.request.response_type, "hotel_results");
        assert_eq!(pending.request.specific_feedback, "");
    }
}
