//! Conversation Log
//!
//! Append-only record of the turns shown in the widget. Bot entries carry
//! everything a later feedback submission needs (text, kind, tool tag and the
//! user turn they answered), so nothing has to be read back from the view.

use std::collections::HashMap;

use crate::error::FeedbackError;
use crate::kind::ResponseKind;
use crate::messages::{EntryId, MessageId};

/// Who produced an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Typed by the user
    User,
    /// Returned by the chat server
    Bot,
}

/// Feedback lifecycle of a bot entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackState {
    /// Buttons are live
    #[default]
    Open,
    /// A submission is waiting for the server
    Submitting,
    /// Feedback was stored; buttons are disabled for good
    Submitted,
}

/// A bot turn
#[derive(Clone, Debug, PartialEq)]
pub struct BotEntry {
    /// Response text
    pub text: String,
    /// Declared response kind
    pub kind: ResponseKind,
    /// Backend tool tag, if the server sent one
    pub tool_used: Option<String>,
    /// Quick replies
    pub suggestions: Vec<String>,
    /// Text of the user turn this answers (empty if there was none)
    pub user_message: String,
    /// Assigned on first feedback interaction
    pub message_id: Option<MessageId>,
    /// Feedback lifecycle
    pub feedback: FeedbackState,
}

impl BotEntry {
    /// Create a bot entry with no feedback history
    pub fn new(
        text: impl Into<String>,
        kind: ResponseKind,
        suggestions: Vec<String>,
        tool_used: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            tool_used,
            suggestions,
            user_message: String::new(),
            message_id: None,
            feedback: FeedbackState::Open,
        }
    }
}

/// One turn in the conversation
#[derive(Clone, Debug, PartialEq)]
pub enum MessageEntry {
    /// User turn (plain text)
    User(String),
    /// Bot turn
    Bot(BotEntry),
}

impl MessageEntry {
    /// Who produced this entry
    pub fn role(&self) -> Role {
        match self {
            MessageEntry::User(_) => Role::User,
            MessageEntry::Bot(_) => Role::Bot,
        }
    }

    /// Displayed text
    pub fn text(&self) -> &str {
        match self {
            MessageEntry::User(text) => text,
            MessageEntry::Bot(bot) => &bot.text,
        }
    }

    /// The bot entry, if this is one
    pub fn as_bot(&self) -> Option<&BotEntry> {
        match self {
            MessageEntry::Bot(bot) => Some(bot),
            MessageEntry::User(_) => None,
        }
    }
}

/// Ordered entries plus a lookup by message identifier
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    entries: Vec<MessageEntry>,
    by_message_id: HashMap<MessageId, EntryId>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn
    pub fn push_user(&mut self, text: impl Into<String>) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(MessageEntry::User(text.into()));
        id
    }

    /// Append a bot turn, linking it to the most recent user turn
    pub fn push_bot(&mut self, mut bot: BotEntry) -> EntryId {
        if bot.user_message.is_empty() {
            if let Some(text) = self.last_user_text() {
                bot.user_message = text.to_string();
            }
        }
        if let Some(ref message_id) = bot.message_id {
            self.by_message_id
                .insert(message_id.clone(), EntryId(self.entries.len()));
        }

        let id = EntryId(self.entries.len());
        self.entries.push(MessageEntry::Bot(bot));
        id
    }

    /// Text of the most recent user turn
    pub fn last_user_text(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match e {
            MessageEntry::User(text) => Some(text.as_str()),
            MessageEntry::Bot(_) => None,
        })
    }

    /// Get an entry
    pub fn get(&self, id: EntryId) -> Option<&MessageEntry> {
        self.entries.get(id.0)
    }

    /// Get a bot entry
    pub fn bot(&self, id: EntryId) -> Result<&BotEntry, FeedbackError> {
        match self.entries.get(id.0) {
            Some(MessageEntry::Bot(bot)) => Ok(bot),
            Some(MessageEntry::User(_)) => Err(FeedbackError::NotABotMessage),
            None => Err(FeedbackError::UnknownEntry),
        }
    }

    /// Get a bot entry mutably
    pub fn bot_mut(&mut self, id: EntryId) -> Result<&mut BotEntry, FeedbackError> {
        match self.entries.get_mut(id.0) {
            Some(MessageEntry::Bot(bot)) => Ok(bot),
            Some(MessageEntry::User(_)) => Err(FeedbackError::NotABotMessage),
            None => Err(FeedbackError::UnknownEntry),
        }
    }

    /// Message identifier of a bot entry, assigning one on first use
    pub fn ensure_message_id(&mut self, id: EntryId) -> Result<MessageId, FeedbackError> {
        let bot = self.bot_mut(id)?;
        if let Some(ref message_id) = bot.message_id {
            return Ok(message_id.clone());
        }

        let message_id = MessageId::new();
        bot.message_id = Some(message_id.clone());
        self.by_message_id.insert(message_id.clone(), id);
        Ok(message_id)
    }

    /// Find the entry carrying `message_id`
    pub fn find(&self, message_id: &MessageId) -> Option<EntryId> {
        self.by_message_id.get(message_id).copied()
    }

    /// Positions of all bot entries in order
    pub fn bot_ids(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.role() == Role::Bot)
            .map(|(i, _)| EntryId(i))
            .collect()
    }

    /// Iterate entries in order
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &MessageEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (EntryId(i), e))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the conversation is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot(text: &str) -> BotEntry {
        BotEntry::new(text, ResponseKind::Success, Vec::new(), None)
    }

    #[test]
    fn test_bot_links_preceding_user_text() {
        let mut conversation = Conversation::new();
        conversation.push_user("Wetter in Berlin?");
        let id = conversation.push_bot(bot("Sonnig, 22 Grad"));

        let entry = conversation.bot(id).unwrap();
        assert_eq!(entry.user_message, "Wetter in Berlin?");
    }

    #[test]
    fn test_bot_without_user_has_empty_context() {
        let mut conversation = Conversation::new();
        let id = conversation.push_bot(bot("Willkommen!"));
        assert_eq!(conversation.bot(id).unwrap().user_message, "");
    }

    #[test]
    fn test_message_id_is_lazy_and_stable() {
        let mut conversation = Conversation::new();
        let id = conversation.push_bot(bot("Hi"));
        assert!(conversation.bot(id).unwrap().message_id.is_none());

        let first = conversation.ensure_message_id(id).unwrap();
        let second = conversation.ensure_message_id(id).unwrap();
        assert_eq!(first, second);
        assert_eq!(conversation.find(&first), Some(id));
    }

    #[test]
    fn test_user_entries_reject_feedback() {
        let mut conversation = Conversation::new();
        let id = conversation.push_user("Hallo");
        assert_eq!(
            conversation.ensure_message_id(id),
            Err(FeedbackError::NotABotMessage)
        );
        assert_eq!(
            conversation.ensure_message_id(EntryId(42)),
            Err(FeedbackError::UnknownEntry)
        );
    }

    #[test]
    fn test_bot_ids_in_order() {
        let mut conversation = Conversation::new();
        conversation.push_user("a");
        let b1 = conversation.push_bot(bot("b"));
        conversation.push_user("c");
        let b2 = conversation.push_bot(bot("d"));

        assert_eq!(conversation.bot_ids(), vec![b1, b2]);
        assert_eq!(conversation.len(), 4);
    }
}
