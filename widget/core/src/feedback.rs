//! Feedback Selections
//!
//! Per-message feedback is collected locally and submitted as a batch.
//! [`FeedbackSelections`] maps a [`MessageId`] to the categories the user has
//! toggled on, in click order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::messages::MessageId;

/// A qualitative tag a user can attach to a bot message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    /// Good answer
    ThumbsUp,
    /// Bad answer
    ThumbsDown,
    /// Answer is missing information
    Incomplete,
    /// Answer contains wrong information
    Inaccurate,
}

impl FeedbackCategory {
    /// All categories in button order
    pub const ALL: [FeedbackCategory; 4] = [
        FeedbackCategory::ThumbsUp,
        FeedbackCategory::ThumbsDown,
        FeedbackCategory::Incomplete,
        FeedbackCategory::Inaccurate,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs_up",
            Self::ThumbsDown => "thumbs_down",
            Self::Incomplete => "incomplete",
            Self::Inaccurate => "inaccurate",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "👍 Gut",
            Self::ThumbsDown => "👎 Schlecht",
            Self::Incomplete => "Unvollständig",
            Self::Inaccurate => "Ungenau",
        }
    }
}

impl std::fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of toggling a category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// Category was added to the selection
    On,
    /// Category was removed from the selection
    Off,
}

/// Selected categories per message
///
/// A message has an entry only while at least one category is selected.
#[derive(Clone, Debug, Default)]
pub struct FeedbackSelections {
    selections: HashMap<MessageId, Vec<FeedbackCategory>>,
}

impl FeedbackSelections {
    /// Create an empty selection set
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `category` for `id`, dropping the entry once it is empty
    pub fn toggle(&mut self, id: &MessageId, category: FeedbackCategory) -> Toggle {
        let list = self.selections.entry(id.clone()).or_default();
        let toggle = if let Some(pos) = list.iter().position(|c| *c == category) {
            list.remove(pos);
            Toggle::Off
        } else {
            list.push(category);
            Toggle::On
        };

        if list.is_empty() {
            self.selections.remove(id);
        }
        toggle
    }

    /// Selected categories for `id` in click order (empty if none)
    pub fn get(&self, id: &MessageId) -> &[FeedbackCategory] {
        self.selections.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `category` is selected for `id`
    pub fn is_selected(&self, id: &MessageId, category: FeedbackCategory) -> bool {
        self.get(id).contains(&category)
    }

    /// Whether `id` has any selection
    pub fn contains(&self, id: &MessageId) -> bool {
        self.selections.contains_key(id)
    }

    /// Discard the selection for `id`
    pub fn remove(&mut self, id: &MessageId) -> Option<Vec<FeedbackCategory>> {
        self.selections.remove(id)
    }

    /// Number of messages with a pending selection
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether no message has a pending selection
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
