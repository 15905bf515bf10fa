//! Error Types

use thiserror::Error;

use crate::messages::MessageId;

/// Failure of a single request to the chat server
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was not the expected JSON
    #[error("Failed to decode server reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reasons a feedback interaction is refused
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// Submit was requested with no category selected
    #[error("No feedback category selected")]
    NothingSelected,

    /// Feedback only applies to bot messages
    #[error("Feedback can only be given on bot messages")]
    NotABotMessage,

    /// The entry does not exist in the conversation
    #[error("No conversation entry at the given position")]
    UnknownEntry,

    /// No bot message carries this identifier
    #[error("Unknown message: {0}")]
    UnknownMessage(MessageId),

    /// Feedback for this message was already submitted
    #[error("Feedback already submitted for this message")]
    AlreadySubmitted,

    /// A submission for this message is still waiting for the server
    #[error("Feedback submission already in progress")]
    InFlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let error: ApiError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(error
            .to_string()
            .starts_with("Failed to decode server reply: "));
    }

    #[test]
    fn test_unknown_message_display() {
        let error = FeedbackError::UnknownMessage(MessageId("msg_1".into()));
        assert_eq!(error.to_string(), "Unknown message: msg_1");
    }
}
