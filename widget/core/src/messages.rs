//! Wire Messages and Identifiers
//!
//! Request/response bodies for the two server endpoints, plus the
//! identifiers the widget attaches to a session and to bot messages.
//!
//! # Endpoints
//!
//! - `POST /api/chat`: [`ChatRequest`] up, [`ChatReply`] down
//! - `POST /api/feedback/multiple`: [`FeedbackRequest`] up, [`FeedbackReply`] down

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::feedback::FeedbackCategory;
use crate::kind::ResponseKind;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 string of `len` characters
pub(crate) fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Client-generated session identifier, sent as `user_id`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new session identifier (`user_` + 9 base-36 chars)
    pub fn new() -> Self {
        Self(format!("user_{}", random_base36(9)))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a bot message, assigned on first feedback interaction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new message identifier (`msg_<unix-ms>_<9 base-36 chars>`)
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self(format!("msg_{}_{}", now, random_base36(9)))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of an entry in the conversation log
///
/// Entries are never removed, so an index stays valid for the widget lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

// ============================================================================
// /api/chat
// ============================================================================

/// Body of `POST /api/chat`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user text
    pub message: String,
    /// Session identifier
    pub user_id: String,
}

/// Bot response carried inside a successful [`ChatReply`]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BotResponse {
    /// Text to display
    pub message: String,
    /// Quick-reply strings
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
    /// Declared response kind
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: ResponseKind,
    /// Backend tool that produced the response
    #[serde(default)]
    pub tool_used: Option<String>,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reply from `POST /api/chat`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatReply {
    /// Whether the server handled the message
    #[serde(default)]
    pub success: bool,
    /// The bot response (present on success)
    #[serde(default)]
    pub response: Option<BotResponse>,
    /// Server-side interaction identifier
    #[serde(default)]
    pub interaction_id: Option<String>,
    /// Server-side error description
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// /api/feedback/multiple
// ============================================================================

/// Body of `POST /api/feedback/multiple`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedbackRequest {
    /// The user turn the bot answered
    pub user_message: String,
    /// The bot response text
    pub ai_response: String,
    /// Selected categories in click order
    pub feedback_types: Vec<FeedbackCategory>,
    /// Free-text feedback (always empty from this widget)
    pub specific_feedback: String,
    /// Tool tag of the bot response
    pub tool_used: String,
    /// Wire name of the response kind
    pub response_type: String,
}

/// Reply from `POST /api/feedback/multiple`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FeedbackReply {
    /// Whether the feedback was stored
    #[serde(default)]
    pub success: bool,
    /// Server-side error description
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = SessionId::new();
        let suffix = id.as_str().strip_prefix("user_").unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_message_ids_unique() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert!(a.as_str().starts_with("msg_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_chat_reply_success_parse() {
        let json = r#"{
            "success": true,
            "response": {
                "message": "Hi",
                "suggestions": ["A", "B"],
                "type": "success",
                "tool_used": "get_weather"
            },
            "interaction_id": "abc"
        }"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert!(reply.success);
        let response = reply.response.unwrap();
        assert_eq!(response.message, "Hi");
        assert_eq!(response.suggestions, vec!["A", "B"]);
        assert_eq!(response.kind, ResponseKind::Success);
        assert_eq!(response.tool_used.as_deref(), Some("get_weather"));
    }

    #[test]
    fn test_chat_reply_failure_parse() {
        let reply: ChatReply = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!reply.success);
        assert!(reply.response.is_none());
    }

    #[test]
    fn test_bot_response_defaults() {
        let response: BotResponse = serde_json::from_str(r#"{"message": "x"}"#).unwrap();
        assert!(response.suggestions.is_empty());
        assert_eq!(response.kind, ResponseKind::Other(String::new()));
        assert!(response.tool_used.is_none());
    }

    #[test]
    fn test_null_suggestions_are_empty() {
        let json = r#"{"success": true, "response": {"message": "Hi", "suggestions": null, "type": "success"}}"#;
        let response = serde_json::from_str::<ChatReply>(json)
            .unwrap()
            .response
            .unwrap();
        assert_eq!(response.message, "Hi");
        assert!(response.suggestions.is_empty());
        assert_eq!(response.kind, ResponseKind::Success);
    }

    #[test]
    fn test_null_type_is_plain() {
        let json = r#"{"success": true, "response": {"message": "Hi", "type": null}}"#;
        let response = serde_json::from_str::<ChatReply>(json)
            .unwrap()
            .response
            .unwrap();
        assert_eq!(response.kind, ResponseKind::Other(String::new()));
        assert_eq!(response.kind.wrapper(), crate::kind::Wrapper::Plain);
    }

    #[test]
    fn test_feedback_request_serializes_wire_names() {
        let request = FeedbackRequest {
            user_message: "Wetter in Berlin?".into(),
            ai_response: "Sonnig".into(),
            feedback_types: vec![FeedbackCategory::ThumbsUp, FeedbackCategory::Incomplete],
            specific_feedback: String::new(),
            tool_used: "unknown".into(),
            response_type: "weather_info".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["feedback_types"],
            serde_json::json!(["thumbs_up", "incomplete"])
        );
        assert_eq!(value["specific_feedback"], "");
        assert_eq!(value["response_type"], "weather_info");
    }
}
