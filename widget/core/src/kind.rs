//! Response Kinds
//!
//! The server tags every bot response with a `type` string controlling how it
//! is rendered. Known tags map to dedicated variants; anything else falls back
//! to [`ResponseKind::Other`] and renders as plain text.

use serde::{Deserialize, Serialize};

/// Server-declared category of a bot response
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseKind {
    /// Weather report
    WeatherInfo,
    /// Hotel search results (URLs are linkified)
    HotelResults,
    /// Error message
    Error,
    /// Confirmation of a completed action
    Success,
    /// Answer retrieved from the knowledge base
    RagResponse,
    /// Answer produced through an MCP tool
    McpResponse,
    /// Any other tag (`general`, `greeting`, ...), rendered as plain text
    Other(String),
}

impl ResponseKind {
    /// Parse a wire tag
    pub fn parse(tag: &str) -> Self {
        match tag {
            "weather_info" => Self::WeatherInfo,
            "hotel_results" => Self::HotelResults,
            "error" => Self::Error,
            "success" => Self::Success,
            "rag_response" => Self::RagResponse,
            "mcp_response" => Self::McpResponse,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire tag for this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::WeatherInfo => "weather_info",
            Self::HotelResults => "hotel_results",
            Self::Error => "error",
            Self::Success => "success",
            Self::RagResponse => "rag_response",
            Self::McpResponse => "mcp_response",
            Self::Other(tag) => tag,
        }
    }

    /// The rendering wrapper for this kind
    pub fn wrapper(&self) -> Wrapper {
        match self {
            Self::WeatherInfo => Wrapper::WeatherInfo,
            Self::HotelResults => Wrapper::HotelResults,
            Self::Error => Wrapper::Error,
            Self::Success => Wrapper::Success,
            Self::RagResponse => Wrapper::RagResponse,
            Self::McpResponse => Wrapper::McpResponse,
            Self::Other(_) => Wrapper::Plain,
        }
    }

    /// Whether URLs in the text are turned into links
    pub fn linkifies(&self) -> bool {
        matches!(self, Self::HotelResults)
    }
}

impl Default for ResponseKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ResponseKind {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<ResponseKind> for String {
    fn from(kind: ResponseKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual wrapper a bot message is rendered in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wrapper {
    /// `weather-info` box
    WeatherInfo,
    /// `hotel-results` box
    HotelResults,
    /// `error-message` box
    Error,
    /// `success-message` box
    Success,
    /// `rag-response` box
    RagResponse,
    /// `mcp-response` box
    McpResponse,
    /// Bare text, no wrapper
    Plain,
}

impl Wrapper {
    /// CSS class of the wrapper element (`None` for plain text)
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Self::WeatherInfo => Some("weather-info"),
            Self::HotelResults => Some("hotel-results"),
            Self::Error => Some("error-message"),
            Self::Success => Some("success-message"),
            Self::RagResponse => Some("rag-response"),
            Self::McpResponse => Some("mcp-response"),
            Self::Plain => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_round_trip() {
        for tag in [
            "weather_info",
            "hotel_results",
            "error",
            "success",
            "rag_response",
            "mcp_response",
        ] {
            let kind = ResponseKind::parse(tag);
            assert!(!matches!(kind, ResponseKind::Other(_)), "{tag}");
            assert_eq!(kind.as_str(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_plain() {
        let kind = ResponseKind::parse("missing_info");
        assert_eq!(kind, ResponseKind::Other("missing_info".into()));
        assert_eq!(kind.as_str(), "missing_info");
        assert_eq!(kind.wrapper(), Wrapper::Plain);
        assert_eq!(kind.wrapper().class_name(), None);
    }

    #[test]
    fn test_only_hotels_linkify() {
        assert!(ResponseKind::HotelResults.linkifies());
        assert!(!ResponseKind::WeatherInfo.linkifies());
        assert!(!ResponseKind::Other("general".into()).linkifies());
    }

    #[test]
    fn test_serde_uses_wire_tag() {
        let kind: ResponseKind = serde_json::from_str(r#""rag_response""#).unwrap();
        assert_eq!(kind, ResponseKind::RagResponse);
        assert_eq!(
            serde_json::to_string(&ResponseKind::McpResponse).unwrap(),
            r#""mcp_response""#
        );
    }
}
