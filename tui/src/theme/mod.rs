//! Theme and Colors
//!
//! Reisebot's palette. Bot messages are tinted by their response wrapper so
//! weather, hotels, errors and confirmations are told apart at a glance.

use ratatui::style::{Color, Modifier, Style};
use widget_core::Wrapper;

// ============================================================================
// Conversation
// ============================================================================

/// Reisebot's signature accent (bot prefix, focus marker)
pub const REISEBOT_VIOLET: Color = Color::Rgb(118, 75, 162);

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// Link blue (#667eea)
pub const LINK_BLUE: Color = Color::Rgb(102, 126, 234);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

// ============================================================================
// Response Wrappers
// ============================================================================

/// Weather reports - sky blue
pub const WEATHER_BLUE: Color = Color::Rgb(100, 180, 255);

/// Hotel results - warm sand
pub const HOTEL_SAND: Color = Color::Rgb(240, 200, 120);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Knowledge base answers - lavender
pub const RAG_LAVENDER: Color = Color::Rgb(190, 170, 255);

/// Tool answers - teal
pub const MCP_TEAL: Color = Color::Rgb(90, 200, 190);

// ============================================================================
// Feedback
// ============================================================================

/// Selected feedback button background
pub const FEEDBACK_SELECTED: Color = Color::Rgb(102, 126, 234);

/// Thank-you notice
pub const NOTICE_GOLD: Color = Color::Rgb(255, 223, 128);

/// Style of a bot message body
pub fn wrapper_style(wrapper: Wrapper) -> Style {
    let color = match wrapper {
        Wrapper::WeatherInfo => WEATHER_BLUE,
        Wrapper::HotelResults => HOTEL_SAND,
        Wrapper::Error => ERROR_RED,
        Wrapper::Success => SUCCESS_GREEN,
        Wrapper::RagResponse => RAG_LAVENDER,
        Wrapper::McpResponse => MCP_TEAL,
        Wrapper::Plain => Color::Reset,
    };
    Style::default().fg(color)
}

/// Short tag shown before a wrapped bot message
pub fn wrapper_tag(wrapper: Wrapper) -> Option<&'static str> {
    match wrapper {
        Wrapper::WeatherInfo => Some("[Wetter] "),
        Wrapper::HotelResults => Some("[Hotels] "),
        Wrapper::Error => Some("[Fehler] "),
        Wrapper::Success => Some("[OK] "),
        Wrapper::RagResponse => Some("[Wissen] "),
        Wrapper::McpResponse => Some("[Tool] "),
        Wrapper::Plain => None,
    }
}

/// Style of a link inside a message
pub fn link_style() -> Style {
    Style::default()
        .fg(LINK_BLUE)
        .add_modifier(Modifier::UNDERLINED)
}
