//! Widget Core - Headless Chat Widget for the Reisebot travel assistant
//!
//! This crate holds everything the chat widget does, independent of how it is
//! drawn. A surface (the terminal UI, a web page, a test) feeds user actions
//! into a [`ChatController`] and renders the [`WidgetView`] it projects.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Surfaces                           │
//! │   ┌──────────┐     ┌────────────┐     ┌──────────────┐   │
//! │   │   TUI    │     │  HTML page │     │    Tests     │   │
//! │   └────┬─────┘     └─────┬──────┘     └──────┬───────┘   │
//! │        └─────── actions ─┴── WidgetView ─────┘           │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │
//! ┌──────────────────────────┴───────────────────────────────┐
//! │                    ChatController                         │
//! │  ┌──────────────┐  ┌─────────────────┐  ┌─────────────┐  │
//! │  │ Conversation │  │ FeedbackSelect. │  │   ChatApi   │  │
//! │  └──────────────┘  └─────────────────┘  └──────┬──────┘  │
//! └────────────────────────────────────────────────┼─────────┘
//!                                                  │ HTTP
//!                          POST /api/chat, POST /api/feedback/multiple
//! ```
//!
//! # Module Overview
//!
//! - [`api`]: server access trait and reqwest implementation
//! - [`config`]: TOML/env configuration
//! - [`controller`]: the widget controller
//! - [`conversation`]: append-only message log
//! - [`error`]: error types
//! - [`feedback`]: feedback categories and selections
//! - [`kind`]: response kinds and rendering wrappers
//! - [`messages`]: wire bodies and identifiers
//! - [`render`]: segment and HTML rendering
//! - [`view`]: read-only projection for surfaces
//!
//! # No UI Dependencies
//!
//! Nothing here depends on ratatui, crossterm, or a browser.

#![deny(missing_docs)]

pub mod api;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod feedback;
pub mod kind;
pub mod messages;
pub mod render;
pub mod view;

pub use api::{ChatApi, HttpChatApi};
pub use config::{
    load_config, load_config_from_path, load_config_with_overrides, ConfigError, ConfigOverrides,
    ConfigSource, WidgetConfig,
};
pub use controller::{
    ChatController, PendingChat, PendingFeedback, CHAT_ERROR_MESSAGE, FEEDBACK_FAILED_ALERT,
    NOTHING_SELECTED_ALERT, THANK_YOU_NOTICE,
};
pub use conversation::{BotEntry, Conversation, FeedbackState, MessageEntry, Role};
pub use error::{ApiError, FeedbackError};
pub use feedback::{FeedbackCategory, FeedbackSelections, Toggle};
pub use kind::{ResponseKind, Wrapper};
pub use messages::{
    BotResponse, ChatReply, ChatRequest, EntryId, FeedbackReply, FeedbackRequest, MessageId,
    SessionId,
};
pub use render::Segment;
pub use view::{EntryView, FeedbackButton, FeedbackControls, SubmitControl, WidgetView};
