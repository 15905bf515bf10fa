//! Widgets
//!
//! - [`ConversationView`]: bottom-anchored scrollable conversation
//! - [`wrap_line`]: word wrapping that keeps span styles

mod conversation;
mod wrap;

pub use conversation::{ConversationState, ConversationView};
pub use wrap::wrap_line;
