//! Chat Server API
//!
//! The widget talks to the server through the [`ChatApi`] trait so the
//! controller can be driven by a mock in tests and by [`HttpChatApi`] in the
//! real surface.

mod http;
mod traits;

pub use http::{HttpChatApi, CHAT_PATH, FEEDBACK_PATH};
pub use traits::ChatApi;
