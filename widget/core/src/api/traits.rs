//! Chat API Trait

use async_trait::async_trait;

use crate::error::ApiError;
use crate::messages::{ChatReply, ChatRequest, FeedbackReply, FeedbackRequest};

/// Access to the two server endpoints
///
/// Implementations make exactly one attempt per call. A reply with
/// `success: false` is returned as `Ok`; interpreting it is up to the caller.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /api/chat`
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// `POST /api/feedback/multiple`
    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<FeedbackReply, ApiError>;
}
