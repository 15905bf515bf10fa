//! HTTP Chat API
//!
//! [`ChatApi`] over reqwest. Both endpoints take and return JSON; error
//! statuses are still decoded because the server reports failures as
//! `{"success": false, "error": "..."}` with a 4xx/5xx status.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::ChatApi;
use crate::config::WidgetConfig;
use crate::error::ApiError;
use crate::messages::{ChatReply, ChatRequest, FeedbackReply, FeedbackRequest};

/// Chat endpoint path
pub const CHAT_PATH: &str = "/api/chat";

/// Batch feedback endpoint path
pub const FEEDBACK_PATH: &str = "/api/feedback/multiple";

/// HTTP client for the chat server
#[derive(Clone)]
pub struct HttpChatApi {
    chat_url: String,
    feedback_url: String,
    http_client: reqwest::Client,
}

impl HttpChatApi {
    /// Create a client for the server described by `config`
    pub fn new(config: &WidgetConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            chat_url: config.endpoint(CHAT_PATH),
            feedback_url: config.endpoint(FEEDBACK_PATH),
            http_client,
        })
    }

    /// Chat endpoint URL
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Feedback endpoint URL
    pub fn feedback_url(&self) -> &str {
        &self.feedback_url
    }

    async fn post_json<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self.http_client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(url, %status, bytes = text.len(), "Server replied");

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post_json(&self.chat_url, request).await
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<FeedbackReply, ApiError> {
        self.post_json(&self.feedback_url, request).await
    }
}
