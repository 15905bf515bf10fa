//! Background Requests
//!
//! Network calls run on spawned tasks so the UI loop keeps drawing. Each
//! task sends exactly one [`Completion`] back; the app applies it to the
//! controller on the UI loop.

use std::sync::Arc;

use tokio::sync::mpsc;

use widget_core::{ApiError, ChatApi, ChatReply, FeedbackReply, PendingChat, PendingFeedback};

/// Outcome of a spawned request
#[derive(Debug)]
pub enum Completion {
    /// A chat request finished
    Chat {
        /// The request as started
        pending: PendingChat,
        /// Server reply or transport error
        result: Result<ChatReply, ApiError>,
    },
    /// A feedback submission finished
    Feedback {
        /// The submission as started
        pending: PendingFeedback,
        /// Server reply or transport error
        result: Result<FeedbackReply, ApiError>,
    },
}

/// Run a chat request in the background
pub fn spawn_chat<A: ChatApi + 'static>(
    api: Arc<A>,
    pending: PendingChat,
    tx: mpsc::Sender<Completion>,
) {
    tokio::spawn(async move {
        let result = api.send_chat(&pending.request).await;
        if tx.send(Completion::Chat { pending, result }).await.is_err() {
            tracing::debug!("UI closed before chat reply arrived");
        }
    });
}

/// Run a feedback submission in the background
pub fn spawn_feedback<A: ChatApi + 'static>(
    api: Arc<A>,
    pending: PendingFeedback,
    tx: mpsc::Sender<Completion>,
) {
    tokio::spawn(async move {
        let result = api.submit_feedback(&pending.request).await;
        if tx
            .send(Completion::Feedback { pending, result })
            .await
            .is_err()
        {
            tracing::debug!("UI closed before feedback reply arrived");
        }
    });
}
