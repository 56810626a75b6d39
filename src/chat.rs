//! Chat Assistant
//!
//! In-memory conversation with the AI assistant. Messages are kept in
//! insertion order and are not persisted.

use crate::client::{ApiClient, ApiError, ChatRequest};
use crate::reports::ReportFile;
use crate::responses::ChatReply;
use serde::Serialize;

/// First message of every conversation
pub const GREETING: &str = "Hello! I'm your AI health assistant. I can help explain your reports, \
suggest tests, or answer medical questions. How can I help you today?";

/// Query sent when only an image is attached
pub const IMAGE_ONLY_QUERY: &str = "medgemma analyze this image";

/// `image_url` marker telling the backend to run image analysis on the
/// most recent upload
pub const UPLOADED_IMAGE_MARKER: &str = "mock_url_triggering_medgemma_in_backend";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

/// Ordered chat transcript
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Start a conversation with the assistant greeting
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 0,
        };
        conversation.push(Sender::Ai, GREETING.to_string());
        conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    fn push(&mut self, sender: Sender, text: String) -> &ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            sender,
            text,
        });
        // just pushed
        &self.messages[self.messages.len() - 1]
    }

    /// Send a message, optionally with an image, and append the answer.
    ///
    /// Returns `None` when there is nothing to send. Failures are appended
    /// as an assistant message prefixed with `Error: `, so the returned
    /// message is always the assistant's turn.
    pub async fn send(
        &mut self,
        client: &ApiClient,
        text: &str,
        image: Option<&ReportFile>,
    ) -> Option<&ChatMessage> {
        let blank = text.trim().is_empty();
        if blank && image.is_none() {
            return None;
        }

        let shown = if blank { "Sent an image" } else { text };
        self.push(Sender::User, shown.to_string());

        let answer = match ask(client, text, image).await {
            Ok(reply) => reply.text().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                format!("Error: {}", e.message())
            }
        };

        Some(self.push(Sender::Ai, answer))
    }
}

async fn ask(client: &ApiClient, text: &str, image: Option<&ReportFile>) -> Result<ChatReply, ApiError> {
    let query = if text.trim().is_empty() { IMAGE_ONLY_QUERY } else { text };
    let mut request = ChatRequest::text(query);

    if let Some(image) = image {
        // The upload response is not needed; the marker points the
        // backend at the file it just stored.
        client.upload_report(image).await?;
        request = request.with_image(UPLOADED_IMAGE_MARKER);
    }

    let payload = client.chat(&request).await?;
    Ok(ChatReply::from_value(&payload))
}
