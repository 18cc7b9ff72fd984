use super::{ApiClient, ApiConfig, ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Document a reply was grounded on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatSource {
    pub source: String,
    /// `-1` when the page is unknown.
    #[serde(default = "unknown_page")]
    pub page: i64,
}

fn unknown_page() -> i64 {
    -1
}

/// The conversation as sent, with the assistant's answer appended.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub sources: Vec<ChatSource>,
}

impl ChatReply {
    pub fn answer(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == ChatRole::Assistant)
            .map(|m| m.content.as_str())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Client for the document-grounded assistant service. It has no offline
/// answers; every failure reaches the caller.
#[derive(Clone)]
pub struct AssistantApi {
    client: ApiClient,
}

impl AssistantApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Builds a client for `config.assistant_url`.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::from_config(config.assistant())?))
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> ApiResult<ChatReply> {
        if messages.is_empty() {
            return Err(ApiError::InvalidInput(
                "Messages must be a non-empty list of chat messages".to_string(),
            ));
        }
        let has_question = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .is_some_and(|m| !m.content.trim().is_empty());
        if !has_question {
            return Err(ApiError::InvalidInput(
                "No user message found in messages".to_string(),
            ));
        }

        let reply: ChatReply = self
            .client
            .post("/chatbot", &ChatRequest { messages })
            .await?;
        debug!("Assistant answered with {} sources", reply.sources.len());
        Ok(reply)
    }
}
