//! JSON bodies exchanged with the WonderChat API.
//!
//! Field names follow the API's camelCase convention. The chat endpoint
//! authenticates through a header, so [`ChatRequest`] has no key field;
//! the page endpoints take `apiKey` in the body.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub chatbot_id: String,
    pub question: String,
    /// Continuation token from the previous answer. Omitted, not `null`,
    /// on the first question of a conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatlog_id: Option<String>,
}

impl ChatRequest {
    /// A question that opens a new conversation.
    pub fn opening(chatbot_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            chatbot_id: chatbot_id.into(),
            question: question.into(),
            chatlog_id: None,
        }
    }

    /// A follow-up threaded into the conversation identified by `chatlog_id`.
    pub fn follow_up(
        chatbot_id: impl Into<String>,
        question: impl Into<String>,
        chatlog_id: impl Into<String>,
    ) -> Self {
        Self {
            chatbot_id: chatbot_id.into(),
            question: question.into(),
            chatlog_id: Some(chatlog_id.into()),
        }
    }
}

/// Success body of `POST /api/v1/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Answer text.
    pub response: String,
    /// Continuation token to forward on the next follow-up.
    pub chatlog_id: String,
}

/// Body of `POST /api/v1/add-pages` and `POST /api/v1/delete-pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub api_key: String,
    pub chatbot_id: String,
    pub urls: Vec<String>,
}
