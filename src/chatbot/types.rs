//! Messages, requests and snapshots exchanged by the chatbot widget

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Robot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: MessageKind::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn robot(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: MessageKind::Robot,
            content: content.into(),
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }

    pub fn is_robot(&self) -> bool {
        self.kind == MessageKind::Robot
    }
}

/// Stored form of a conversation, same shape the web client keeps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    pub conversation_id: Option<Uuid>,
    pub messages: Vec<Message>,
}

/// Payload of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub username: String,
    pub income: i64,
    pub expenses: i64,
    pub conversation_id: Option<Uuid>,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
}

/// Response of `GET /models`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}
