//! SweetBot chatbot: widget model, key handling and backing services

pub mod conversation;
pub mod keys;
pub mod service;
pub mod types;

pub use conversation::{
    welcome_message, ChatbotWidget, ERROR_REPLY, FALLBACK_REPLY, NOT_RUNNING_REPLY,
};
pub use keys::{key_to_action, InputAction, KeyPress};
pub use service::{echo_reply, ChatbotService, HttpChatbotService, MockChatbotService, KNOWN_MODELS};
pub use types::{ChatReply, ChatRequest, ConversationSnapshot, Message, MessageKind, ModelsResponse};
