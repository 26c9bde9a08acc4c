//! Chatbot widget state
//!
//! Holds the message log, the input buffer and the loading flag of the chat
//! popup, and persists the conversation to a [`SnapshotStore`] after every
//! appended message.

use super::keys::{key_to_action, InputAction, KeyPress};
use super::service::ChatbotService;
use super::types::{ChatRequest, ConversationSnapshot, Message};
use crate::config::ChatbotConfig;
use crate::errors::StorageError;
use crate::storage::{SnapshotStore, CONVERSATION_KEY};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Shown when the service answers without text
pub const FALLBACK_REPLY: &str = "Sorry, I could not process your message.";

/// Shown when the service call fails
pub const ERROR_REPLY: &str = "Sorry, there was an error processing your message.";

/// Shown when the chatbot server is not running
pub const NOT_RUNNING_REPLY: &str =
    "⚠️ The chatbot is not active. Please start the chatbot server.";

/// Greeting that opens every new conversation
pub fn welcome_message(username: &str) -> String {
    format!(
        "¡Hola {}! Soy SweetBot, tu asistente financiero para la gestión de tu hotel. \
         Puedo ayudarte con finanzas, toma de decisiones y análisis de gastos. \
         ¿En qué puedo ayudarte hoy?",
        username
    )
}

pub struct ChatbotWidget {
    messages: Vec<Message>,
    input: String,
    is_loading: bool,
    /// Every value `is_loading` took, in order
    loading_transitions: Vec<bool>,
    conversation_id: Option<Uuid>,
    username: String,
    income: i64,
    expenses: i64,
    is_open: bool,
    service: Arc<dyn ChatbotService>,
    store: Arc<dyn SnapshotStore>,
}

impl fmt::Debug for ChatbotWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatbotWidget")
            .field("messages", &self.messages.len())
            .field("input", &self.input)
            .field("is_loading", &self.is_loading)
            .field("conversation_id", &self.conversation_id)
            .field("username", &self.username)
            .field("is_open", &self.is_open)
            .finish_non_exhaustive()
    }
}

impl ChatbotWidget {
    /// Widget with the default profile (Manager, 5000 income, 3000 expenses)
    pub fn new(service: Arc<dyn ChatbotService>, store: Arc<dyn SnapshotStore>) -> Self {
        Self::from_config(&ChatbotConfig::default(), service, store)
    }

    pub fn from_config(
        config: &ChatbotConfig,
        service: Arc<dyn ChatbotService>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            is_loading: false,
            loading_transitions: Vec::new(),
            conversation_id: None,
            username: config.username.clone(),
            income: config.income,
            expenses: config.expenses,
            is_open: false,
            service,
            store,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_robot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_robot())
    }

    pub fn conversation_id(&self) -> Option<Uuid> {
        self.conversation_id
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// True if the loading indicator was turned on at any point
    pub fn loading_was_shown(&self) -> bool {
        self.loading_transitions.contains(&true)
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn income(&self) -> i64 {
        self.income
    }

    pub fn expenses(&self) -> i64 {
        self.expenses
    }

    pub fn set_finances(&mut self, income: i64, expenses: i64) {
        self.income = income;
        self.expenses = expenses;
    }

    /// Send button state: disabled while loading or with a blank input
    pub fn can_send(&self) -> bool {
        !self.is_loading && !self.input.trim().is_empty()
    }

    /// Open the popup: restore the saved conversation or start a new one
    pub fn open(&mut self) {
        self.is_open = true;
        match self.restore() {
            Ok(true) => {
                tracing::debug!("Restored conversation {:?}", self.conversation_id);
            }
            Ok(false) => self.reset(),
            Err(e) => {
                tracing::warn!("Discarding unreadable conversation snapshot: {}", e);
                self.reset();
            }
        }
    }

    /// Close the popup, saving the conversation first
    pub fn close(&mut self) -> Result<(), StorageError> {
        self.save()?;
        self.is_open = false;
        Ok(())
    }

    /// Send `text` to the chatbot; returns false if it was blank
    pub async fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let timestamp = self.next_timestamp();
        self.push_message(Message::user(text, timestamp));
        self.set_loading(true);

        let request = ChatRequest {
            message: text.to_string(),
            username: self.username.clone(),
            income: self.income,
            expenses: self.expenses,
            conversation_id: self.conversation_id,
        };

        let reply_text = match self.service.send_message(request).await {
            Ok(reply) => reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            Err(e) if e.is_not_running() => NOT_RUNNING_REPLY.to_string(),
            Err(e) => {
                tracing::debug!("Chatbot request failed: {}", e);
                ERROR_REPLY.to_string()
            }
        };

        let timestamp = self.next_timestamp();
        self.push_message(Message::robot(reply_text, timestamp));
        self.set_loading(false);
        true
    }

    /// Send the input buffer and clear it
    pub async fn submit(&mut self) -> bool {
        if self.input.trim().is_empty() {
            return false;
        }
        let text = std::mem::take(&mut self.input);
        self.send(&text).await
    }

    /// Handle a key press in the input; returns true if the key was consumed
    pub async fn handle_key(&mut self, press: &mut KeyPress) -> bool {
        match key_to_action(press.event) {
            Some(InputAction::Send) => {
                press.prevent_default();
                self.submit().await;
                true
            }
            Some(InputAction::InsertNewline) => {
                self.input.push('\n');
                false
            }
            Some(InputAction::InsertChar(c)) => {
                self.input.push(c);
                false
            }
            Some(InputAction::DeleteCharBefore) => {
                self.input.pop();
                false
            }
            None => false,
        }
    }

    /// Drop the stored conversation and start over with a welcome message
    pub fn reset(&mut self) {
        if let Err(e) = self.store.remove(CONVERSATION_KEY) {
            tracing::warn!("Failed to clear conversation snapshot: {}", e);
        }
        self.conversation_id = Some(Uuid::new_v4());
        self.messages.clear();

        let timestamp = self.next_timestamp();
        self.push_message(Message::robot(welcome_message(&self.username), timestamp));
        tracing::debug!("Started conversation {:?}", self.conversation_id);
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            conversation_id: self.conversation_id,
            messages: self.messages.clone(),
        }
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.snapshot()).map_err(anyhow::Error::from)?;
        self.store.set(CONVERSATION_KEY, &json)
    }

    /// Replace the in-memory conversation with the stored one
    ///
    /// Returns `Ok(false)` and changes nothing when no snapshot exists.
    pub fn restore(&mut self) -> Result<bool, StorageError> {
        let Some(saved) = self.store.get(CONVERSATION_KEY)? else {
            return Ok(false);
        };
        let snapshot: ConversationSnapshot =
            serde_json::from_str(&saved).map_err(|e| StorageError::Corrupt {
                key: CONVERSATION_KEY.to_string(),
                reason: e.to_string(),
            })?;

        self.conversation_id = snapshot.conversation_id;
        self.messages = snapshot.messages;
        Ok(true)
    }

    fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save conversation: {}", e);
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
        self.loading_transitions.push(loading);
    }

    /// Now, but never earlier than the last message
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }
}
