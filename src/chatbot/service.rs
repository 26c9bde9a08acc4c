//! Backing services the chatbot widget talks to

use super::types::{ChatReply, ChatRequest, ModelsResponse};
use crate::errors::ChatbotError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Models the chatbot server advertises
pub const KNOWN_MODELS: [&str; 2] = ["gpt-3.5-turbo", "gpt-4"];

/// Reply text the echo backends produce
pub fn echo_reply(message: &str) -> String {
    format!("This is a response to: {}", message)
}

#[async_trait]
pub trait ChatbotService: Send + Sync {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ChatbotError>;

    async fn models(&self) -> Result<Vec<String>, ChatbotError>;
}

/// In-process service for scenarios
///
/// Records the last request it received. When switched off it fails the way
/// an unreachable server does.
#[derive(Debug)]
pub struct MockChatbotService {
    available: AtomicBool,
    last_request: Mutex<Option<ChatRequest>>,
    calls: Mutex<usize>,
}

impl Default for MockChatbotService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatbotService {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            last_request: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    pub fn unavailable() -> Self {
        let service = Self::new();
        service.set_available(false);
        service
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ChatbotService for MockChatbotService {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ChatbotError> {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        let reply = ChatReply {
            message: Some(echo_reply(&request.message)),
            conversation_id: request.conversation_id,
        };
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request);

        if !self.is_available() {
            return Err(ChatbotError::NotRunning);
        }
        Ok(reply)
    }

    async fn models(&self) -> Result<Vec<String>, ChatbotError> {
        if !self.is_available() {
            return Err(ChatbotError::Unavailable("Service unavailable".to_string()));
        }
        Ok(KNOWN_MODELS.iter().map(|m| m.to_string()).collect())
    }
}

/// Client for a chatbot server (`POST /chat`, `GET /models`)
#[derive(Debug, Clone)]
pub struct HttpChatbotService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatbotService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatbotError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ChatbotError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ChatbotService for HttpChatbotService {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ChatbotError> {
        let url = format!("{}/chat", self.base_url);
        tracing::debug!("POST {} ({} chars)", url, request.message.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(ChatbotError::from_network_error)?;
        let response = Self::check_status(response).await?;

        response
            .json::<ChatReply>()
            .await
            .map_err(ChatbotError::from_network_error)
    }

    async fn models(&self) -> Result<Vec<String>, ChatbotError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ChatbotError::from_network_error)?;
        let response = Self::check_status(response).await?;

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(ChatbotError::from_network_error)?;
        Ok(models.models)
    }
}
