//! Typed errors for the suite
//!
//! Each seam has its own error type. For the screen models the `Display`
//! text is exactly the message the screen shows to the user.

use thiserror::Error;

/// Errors from the platform API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Convert network/connection errors into typed ApiError
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            ApiError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Other(e.into())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

/// Errors from a chatbot backing service
#[derive(Debug, Error)]
pub enum ChatbotError {
    /// The chatbot server is not reachable at all
    #[error("chatbot not running")]
    NotRunning,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Chatbot returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChatbotError {
    /// True when the failure means the backing service is not running
    pub fn is_not_running(&self) -> bool {
        matches!(self, ChatbotError::NotRunning)
    }

    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_connect() {
            ChatbotError::NotRunning
        } else if e.is_timeout() {
            ChatbotError::Network(format!("Request timeout: {}", e))
        } else {
            ChatbotError::Other(e.into())
        }
    }
}

/// Errors from a snapshot store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid snapshot key: {0}")]
    InvalidKey(String),

    #[error("Corrupt snapshot {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Login and signup failures on the authentication screen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Please select a role")]
    RoleNotSelected,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("All fields are required")]
    MissingFields,

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Why an expiration date was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExpirationError {
    #[error("expected 4 digits (MMYY)")]
    Malformed,

    #[error("month must be between 01 and 12")]
    MonthOutOfRange,

    #[error("card is expired")]
    Expired,
}

/// Payment form failures, checked in field order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Invalid card number")]
    InvalidCardNumber,

    #[error("Invalid or expired date")]
    InvalidExpiration(ExpirationError),

    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,
}

/// Provider list failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("No se pudo obtener el hotelId del token")]
    MissingHotelId,

    #[error("Provider not found: {0}")]
    NotFound(u32),

    #[error("Provider service unavailable")]
    ServiceUnavailable,

    #[error("Name is required")]
    NameRequired,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("RUC must be 11 digits")]
    InvalidRuc,

    #[error("No provider form is open")]
    NoOpenForm,
}

/// Account page failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("User service unavailable: {0}")]
    ServiceUnavailable(String),
}
