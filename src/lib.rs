//! sweetmanager-bdd: acceptance suite for the SweetManager platform
//!
//! This library provides:
//! - A typed client for the hotel platform API (authentication, hotels, rooms)
//! - The SweetBot chatbot widget model with persisted conversations
//! - Screen models for the mobile app (auth, plans, payment, providers, account)
//! - An in-process stub backend the scenarios run against

pub mod api;
pub mod chatbot;
pub mod config;
pub mod errors;
pub mod mobile;
pub mod storage;
pub mod transport;

pub use api::{ApiClient, ApiResponse, Endpoint};
pub use chatbot::ChatbotWidget;
pub use config::Config;
pub use mobile::MobileApp;
pub use transport::StubServer;
