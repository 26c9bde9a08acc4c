//! Platform API client used by the API scenarios
//!
//! A thin wrapper over `reqwest`: it resolves an [`Endpoint`] against the
//! base URL, attaches the bearer token when one is set, and returns the raw
//! status plus the decoded JSON body. Assertions are left to the caller.

pub mod endpoints;
pub mod payloads;
pub mod probe;

pub use endpoints::{AccountKind, Endpoint, REJECTED_SIGN_IN};

use crate::errors::ApiError;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Response as the scenarios see it
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the body is empty or not JSON
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status_in(&self, expected: &[u16]) -> bool {
        expected.contains(&self.status)
    }

    /// Sign-in responses carry `token` or `access_token`
    pub fn token(&self) -> Option<&str> {
        let body = self.body.as_ref()?;
        body.get("token")
            .or_else(|| body.get("access_token"))
            .and_then(Value::as_str)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.body, Some(Value::Array(_)))
    }
}

/// HTTP client for the SweetManager API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // Url::join drops the last segment unless the base ends with '/'
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(&base)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for an endpoint, query string included
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(&endpoint.path())?;
        if let Some((key, value)) = endpoint.query() {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Send a request with an optional JSON body
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(endpoint)?;
        tracing::debug!("{} {}", endpoint.method(), url);

        let mut request = self.client.request(endpoint.method(), url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from_network_error)?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(ApiError::from_network_error)?;
        let body = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        tracing::debug!("{} -> {}", endpoint.name(), status);
        Ok(ApiResponse { status, body })
    }

    /// Send a request without a body
    pub async fn call(&self, endpoint: &Endpoint) -> Result<ApiResponse, ApiError> {
        self.send::<Value>(endpoint, None).await
    }
}
