//! Client for the OpenAI-compatible generation API.
//!
//! Handlers depend on the [`Upstream`] trait so tests can swap in a fake.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::error::QuoteCardError;

/// Status and parsed JSON body of an upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// POST `/chat/completions`.
    async fn chat_completion(&self, api_key: &str, body: Value) -> Result<UpstreamResponse, QuoteCardError>;

    /// POST `/images/generations`.
    async fn image_generation(&self, api_key: &str, body: Value) -> Result<UpstreamResponse, QuoteCardError>;

    /// GET a generated image.
    async fn download(&self, url: &str) -> Result<Vec<u8>, QuoteCardError>;
}

pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(api_base: &str) -> Result<Self, QuoteCardError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("quotecard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteCardError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, path: &str, api_key: &str, body: Value) -> Result<UpstreamResponse, QuoteCardError> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .body(serde_json::to_vec(&body)?)
            .send()
            .await
            .map_err(|e| QuoteCardError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| QuoteCardError::Transport(format!("Failed to read response: {}", e)))?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| QuoteCardError::Upstream(format!("Invalid JSON from {}: {}", url, e)))?;

        Ok(UpstreamResponse { status, body })
    }
}

#[async_trait]
impl Upstream for OpenAiClient {
    async fn chat_completion(&self, api_key: &str, body: Value) -> Result<UpstreamResponse, QuoteCardError> {
        self.post("/chat/completions", api_key, body).await
    }

    async fn image_generation(&self, api_key: &str, body: Value) -> Result<UpstreamResponse, QuoteCardError> {
        self.post("/images/generations", api_key, body).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, QuoteCardError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteCardError::Transport(format!("Download failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(QuoteCardError::Upstream("Failed to download image".into()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| QuoteCardError::Transport(format!("Download failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
