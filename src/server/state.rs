//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::QuoteCardError;

use super::upstream::{OpenAiClient, Upstream};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
    /// OpenAI API key; generation endpoints answer 500 without it
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,
    pub chat_model: String,
    pub image_model: String,
    /// Label reported by the health endpoint
    pub environment: Option<String>,
    /// Directory served at `/` (the editor frontend), if any
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            environment: None,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Defaults plus `OPENAI_API_KEY` and `QUOTECARD_ENV` from the environment.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("OPENAI_API_KEY"),
            environment: non_empty("QUOTECARD_ENV"),
            ..Self::default()
        }
    }

    pub fn environment_label(&self) -> &str {
        self.environment.as_deref().unwrap_or("development")
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    /// State talking to the real API at `config.api_base`.
    pub fn new(config: ServerConfig) -> Result<Self, QuoteCardError> {
        let upstream = Arc::new(OpenAiClient::new(&config.api_base)?);
        Ok(Self { config, upstream })
    }

    pub fn with_upstream(config: ServerConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self { config, upstream }
    }
}
