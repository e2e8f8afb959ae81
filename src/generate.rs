//! # Generation Client
//!
//! Client side of the generation flows: builds prompts, calls the proxy
//! server's `/api/generate-quote` and `/api/generate-image` endpoints and
//! turns the responses into a quote string or a background data URL.
//!
//! The parsing helpers are pure so they can be tested without a network.

use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use crate::error::QuoteCardError;
use crate::prompt::{SYSTEM_MESSAGE, image_prompt, quote_prompt};
use crate::render::background::{encode_data_url, sniff_mime};
use crate::store::KeyValueStore;
use crate::store::history::QuoteHistory;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

pub const QUOTE_TEMPERATURE: f64 = 1.0;
pub const QUOTE_TOP_P: f64 = 0.9;
pub const QUOTE_PRESENCE_PENALTY: f64 = 0.7;
pub const QUOTE_FREQUENCY_PENALTY: f64 = 0.6;
pub const QUOTE_MAX_TOKENS: u32 = 130;

pub const IMAGE_SIZE: &str = "1024x1024";
pub const IMAGE_QUALITY: &str = "standard";

/// Where the generated image lives in a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Ready-to-use `data:image/png;base64,...` URL.
    Inline(String),
    /// Remote URL that still has to be downloaded.
    Remote(String),
}

/// Request body for the quote endpoint.
pub fn quote_request_body(user_prompt: &str) -> Value {
    json!({
        "messages": [
            { "role": "system", "content": SYSTEM_MESSAGE },
            { "role": "user", "content": user_prompt },
        ],
        "temperature": QUOTE_TEMPERATURE,
        "top_p": QUOTE_TOP_P,
        "presence_penalty": QUOTE_PRESENCE_PENALTY,
        "frequency_penalty": QUOTE_FREQUENCY_PENALTY,
        "max_tokens": QUOTE_MAX_TOKENS,
    })
}

pub fn image_request_body(prompt: &str) -> Value {
    json!({
        "prompt": prompt,
        "size": IMAGE_SIZE,
        "quality": IMAGE_QUALITY,
    })
}

/// Error message from a failed response body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}` and a bare
/// `{"message": "..."}`.
pub fn extract_error(body: &Value) -> Option<String> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let error = body.get("error");
    non_empty(error.and_then(|e| e.get("message")))
        .or_else(|| non_empty(error))
        .or_else(|| non_empty(body.get("message")))
}

/// Trim whitespace, then strip leading and trailing double quotes.
pub fn clean_quote(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// The generated quote in a chat completion body.
pub fn quote_from_response(body: &Value) -> Result<String, QuoteCardError> {
    let generated = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");

    if generated.is_empty() {
        return Err(QuoteCardError::Upstream("No quote returned by OpenAI.".into()));
    }
    Ok(clean_quote(generated))
}

/// Locate the image in an image generation body.
pub fn image_from_response(body: &Value) -> Result<ImageSource, QuoteCardError> {
    let first = body.pointer("/data/0");
    let field = |name: &str| {
        first
            .and_then(|d| d.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    if let Some(b64) = field("b64_json") {
        return Ok(ImageSource::Inline(format!("data:image/png;base64,{}", b64)));
    }
    match field("url").or_else(|| field("image_url")) {
        Some(url) => Ok(ImageSource::Remote(url.to_string())),
        None => Err(QuoteCardError::Upstream(
            "Response does not contain the generated image.".into(),
        )),
    }
}

/// HTTP client for a quotecard proxy server.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    backend_url: String,
}

impl GenerationClient {
    pub fn new(backend_url: impl Into<String>) -> Result<Self, QuoteCardError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("quotecard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteCardError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            http,
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, QuoteCardError> {
        let url = format!("{}{}", self.backend_url, path);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?)
            .send()
            .await
            .map_err(|e| QuoteCardError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| QuoteCardError::Transport(format!("Failed to read response: {}", e)))?;
        let payload: Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({}));

        if !status.is_success() {
            let message = extract_error(&payload)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            log::error!("{} returned {}: {}", path, status, message);
            return Err(QuoteCardError::Upstream(message));
        }
        Ok(payload)
    }

    /// Generate a quote, record it in `history` and persist the history.
    pub async fn generate_quote<R: Rng + ?Sized>(
        &self,
        history: &mut QuoteHistory,
        store: &dyn KeyValueStore,
        rng: &mut R,
    ) -> Result<String, QuoteCardError> {
        let prompt = quote_prompt(&history.texts(), rng);
        log::debug!("Quote prompt:\n{}", prompt);

        let payload = self
            .post_json("/api/generate-quote", &quote_request_body(&prompt))
            .await?;
        let quote = quote_from_response(&payload)?;

        if !quote.is_empty() {
            history.push(quote.clone());
            history.save(store);
        }
        log::info!("Generated quote: {}", quote);
        Ok(quote)
    }

    /// Generate a background image inspired by `seed` and return it as a data URL.
    pub async fn generate_image<R: Rng + ?Sized>(
        &self,
        seed: &str,
        rng: &mut R,
    ) -> Result<String, QuoteCardError> {
        let prompt = image_prompt(seed, rng);
        log::info!("Image prompt: {}", prompt);

        let payload = self
            .post_json("/api/generate-image", &image_request_body(&prompt))
            .await?;

        match image_from_response(&payload)? {
            ImageSource::Inline(data_url) => Ok(data_url),
            ImageSource::Remote(url) => self.download_data_url(&url).await,
        }
    }

    async fn download_data_url(&self, url: &str) -> Result<String, QuoteCardError> {
        let failed = || QuoteCardError::Upstream("Could not download the generated image.".into());

        let response = self.http.get(url).send().await.map_err(|e| {
            log::warn!("Image download from {} failed: {}", url, e);
            failed()
        })?;
        if !response.status().is_success() {
            return Err(failed());
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
        let bytes = response.bytes().await.map_err(|_| failed())?;
        let mime = mime
            .filter(|m| m.starts_with("image/"))
            .unwrap_or_else(|| sniff_mime(&bytes).to_string());

        Ok(encode_data_url(&mime, &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_request_body_defaults() {
        let body = quote_request_body("scrie");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_MESSAGE);
        assert_eq!(body["messages"][1]["content"], "scrie");
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["presence_penalty"], 0.7);
        assert_eq!(body["frequency_penalty"], 0.6);
        assert_eq!(body["max_tokens"], 130);
    }

    #[test]
    fn test_image_request_body() {
        assert_eq!(
            image_request_body("p"),
            json!({"prompt": "p", "size": "1024x1024", "quality": "standard"})
        );
    }

    #[test]
    fn test_extract_error_shapes() {
        assert_eq!(
            extract_error(&json!({"error": {"message": "quota"}})).as_deref(),
            Some("quota")
        );
        assert_eq!(
            extract_error(&json!({"error": "Method not allowed"})).as_deref(),
            Some("Method not allowed")
        );
        assert_eq!(
            extract_error(&json!({"error": {"code": 1}, "message": "fallback"})).as_deref(),
            Some("fallback")
        );
        assert_eq!(extract_error(&json!({})), None);
    }

    #[test]
    fn test_clean_quote() {
        assert_eq!(clean_quote("  \"\"Lumina rămâne.\"  "), "Lumina rămâne.");
        assert_eq!(clean_quote("Spune \"da\" adevărului"), "Spune \"da\" adevărului");
    }

    #[test]
    fn test_quote_from_response() {
        let body = json!({"choices": [{"message": {"content": "  \"Speranța lucrează.\"\n"}}]});
        assert_eq!(quote_from_response(&body).unwrap(), "Speranța lucrează.");

        for empty in [json!({}), json!({"choices": []}), json!({"choices": [{"message": {"content": "   "}}]})] {
            let err = quote_from_response(&empty).unwrap_err();
            assert_eq!(err.to_string(), "Upstream error: No quote returned by OpenAI.");
        }
    }

    #[test]
    fn test_only_quotes_is_empty_not_error() {
        let body = json!({"choices": [{"message": {"content": "\"\""}}]});
        assert_eq!(quote_from_response(&body).unwrap(), "");
    }

    #[test]
    fn test_image_from_response() {
        assert_eq!(
            image_from_response(&json!({"data": [{"b64_json": "AAAA", "url": "http://x"}]})).unwrap(),
            ImageSource::Inline("data:image/png;base64,AAAA".into())
        );
        assert_eq!(
            image_from_response(&json!({"data": [{"image_url": "http://y"}]})).unwrap(),
            ImageSource::Remote("http://y".into())
        );
        assert!(image_from_response(&json!({"data": []})).is_err());
    }

    #[test]
    fn test_backend_url_trailing_slash() {
        let client = GenerationClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.backend_url(), "http://localhost:3000");
    }
}
