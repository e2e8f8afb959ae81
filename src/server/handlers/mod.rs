//! HTTP handlers for the server.

pub mod health;
pub mod image;
pub mod quote;

use axum::{Json, body::Bytes, http::StatusCode};
use serde_json::{Value, json};

use super::state::ServerConfig;

pub type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Any method other than POST (and the OPTIONS preflight) on a generation endpoint.
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// Parse a request body leniently; anything that isn't JSON becomes `null`.
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// JavaScript-style truthiness of an optional request field.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// The request field if truthy, else `default`.
fn field_or(body: &Value, key: &str, default: Value) -> Value {
    let value = body.get(key);
    if is_truthy(value) {
        value.cloned().unwrap_or(default)
    } else {
        default
    }
}

fn require_api_key(config: &ServerConfig) -> Result<&str, (StatusCode, Json<Value>)> {
    config.api_key.as_deref().ok_or_else(|| {
        log::error!("OPENAI_API_KEY not configured");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Server configuration error",
                "message": "OpenAI API key not configured. Please add OPENAI_API_KEY to the server environment.",
            })),
        )
    })
}

/// Relay a failed upstream call with its status.
fn upstream_failure(status: StatusCode, data: Value, fallback: &str) -> (StatusCode, Json<Value>) {
    let message = data
        .pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string();
    (status, Json(json!({ "error": message, "details": data })))
}

fn internal_failure(error: &str, e: &crate::error::QuoteCardError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
}
