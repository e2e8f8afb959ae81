//! Quote generation proxy.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde_json::json;
use std::sync::Arc;

use crate::generate::{
    QUOTE_FREQUENCY_PENALTY, QUOTE_MAX_TOKENS, QUOTE_PRESENCE_PENALTY, QUOTE_TEMPERATURE, QUOTE_TOP_P,
};

use super::super::state::AppState;
use super::{ApiResult, field_or, internal_failure, parse_body, require_api_key, upstream_failure};

/// Handle POST /api/generate-quote - forward a chat completion.
pub async fn generate(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request = parse_body(&body);

    let Some(messages) = request.get("messages").filter(|m| m.is_array()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid request. Expected \"messages\" array." })),
        ));
    };

    let api_key = require_api_key(&state.config)?;

    log::info!("Generating quote with {}", state.config.chat_model);

    let upstream_body = json!({
        "model": state.config.chat_model,
        "messages": messages,
        "temperature": field_or(&request, "temperature", json!(QUOTE_TEMPERATURE)),
        "top_p": field_or(&request, "top_p", json!(QUOTE_TOP_P)),
        "presence_penalty": field_or(&request, "presence_penalty", json!(QUOTE_PRESENCE_PENALTY)),
        "frequency_penalty": field_or(&request, "frequency_penalty", json!(QUOTE_FREQUENCY_PENALTY)),
        "max_tokens": field_or(&request, "max_tokens", json!(QUOTE_MAX_TOKENS)),
    });

    let response = state
        .upstream
        .chat_completion(api_key, upstream_body)
        .await
        .map_err(|e| {
            log::error!("Error generating quote: {}", e);
            internal_failure("Failed to generate quote", &e)
        })?;

    if !response.is_success() {
        log::error!("Chat completion failed with {}: {}", response.status, response.body);
        return Err(upstream_failure(
            response.status,
            response.body,
            "OpenAI API request failed",
        ));
    }

    log::info!("Quote generated successfully");
    Ok(Json(response.body))
}
