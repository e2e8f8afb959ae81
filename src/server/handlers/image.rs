//! Image generation proxy.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::generate::{IMAGE_QUALITY, IMAGE_SIZE};

use super::super::state::AppState;
use super::{ApiResult, field_or, internal_failure, is_truthy, parse_body, require_api_key, upstream_failure};

/// Handle POST /api/generate-image - forward an image generation and
/// inline the result when the upstream only returns a URL.
pub async fn generate(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request = parse_body(&body);

    if !is_truthy(request.get("prompt")) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid request. Expected \"prompt\" string." })),
        ));
    }

    let api_key = require_api_key(&state.config)?;

    let prompt = request.get("prompt").cloned().unwrap_or(Value::Null);
    log::info!("Generating image with {}", state.config.image_model);
    log::info!("Prompt: {}", prompt);

    let upstream_body = json!({
        "model": state.config.image_model,
        "prompt": prompt,
        "size": field_or(&request, "size", json!(IMAGE_SIZE)),
        "quality": field_or(&request, "quality", json!(IMAGE_QUALITY)),
        "n": 1,
    });

    let response = state
        .upstream
        .image_generation(api_key, upstream_body)
        .await
        .map_err(|e| {
            log::error!("Error generating image: {}", e);
            internal_failure("Failed to generate image", &e)
        })?;

    if !response.is_success() {
        log::error!("Image generation failed with {}: {}", response.status, response.body);
        return Err(upstream_failure(
            response.status,
            response.body,
            "Image generation failed",
        ));
    }

    let mut data = response.body;
    if let Err(e) = inline_first_image(&state, &mut data).await {
        log::warn!("Could not convert image to base64: {}", e);
    }

    log::info!("Image generated successfully");
    Ok(Json(data))
}

/// Download `data[0].url` and add `b64_json` and `data_url` next to it.
async fn inline_first_image(state: &AppState, data: &mut Value) -> Result<(), crate::error::QuoteCardError> {
    let Some(url) = data
        .pointer("/data/0/url")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
    else {
        return Ok(());
    };

    let bytes = state.upstream.download(&url).await?;
    let b64 = STANDARD.encode(&bytes);

    if let Some(first) = data.pointer_mut("/data/0").and_then(Value::as_object_mut) {
        first.insert("data_url".into(), json!(format!("data:image/png;base64,{}", b64)));
        first.insert("b64_json".into(), json!(b64));
    }
    Ok(())
}
