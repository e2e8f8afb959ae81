//! Health check.

use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

use super::super::state::AppState;

/// Handle GET /api/health.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Quote Card Editor API is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "environment": state.config.environment_label(),
    }))
}
