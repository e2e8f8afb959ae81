//! # HTTP Server for Quote and Image Generation
//!
//! Proxies generation requests to the OpenAI API so the key never reaches
//! the browser, and optionally serves the editor frontend.
//!
//! ## Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... quotecard serve --listen 0.0.0.0:3000 --static-dir ./editor
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | POST | `/api/generate-quote` | chat completion |
//! | POST | `/api/generate-image` | image generation, URL results inlined as base64 |
//! | GET | `/api/health` | liveness |
//!
//! Every `/api` response carries permissive CORS headers and `OPTIONS`
//! short-circuits with 200.

mod handlers;
mod state;
pub mod upstream;

pub use state::{
    AppState, DEFAULT_API_BASE, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_LISTEN_ADDR, ServerConfig,
};
pub use upstream::{OpenAiClient, Upstream, UpstreamResponse};

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::error::QuoteCardError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/api/generate-quote",
            post(handlers::quote::generate).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-image",
            post(handlers::image::generate).fallback(handlers::method_not_allowed),
        )
        .route("/api/health", get(handlers::health::health))
        .layer(middleware::from_fn(cors));

    let app = match &state.config.static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.with_state(state)
}

/// CORS headers on every response; preflight requests end here.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use quotecard::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), quotecard::error::QuoteCardError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:3000".to_string(),
///     ..ServerConfig::from_env()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), QuoteCardError> {
    let listen_addr = config.listen_addr.clone();
    if config.api_key.is_none() {
        log::warn!("OPENAI_API_KEY is not set; generation endpoints will answer 500");
    }
    if let Some(dir) = &config.static_dir {
        log::info!("Serving static files from {}", dir.display());
    }

    let app = router(Arc::new(AppState::new(config)?));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| QuoteCardError::Transport(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    log::info!("quotecard server listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| QuoteCardError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
